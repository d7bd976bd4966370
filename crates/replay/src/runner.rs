//! The replay runner.

use crate::{ReplayConfig, ReplayReport, StatsHandler, SyntheticWorkload};
use std::cell::RefCell;
use std::io::BufRead;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracesim_core::{EventSource, EventSourceMultiplexer};
use tracesim_scheduler::{Scheduler, SchedulerError};
use tracesim_trace::{TraceError, TraceParser};
use tracing::info;

/// Fatal replay failures.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The scheduler aborted the run.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// The trace could not be opened or read.
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Runs one emulation per call: parser(s) → multiplexer → scheduler.
pub struct ReplayRunner {
    config: ReplayConfig,
}

impl ReplayRunner {
    /// Create a runner with the given configuration.
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Replay a trace file from disk.
    pub fn run_trace_file(&self, path: impl AsRef<Path>) -> Result<ReplayReport, ReplayError> {
        let handler = Rc::new(RefCell::new(StatsHandler::new()));
        let parser = TraceParser::open(path, handler.clone())?;
        self.run(vec![Box::new(parser)], handler)
    }

    /// Replay a trace from an in-memory reader.
    pub fn run_trace_reader<R: BufRead + 'static>(
        &self,
        reader: R,
    ) -> Result<ReplayReport, ReplayError> {
        let handler = Rc::new(RefCell::new(StatsHandler::new()));
        let parser = TraceParser::new(reader, handler.clone());
        self.run(vec![Box::new(parser)], handler)
    }

    /// Replay a synthetic workload of `count` seeded events.
    pub fn run_synthetic(&self, seed: u64, count: usize) -> Result<ReplayReport, ReplayError> {
        let handler = Rc::new(RefCell::new(StatsHandler::new()));
        let workload = SyntheticWorkload::new(seed, count, handler.clone());
        self.run(vec![Box::new(workload)], handler)
    }

    fn run(
        &self,
        sources: Vec<Box<dyn EventSource>>,
        handler: Rc<RefCell<StatsHandler>>,
    ) -> Result<ReplayReport, ReplayError> {
        let mut mux = EventSourceMultiplexer::new().with_cancel_policy(self.config.cancel_policy);
        for source in sources {
            mux.add_source(source);
        }

        let mut scheduler = Scheduler::new();
        scheduler.setup(
            self.config.window_start,
            self.config.window_end,
            mux,
            self.config.stop_on_error,
        );
        scheduler.start()?;

        let stats = handler.borrow();
        let report = ReplayReport {
            events_by_kind: scheduler.events_count_by_kind(),
            events_total: scheduler.events_count(),
            final_clock: scheduler.now(),
            ordering_violations: scheduler.ordering_violations(),
            bytes_read: stats.bytes_read(),
            bytes_written: stats.bytes_written(),
        };
        info!(events = report.events_total, final_clock = %report.final_clock, "replay complete");
        Ok(report)
    }
}
