//! Assembled trace replay runner.
//!
//! Wires the trace parser (or a synthetic workload), the event source
//! multiplexer and the scheduler into a one-call emulation run, and
//! collects the results into a serializable [`ReplayReport`].
//!
//! # Example
//!
//! ```ignore
//! use tracesim_replay::{ReplayConfig, ReplayRunner};
//! use tracesim_types::SimTime;
//!
//! let config = ReplayConfig::new()
//!     .with_window(SimTime::from_millis(1_000), SimTime::from_secs(60));
//! let report = ReplayRunner::new(config).run_trace_file("calls.trace")?;
//!
//! println!("{report}");
//! ```

mod config;
mod handler;
mod report;
mod runner;
mod workload;

pub use config::ReplayConfig;
pub use handler::StatsHandler;
pub use report::ReplayReport;
pub use runner::{ReplayError, ReplayRunner};
pub use workload::SyntheticWorkload;
