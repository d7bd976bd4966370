//! The run loop.

use crate::SchedulerError;
use std::collections::BTreeMap;
use tracesim_core::{Effect, Event, EventId, EventSourceMultiplexer};
use tracesim_types::{EventKind, SimTime};
use tracing::{debug, info, trace, warn};

/// The emulation window and error policy fixed by `setup`.
#[derive(Clone, Copy)]
struct Window {
    start: SimTime,
    end: SimTime,
    stop_on_error: bool,
}

/// The event scheduling engine.
///
/// A scheduler instance is owned by the caller and drives one emulation run
/// at a time: `setup` configures the `[start, end)` window and takes
/// ownership of the multiplexer, `start` runs the loop to completion, and
/// the final clock and per-kind counters stay inspectable until the next
/// `reset` or `setup`.
///
/// All state is single-threaded; `process` effects are returned by events
/// and applied here, so nothing re-enters the loop.
pub struct Scheduler {
    window: Option<Window>,
    mux: Option<EventSourceMultiplexer>,
    now: SimTime,
    counts: BTreeMap<EventKind, u64>,
    ordering_violations: u64,
}

impl Scheduler {
    /// Create an unconfigured scheduler.
    pub fn new() -> Self {
        Self {
            window: None,
            mux: None,
            now: SimTime::ZERO,
            counts: BTreeMap::new(),
            ordering_violations: 0,
        }
    }

    /// Restore the initial unconfigured state: clock at zero, counters
    /// empty, window and multiplexer dropped.
    pub fn reset(&mut self) {
        self.window = None;
        self.mux = None;
        self.now = SimTime::ZERO;
        self.counts = BTreeMap::new();
        self.ordering_violations = 0;
    }

    /// Configure a run over the half-open window `[start, end)`.
    ///
    /// Performs an implicit [`reset`](Self::reset) first, so repeated calls
    /// are safe. With `stop_on_error` set (the usual policy) an ordering
    /// violation aborts the run; otherwise it is logged and the offending
    /// event dropped.
    pub fn setup(
        &mut self,
        start: SimTime,
        end: SimTime,
        mux: EventSourceMultiplexer,
        stop_on_error: bool,
    ) {
        self.reset();
        self.window = Some(Window {
            start,
            end,
            stop_on_error,
        });
        self.mux = Some(mux);
    }

    /// [`setup`](Self::setup) with the default stop-on-error policy.
    pub fn setup_default(&mut self, start: SimTime, end: SimTime, mux: EventSourceMultiplexer) {
        self.setup(start, end, mux, true);
    }

    /// Run the emulation to completion.
    ///
    /// The loop repeats until the multiplexer reports end-of-stream or the
    /// clock reaches the window end. Each delivered event advances the
    /// clock to its scheduled time, has its effect invoked exactly once,
    /// and is counted under its kind. Events before the window start are
    /// discarded; an event at or past the end pins the clock to the
    /// boundary, which ends the run.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        let window = self.window.ok_or(SchedulerError::NotConfigured)?;
        let mux = self.mux.as_mut().ok_or(SchedulerError::NotConfigured)?;

        info!(start = %window.start, end = %window.end, "emulation run starting");

        while self.now.is_earlier_than(window.end) {
            let Some(mut event) = mux.next_event()? else {
                break;
            };
            let event_time = event.scheduled_time();

            if event_time.is_earlier_than(self.now) {
                if window.stop_on_error {
                    return Err(SchedulerError::OrderingViolation {
                        kind: event.kind(),
                        event_time,
                        now: self.now,
                    });
                }
                warn!(
                    kind = %event.kind(),
                    %event_time,
                    now = %self.now,
                    "emulation clock already ahead of event time; dropping outdated event"
                );
                self.ordering_violations += 1;
            } else if event_time.is_earlier_than(window.end) {
                if !event_time.is_earlier_than(window.start) {
                    self.now = event_time;
                    let effects = event.process();
                    event.set_processed();
                    *self.counts.entry(event.kind()).or_insert(0) += 1;
                    debug!(kind = %event.kind(), time = %event_time, "processed event");

                    for effect in effects {
                        match effect {
                            Effect::Schedule(follow_on) => {
                                let id = mux.add_new_event(follow_on);
                                trace!(%id, "scheduled follow-on event");
                            }
                            Effect::Cancel(id) => {
                                mux.remove_event(id);
                            }
                        }
                    }
                } else {
                    trace!(
                        kind = %event.kind(),
                        time = %event_time,
                        window_start = %window.start,
                        "discarding pre-window event"
                    );
                }
            } else {
                // Pin the clock at the boundary; the loop guard ends the run
                // once the remaining post-window events have been drained.
                self.now = window.end;
                trace!(kind = %event.kind(), time = %event_time, "draining post-window event");
            }
        }

        info!(
            final_clock = %self.now,
            processed = self.events_count(),
            violations = self.ordering_violations,
            "emulation run finished"
        );
        Ok(())
    }

    /// Insert a dynamically scheduled event into the multiplexer.
    ///
    /// Errors when the scheduler is unconfigured.
    pub fn schedule(&mut self, event: Box<dyn Event>) -> Result<EventId, SchedulerError> {
        self.mux
            .as_mut()
            .ok_or(SchedulerError::NotConfigured)
            .map(|mux| mux.add_new_event(event))
    }

    /// Cancel a previously scheduled, not-yet-delivered event.
    ///
    /// Returns whether the event was pending; unknown ids follow the
    /// multiplexer's cancel policy.
    pub fn cancel(&mut self, id: EventId) -> Result<bool, SchedulerError> {
        self.mux
            .as_mut()
            .ok_or(SchedulerError::NotConfigured)
            .map(|mux| mux.remove_event(id))
    }

    /// Snapshot of the per-kind processed counters.
    ///
    /// The returned map is a copy; mutating it does not affect the
    /// scheduler.
    pub fn events_count_by_kind(&self) -> BTreeMap<EventKind, u64> {
        self.counts.clone()
    }

    /// Total number of processed events across all kinds.
    pub fn events_count(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of ordering violations tolerated under the keep-going policy.
    pub fn ordering_violations(&self) -> u64 {
        self.ordering_violations
    }

    /// The current simulated clock.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// The configured window start, if configured.
    pub fn emulation_start(&self) -> Option<SimTime> {
        self.window.map(|window| window.start)
    }

    /// The configured window end, if configured.
    pub fn emulation_end(&self) -> Option<SimTime> {
        self.window.map(|window| window.end)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracesim_core::{CancelPolicy, SourceError};
    use tracesim_test_helpers::{FailingSource, ProbeEvent, ProcessLog, ScriptedSource};
    use tracing_test::traced_test;

    fn window_mux(log: &ProcessLog, millis: &[u64]) -> EventSourceMultiplexer {
        let events = millis
            .iter()
            .map(|&ms| ProbeEvent::boxed(ms, EventKind::Read, log))
            .collect();
        let mut mux = EventSourceMultiplexer::new();
        mux.add_source(ScriptedSource::boxed(events));
        mux
    }

    #[test]
    fn test_window_scenario() {
        // Window [1000ms, 5000ms), events at 500/2000/4000/6000 ms:
        // only 2000 and 4000 are processed, final clock is 5000ms.
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[500, 2_000, 4_000, 6_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::from_millis(1_000), SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();

        assert_eq!(
            log.times(),
            vec![SimTime::from_millis(2_000), SimTime::from_millis(4_000)]
        );
        assert_eq!(scheduler.now(), SimTime::from_millis(5_000));
        assert_eq!(scheduler.events_count(), 2);
    }

    #[test]
    fn test_delivered_times_are_non_decreasing() {
        let log = ProcessLog::new();
        let mut mux = EventSourceMultiplexer::new();
        mux.add_source(ScriptedSource::boxed(vec![
            ProbeEvent::boxed(100, EventKind::Read, &log),
            ProbeEvent::boxed(300, EventKind::Write, &log),
        ]));
        mux.add_source(ScriptedSource::boxed(vec![
            ProbeEvent::boxed(200, EventKind::Close, &log),
            ProbeEvent::boxed(300, EventKind::Unlink, &log),
        ]));

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_secs(10), mux);
        scheduler.start().unwrap();

        let times = log.times();
        assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(times.len(), 4);
    }

    #[test]
    fn test_ordering_violation_is_fatal_by_default() {
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[3_000, 2_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);

        let err = scheduler.start().unwrap_err();
        match err {
            SchedulerError::OrderingViolation {
                event_time, now, ..
            } => {
                assert_eq!(event_time, SimTime::from_millis(2_000));
                assert_eq!(now, SimTime::from_millis(3_000));
            }
            other => panic!("expected ordering violation, got {other}"),
        }
        // The outdated event was never processed.
        assert_eq!(log.times(), vec![SimTime::from_millis(3_000)]);
        assert_eq!(scheduler.events_count(), 1);
    }

    #[traced_test]
    #[test]
    fn test_ordering_violation_is_advisory_when_keep_going() {
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[3_000, 2_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup(
            SimTime::ZERO,
            SimTime::from_millis(5_000),
            mux,
            false,
        );
        scheduler.start().unwrap();

        assert_eq!(log.times(), vec![SimTime::from_millis(3_000)]);
        assert_eq!(scheduler.ordering_violations(), 1);
        assert_eq!(scheduler.now(), SimTime::from_millis(3_000));
        assert!(logs_contain("clock already ahead of event time"));
    }

    #[test]
    fn test_start_unconfigured_is_fatal() {
        let mut scheduler = Scheduler::new();
        assert!(matches!(
            scheduler.start(),
            Err(SchedulerError::NotConfigured)
        ));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[1_000, 2_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();
        assert_eq!(scheduler.events_count(), 2);

        scheduler.reset();
        assert_eq!(scheduler.now(), SimTime::ZERO);
        assert!(scheduler.events_count_by_kind().is_empty());
        assert_eq!(scheduler.emulation_start(), None);
        assert!(matches!(
            scheduler.start(),
            Err(SchedulerError::NotConfigured)
        ));
    }

    #[test]
    fn test_setup_performs_implicit_reset() {
        let log = ProcessLog::new();
        let mut scheduler = Scheduler::new();

        scheduler.setup_default(
            SimTime::ZERO,
            SimTime::from_millis(5_000),
            window_mux(&log, &[1_000]),
        );
        scheduler.start().unwrap();
        assert_eq!(scheduler.events_count(), 1);

        // Second setup clears the clock and counters from the first run.
        scheduler.setup_default(
            SimTime::ZERO,
            SimTime::from_millis(5_000),
            window_mux(&log, &[2_000]),
        );
        assert_eq!(scheduler.now(), SimTime::ZERO);
        assert_eq!(scheduler.events_count(), 0);
        scheduler.start().unwrap();
        assert_eq!(scheduler.events_count(), 1);
    }

    #[test]
    fn test_count_snapshot_is_a_copy() {
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[1_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();

        let first = scheduler.events_count_by_kind();
        let mut second = scheduler.events_count_by_kind();
        assert_eq!(first, second);

        second.insert(EventKind::Write, 99);
        assert_eq!(scheduler.events_count_by_kind(), first);
        assert_eq!(scheduler.events_count(), 1);
    }

    #[test]
    fn test_count_total_equals_sum_of_kinds() {
        let log = ProcessLog::new();
        let mut mux = EventSourceMultiplexer::new();
        mux.add_source(ScriptedSource::boxed(vec![
            ProbeEvent::boxed(100, EventKind::Read, &log),
            ProbeEvent::boxed(200, EventKind::Read, &log),
            ProbeEvent::boxed(300, EventKind::Write, &log),
            ProbeEvent::boxed(400, EventKind::Close, &log),
        ]));

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_secs(1), mux);
        scheduler.start().unwrap();

        let by_kind = scheduler.events_count_by_kind();
        assert_eq!(by_kind[&EventKind::Read], 2);
        assert_eq!(by_kind[&EventKind::Write], 1);
        assert_eq!(by_kind[&EventKind::Close], 1);
        assert_eq!(
            scheduler.events_count(),
            by_kind.values().sum::<u64>()
        );
    }

    #[test]
    fn test_follow_on_events_are_delivered_in_same_run() {
        let log = ProcessLog::new();
        let follow_on = Box::new(
            ProbeEvent::new(SimTime::from_millis(3_000), EventKind::Write, log.clone()),
        );
        let trigger = Box::new(
            ProbeEvent::new(SimTime::from_millis(1_000), EventKind::Read, log.clone())
                .with_effects(vec![Effect::Schedule(follow_on)]),
        );

        let mut mux = EventSourceMultiplexer::new();
        mux.add_source(ScriptedSource::boxed(vec![trigger]));

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();

        assert_eq!(
            log.entries(),
            vec![
                (EventKind::Read, SimTime::from_millis(1_000)),
                (EventKind::Write, SimTime::from_millis(3_000)),
            ]
        );
    }

    #[test]
    fn test_effect_cancel_removes_pending_event() {
        let log = ProcessLog::new();
        let mut mux = EventSourceMultiplexer::new().with_cancel_policy(CancelPolicy::Silent);
        let doomed = mux.add_new_event(Box::new(ProbeEvent::new(
            SimTime::from_millis(4_000),
            EventKind::Unlink,
            log.clone(),
        )));
        mux.add_source(ScriptedSource::boxed(vec![Box::new(
            ProbeEvent::new(SimTime::from_millis(1_000), EventKind::Read, log.clone())
                .with_effects(vec![Effect::Cancel(doomed)]),
        )]));

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();

        assert_eq!(log.entries(), vec![(EventKind::Read, SimTime::from_millis(1_000))]);
    }

    #[test]
    fn test_source_error_aborts_run() {
        let log = ProcessLog::new();
        let mut mux = EventSourceMultiplexer::new();
        mux.add_source(Box::new(FailingSource::new(
            vec![ProbeEvent::boxed(1_000, EventKind::Read, &log)],
            7,
        )));

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);

        match scheduler.start() {
            Err(SchedulerError::Source(SourceError::MalformedRecord { line, .. })) => {
                assert_eq!(line, 7);
            }
            other => panic!("expected source error, got {other:?}"),
        }
        // The event before the bad record was still delivered.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_schedule_and_cancel_require_configuration() {
        let log = ProcessLog::new();
        let mut scheduler = Scheduler::new();

        let event = ProbeEvent::boxed(1_000, EventKind::Read, &log);
        assert!(matches!(
            scheduler.schedule(event),
            Err(SchedulerError::NotConfigured)
        ));

        scheduler.setup_default(
            SimTime::ZERO,
            SimTime::from_millis(5_000),
            EventSourceMultiplexer::new(),
        );
        let id = scheduler
            .schedule(ProbeEvent::boxed(1_000, EventKind::Read, &log))
            .unwrap();
        assert!(scheduler.cancel(id).unwrap());
        assert!(!scheduler.cancel(id).unwrap());
    }

    #[test]
    fn test_clock_never_exceeds_window_end() {
        let log = ProcessLog::new();
        let mux = window_mux(&log, &[1_000, 6_000, 7_000, 8_000]);

        let mut scheduler = Scheduler::new();
        scheduler.setup_default(SimTime::ZERO, SimTime::from_millis(5_000), mux);
        scheduler.start().unwrap();

        assert_eq!(scheduler.now(), SimTime::from_millis(5_000));
        assert_eq!(log.times(), vec![SimTime::from_millis(1_000)]);
    }
}
