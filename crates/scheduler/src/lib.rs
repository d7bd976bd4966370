//! Event scheduling engine.
//!
//! The scheduler owns the simulated clock and replays a totally ordered
//! stream of events pulled from an [`EventSourceMultiplexer`], invoking each
//! event's effect exactly once at the correct simulated instant.
//!
//! # Run loop
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Scheduler                       │
//! │                                                      │
//! │   window [start, end)      clock `now`               │
//! │          │                     │                     │
//! │          ▼                     ▼                     │
//! │   pull next event ──► ordering check ──► process()   │
//! │          ▲                     │            │        │
//! │          │                     ▼            ▼        │
//! │   EventSourceMultiplexer   counters    effects ──►   │
//! │                                        (schedule /   │
//! │                                         cancel)      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Events strictly before the window are pre-history noise and are dropped;
//! events at or past the window end pin the clock to the boundary so the
//! sources can be drained without further effects. An event scheduled
//! earlier than the current clock is an ordering violation, fatal or
//! advisory per the configured policy.
//!
//! [`EventSourceMultiplexer`]: tracesim_core::EventSourceMultiplexer

mod error;
mod scheduler;

pub use error::SchedulerError;
pub use scheduler::Scheduler;
