//! Core value types for tracesim.
//!
//! This crate holds the leaf types shared by every other crate in the
//! workspace: the simulated timestamp ([`SimTime`]) and the closed set of
//! event kinds ([`EventKind`]) used for per-kind accounting.

mod kind;
mod time;

pub use kind::EventKind;
pub use time::{SimTime, TimeUnit};
