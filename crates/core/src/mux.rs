//! Ordered merge across event sources.

use crate::{Event, EventId, EventSource, SourceError};
use std::collections::{BTreeMap, HashMap};
use tracesim_types::SimTime;
use tracing::warn;

/// Policy for cancelling an event the multiplexer does not hold.
///
/// Cancelling an unknown or already-delivered event is always a no-op that
/// returns `false`; the policy only controls whether it is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Log a warning for unknown cancellations.
    #[default]
    Warn,
    /// Ignore unknown cancellations silently.
    Silent,
}

/// One registered producer plus its buffered head event.
struct SourceSlot {
    source: Box<dyn EventSource>,
    head: Option<Box<dyn Event>>,
    exhausted: bool,
}

/// Merges one or more ordered event sources and a dynamic queue into a
/// single globally ordered stream.
///
/// Repeated `next_event` calls yield events in non-decreasing scheduled-time
/// order, assuming each registered source honors the [`EventSource`]
/// contract. Ties at an identical timestamp resolve deterministically:
///
/// 1. registered sources, in registration order;
/// 2. then dynamically scheduled events, in insertion order.
pub struct EventSourceMultiplexer {
    slots: Vec<SourceSlot>,
    /// Dynamically scheduled events, keyed by (time, insertion sequence).
    dynamic: BTreeMap<(SimTime, u64), Box<dyn Event>>,
    /// Id -> dynamic-queue key, for cancellation.
    pending_ids: HashMap<EventId, (SimTime, u64)>,
    next_seq: u64,
    cancel_policy: CancelPolicy,
}

impl EventSourceMultiplexer {
    /// Create an empty multiplexer with the default cancel policy.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            dynamic: BTreeMap::new(),
            pending_ids: HashMap::new(),
            next_seq: 0,
            cancel_policy: CancelPolicy::default(),
        }
    }

    /// Set the policy for cancelling unknown events.
    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    /// Register an ordered producer. Registration order is the tie-break
    /// rank for events sharing a timestamp.
    pub fn add_source(&mut self, source: Box<dyn EventSource>) {
        self.slots.push(SourceSlot {
            source,
            head: None,
            exhausted: false,
        });
    }

    /// Insert a dynamically scheduled event, returning a handle that can be
    /// used to cancel it before delivery.
    pub fn add_new_event(&mut self, event: Box<dyn Event>) -> EventId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = EventId(seq);
        let key = (event.scheduled_time(), seq);
        self.dynamic.insert(key, event);
        self.pending_ids.insert(id, key);
        id
    }

    /// Cancel a previously inserted, not-yet-delivered event.
    ///
    /// Returns `true` if the event was pending and has been removed. An
    /// unknown or already-delivered id is a no-op returning `false`,
    /// reported or not per [`CancelPolicy`].
    pub fn remove_event(&mut self, id: EventId) -> bool {
        match self.pending_ids.remove(&id) {
            Some(key) => {
                self.dynamic.remove(&key);
                true
            }
            None => {
                if self.cancel_policy == CancelPolicy::Warn {
                    warn!(%id, "cancel requested for unknown or delivered event");
                }
                false
            }
        }
    }

    /// Take the globally earliest pending event, or `None` once every
    /// source and the dynamic queue are exhausted.
    pub fn next_event(&mut self) -> Result<Option<Box<dyn Event>>, SourceError> {
        self.refill_heads()?;

        // Earliest buffered source head; first registered wins ties.
        let best_slot = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.head
                    .as_ref()
                    .map(|event| (index, event.scheduled_time()))
            })
            .min_by_key(|&(_, time)| time);

        let dynamic_head = self.dynamic.keys().next().copied();

        match (best_slot, dynamic_head) {
            (Some((_, source_time)), Some((dynamic_time, _)))
                if dynamic_time < source_time =>
            {
                Ok(self.take_dynamic())
            }
            (Some((index, _)), _) => Ok(self.slots[index].head.take()),
            (None, Some(_)) => Ok(self.take_dynamic()),
            (None, None) => Ok(None),
        }
    }

    /// Whether any event is still pending.
    pub fn has_pending(&mut self) -> Result<bool, SourceError> {
        self.refill_heads()?;
        Ok(!self.dynamic.is_empty() || self.slots.iter().any(|slot| slot.head.is_some()))
    }

    fn refill_heads(&mut self) -> Result<(), SourceError> {
        for slot in &mut self.slots {
            if slot.head.is_none() && !slot.exhausted {
                match slot.source.next_event()? {
                    Some(event) => slot.head = Some(event),
                    None => slot.exhausted = true,
                }
            }
        }
        Ok(())
    }

    fn take_dynamic(&mut self) -> Option<Box<dyn Event>> {
        let key = self.dynamic.keys().next().copied()?;
        let event = self.dynamic.remove(&key);
        self.pending_ids.retain(|_, pending_key| *pending_key != key);
        event
    }
}

impl Default for EventSourceMultiplexer {
    fn default() -> Self {
        Self::new()
    }
}
