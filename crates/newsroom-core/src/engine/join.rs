//! Scatter-gather accumulation for fan-out joins.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::error::EngineError;
use super::event::RunEvent;

/// One join point's accumulation state.
///
/// A slot opens on the first arrival and fires exactly once, when the
/// number of buffered events reaches the expected count. After firing only
/// the tombstone remains, so a late arrival is detected as overflow rather
/// than silently re-opening the join.
#[derive(Debug)]
enum JoinSlot<E> {
    Open { expected: usize, received: Vec<E> },
    Fired,
}

/// Per-run ledger of join points, keyed by the collecting step's name.
///
/// Joins are scoped to a single run; the ledger is created with the run and
/// dropped with it, so two runs can never cross-talk even if they share
/// step names.
#[derive(Debug)]
pub struct JoinLedger<E> {
    slots: DashMap<String, JoinSlot<E>>,
}

impl<E: RunEvent> JoinLedger<E> {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Record one arrival at `join_point`.
    ///
    /// Returns `Ok(None)` while the join is still filling and
    /// `Ok(Some(events))` exactly once, on the arrival that completes it.
    /// The returned events are ordered by arrival. Every caller must pass
    /// the same `expected` count; a disagreement, a count of zero, or an
    /// arrival after the join has fired is a workflow-fatal error.
    pub fn collect(
        &self,
        join_point: &str,
        event: E,
        expected: usize,
    ) -> Result<Option<Vec<E>>, EngineError> {
        if expected == 0 {
            return Err(EngineError::JoinCountInvalid {
                join_point: join_point.to_string(),
            });
        }

        match self.slots.entry(join_point.to_string()) {
            Entry::Vacant(slot) => {
                if expected == 1 {
                    slot.insert(JoinSlot::Fired);
                    return Ok(Some(vec![event]));
                }
                slot.insert(JoinSlot::Open {
                    expected,
                    received: vec![event],
                });
                Ok(None)
            }
            Entry::Occupied(mut slot) => {
                let value = slot.get_mut();
                let JoinSlot::Open { expected: declared, received } = &mut *value else {
                    return Err(EngineError::JoinOverflow {
                        join_point: join_point.to_string(),
                    });
                };
                if *declared != expected {
                    return Err(EngineError::JoinCountMismatch {
                        join_point: join_point.to_string(),
                        declared: *declared,
                        requested: expected,
                    });
                }
                received.push(event);
                if received.len() < expected {
                    return Ok(None);
                }
                let complete = std::mem::take(received);
                *value = JoinSlot::Fired;
                Ok(Some(complete))
            }
        }
    }

    /// Whether `join_point` has already fired.
    pub fn has_fired(&self, join_point: &str) -> bool {
        matches!(
            self.slots.get(join_point).as_deref(),
            Some(JoinSlot::Fired)
        )
    }
}

impl<E: RunEvent> Default for JoinLedger<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Arrival(u32);

    impl RunEvent for Arrival {
        const STOP: &'static str = "stop";

        fn kind(&self) -> &'static str {
            "arrival"
        }
    }

    #[test]
    fn fires_exactly_on_expected_count() {
        let ledger = JoinLedger::new();

        assert!(ledger.collect("gather", Arrival(1), 3).unwrap().is_none());
        assert!(ledger.collect("gather", Arrival(2), 3).unwrap().is_none());

        let fired = ledger.collect("gather", Arrival(3), 3).unwrap();
        assert_eq!(fired, Some(vec![Arrival(1), Arrival(2), Arrival(3)]));
        assert!(ledger.has_fired("gather"));
    }

    #[test]
    fn preserves_arrival_order() {
        let ledger = JoinLedger::new();
        ledger.collect("gather", Arrival(30), 3).unwrap();
        ledger.collect("gather", Arrival(10), 3).unwrap();

        let fired = ledger.collect("gather", Arrival(20), 3).unwrap().unwrap();
        assert_eq!(fired, vec![Arrival(30), Arrival(10), Arrival(20)]);
    }

    #[test]
    fn expected_one_fires_immediately() {
        let ledger = JoinLedger::new();
        let fired = ledger.collect("solo", Arrival(7), 1).unwrap();
        assert_eq!(fired, Some(vec![Arrival(7)]));
    }

    #[test]
    fn overflow_after_firing_is_fatal() {
        let ledger = JoinLedger::new();
        ledger.collect("gather", Arrival(1), 2).unwrap();
        ledger.collect("gather", Arrival(2), 2).unwrap();

        let err = ledger.collect("gather", Arrival(3), 2).unwrap_err();
        assert!(matches!(err, EngineError::JoinOverflow { join_point } if join_point == "gather"));
    }

    #[test]
    fn mismatched_expected_counts_are_fatal() {
        let ledger = JoinLedger::new();
        ledger.collect("gather", Arrival(1), 3).unwrap();

        let err = ledger.collect("gather", Arrival(2), 4).unwrap_err();
        assert!(matches!(
            err,
            EngineError::JoinCountMismatch {
                declared: 3,
                requested: 4,
                ..
            }
        ));
    }

    #[test]
    fn zero_expected_count_is_rejected() {
        let ledger = JoinLedger::new();
        let err = ledger.collect("gather", Arrival(1), 0).unwrap_err();
        assert!(matches!(err, EngineError::JoinCountInvalid { .. }));
    }

    #[test]
    fn independent_join_points_do_not_interact() {
        let ledger = JoinLedger::new();
        ledger.collect("left", Arrival(1), 2).unwrap();

        let fired = ledger.collect("right", Arrival(9), 1).unwrap();
        assert_eq!(fired, Some(vec![Arrival(9)]));
        assert!(!ledger.has_fired("left"));
    }
}
