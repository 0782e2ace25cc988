//! Per-lineage mutation logs.
//!
//! Every event the simulation applies to a lineage can be recorded as a
//! [`MutationRecord`]: the simulation time, the kind of event, and a snapshot
//! of the resulting vector. The log is purely observational -- the engine
//! never reads it back -- but it makes a run auditable after the fact.

use serde::{Deserialize, Serialize};

use crate::trait_vector::TraitVector;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// The kind of event applied to a lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new trait was created, appended at the end of the index space.
    Birth,
    /// A previously active trait was irreversibly lost.
    Death,
    /// An active trait was copied in from a contemporaneous donor lineage.
    Borrowing,
}

// ---------------------------------------------------------------------------
// MutationRecord
// ---------------------------------------------------------------------------

/// One applied event: when it happened, what it was, and the state after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Simulation time of the event, in branch-length units.
    pub time: f64,
    /// The kind of event.
    pub kind: EventKind,
    /// Snapshot of the lineage's vector after the event was applied.
    pub state: TraitVector,
}

// ---------------------------------------------------------------------------
// MutationLog
// ---------------------------------------------------------------------------

/// An ordered sequence of mutation records for one lineage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationLog {
    /// The records, in the order events were applied.
    records: Vec<MutationRecord>,
}

impl MutationLog {
    /// Create an empty mutation log.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record for an event applied at `time`.
    pub fn record(&mut self, time: f64, kind: EventKind, state: TraitVector) {
        self.records.push(MutationRecord { time, kind, state });
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return the records in application order.
    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    /// Return the most recent record, if any.
    pub fn last(&self) -> Option<&MutationRecord> {
        self.records.last()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_order() {
        let mut log = MutationLog::new();
        log.record(0.5, EventKind::Birth, TraitVector::from_binary_str("1").unwrap());
        log.record(1.5, EventKind::Death, TraitVector::from_binary_str("0").unwrap());

        assert_eq!(log.len(), 2);
        let kinds: Vec<EventKind> = log.records().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![EventKind::Birth, EventKind::Death]);
    }

    #[test]
    fn last_returns_most_recent() {
        let mut log = MutationLog::new();
        assert!(log.last().is_none());

        log.record(2.0, EventKind::Borrowing, TraitVector::new());
        let last = log.last().unwrap();
        assert_eq!(last.kind, EventKind::Borrowing);
        assert!((last.time - 2.0).abs() < f64::EPSILON);
    }
}
