//! Tests for CancellationLedger

use alert_propagation_core::CancellationLedger;
use proptest::prelude::*;

#[test]
fn test_unknown_pair_is_not_known() {
    let ledger = CancellationLedger::new();

    assert!(!ledger.known_before(1, "fire", i64::MAX));
    assert_eq!(ledger.learned_at(1, "fire"), None);
    assert!(ledger.is_empty());
}

#[test]
fn test_strictly_earlier_only() {
    let mut ledger = CancellationLedger::new();
    ledger.record(1, "fire", 10);

    assert!(!ledger.known_before(1, "fire", 9));
    assert!(!ledger.known_before(1, "fire", 10));
    assert!(ledger.known_before(1, "fire", 11));
}

#[test]
fn test_later_record_does_not_overwrite() {
    let mut ledger = CancellationLedger::new();
    ledger.record(1, "fire", 3);
    ledger.record(1, "fire", 8);

    assert_eq!(ledger.learned_at(1, "fire"), Some(3));
    assert!(ledger.known_before(1, "fire", 4));
}

#[test]
fn test_devices_are_independent() {
    let mut ledger = CancellationLedger::new();
    ledger.record(1, "fire", 0);

    assert!(ledger.known_before(1, "fire", 5));
    assert!(!ledger.known_before(2, "fire", 5));
    assert_eq!(ledger.len(), 1);
}

proptest! {
    #[test]
    fn prop_stored_time_is_minimum_of_records(
        times in prop::collection::vec(-1000i64..1000, 1..40)
    ) {
        let mut ledger = CancellationLedger::new();
        let mut previous: Option<i64> = None;

        for &time in &times {
            ledger.record(7, "m", time);
            let stored = ledger.learned_at(7, "m").unwrap();

            // Never increases
            if let Some(prev) = previous {
                prop_assert!(stored <= prev);
            }
            previous = Some(stored);
        }

        let min = *times.iter().min().unwrap();
        prop_assert_eq!(ledger.learned_at(7, "m"), Some(min));
        prop_assert!(!ledger.known_before(7, "m", min));
        prop_assert!(ledger.known_before(7, "m", min + 1));
    }
}
