//! Tests for Scheduler ordering
//!
//! Determinism depends on this: simultaneous events MUST come out in the
//! order they went in.

use alert_propagation_core::{Event, Scheduler};

fn drain(scheduler: &mut Scheduler) -> Vec<(i64, String)> {
    std::iter::from_fn(|| scheduler.pop_min())
        .map(|(key, event)| (key.time, event.description().to_string()))
        .collect()
}

#[test]
fn test_orders_by_time() {
    let mut scheduler = Scheduler::new();
    scheduler.push(Event::originate_alert(1, "c", 30));
    scheduler.push(Event::originate_alert(1, "a", -5));
    scheduler.push(Event::originate_alert(1, "b", 10));

    assert_eq!(
        drain(&mut scheduler),
        vec![
            (-5, "a".to_string()),
            (10, "b".to_string()),
            (30, "c".to_string())
        ]
    );
}

#[test]
fn test_ties_break_by_enqueue_order() {
    let mut scheduler = Scheduler::new();
    for name in ["first", "second", "third", "fourth"] {
        scheduler.push(Event::originate_cancel(1, name, 4));
    }

    let order: Vec<String> = drain(&mut scheduler).into_iter().map(|(_, d)| d).collect();
    assert_eq!(order, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_interleaved_push_and_pop_keeps_fifo() {
    let mut scheduler = Scheduler::new();
    scheduler.push(Event::originate_alert(1, "early", 1));
    scheduler.push(Event::originate_alert(1, "a", 5));

    let (_, popped) = scheduler.pop_min().unwrap();
    assert_eq!(popped.description(), "early");

    // Pushed after "a" at the same time, so must come after it
    scheduler.push(Event::originate_alert(2, "b", 5));

    let order: Vec<String> = drain(&mut scheduler).into_iter().map(|(_, d)| d).collect();
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn test_len_and_peek() {
    let mut scheduler = Scheduler::new();
    assert!(scheduler.is_empty());

    scheduler.push(Event::originate_alert(1, "x", 2));
    let key = scheduler.push(Event::originate_alert(1, "y", 1));

    assert_eq!(scheduler.len(), 2);
    assert_eq!(scheduler.peek_key(), Some(key));
}

#[test]
fn test_same_inputs_same_order() {
    let build = || {
        let mut scheduler = Scheduler::new();
        for (i, time) in [3, 1, 3, 0, 1, 3].into_iter().enumerate() {
            scheduler.push(Event::originate_alert(i as i64, format!("m{i}"), time));
        }
        scheduler
    };

    assert_eq!(drain(&mut build()), drain(&mut build()));
}
