//! Stress tests for concurrent emissions
//!
//! These tests verify:
//! - Sequence ids are unique and gapless under concurrent writers
//! - Each record keeps its own message, sequence id and call site
//! - Capture counters stay exact under contention

use rust_logger_fields::core::field::Field;
use rust_logger_fields::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 1000;

fn seqid_of(resolved: &ResolvedFields) -> u64 {
    resolved
        .get("seqid")
        .and_then(FieldValue::as_u64)
        .expect("seqid resolved")
}

#[test]
fn test_concurrent_seqids_are_consecutive() {
    let logger = Arc::new(Logger::new("stress"));
    let fields = FieldSet::builtin(&[Field::Seqid]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let fields = fields.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| seqid_of(&logger.info(&fields, "tick")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = Vec::with_capacity(THREADS * PER_THREAD);
    for handle in handles {
        let seqids = handle.join().expect("worker panicked");
        // Each thread sees its own ids in increasing order
        assert!(seqids.windows(2).all(|pair| pair[0] < pair[1]));
        all.extend(seqids);
    }

    let total = (THREADS * PER_THREAD) as u64;
    let unique: BTreeSet<u64> = all.iter().copied().collect();
    assert_eq!(all.len() as u64, total, "Lost emissions");
    assert_eq!(unique.len() as u64, total, "Duplicate sequence ids");
    assert_eq!(unique.first(), Some(&1));
    assert_eq!(unique.last(), Some(&total));
    assert_eq!(logger.seqid(), total);
    assert_eq!(logger.metrics().records_built(), total);
}

#[test]
fn test_three_concurrent_messages_keep_their_seqids() {
    let logger = Logger::new("L");
    let fields = logger.field_set(["seqid", "time", "message"]).unwrap();

    let results: Vec<ResolvedFields> = thread::scope(|scope| {
        let handles: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|message| {
                let logger = &logger;
                let fields = &fields;
                scope.spawn(move || logger.info(fields, message))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    let seqids: BTreeSet<u64> = results.iter().map(seqid_of).collect();
    assert_eq!(seqids, BTreeSet::from([1, 2, 3]));

    let messages: BTreeSet<String> = results
        .iter()
        .map(|r| r.get("message").unwrap().to_string())
        .collect();
    assert_eq!(
        messages,
        BTreeSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert_eq!(logger.metrics().runtime_captures(), 0);
}

#[test]
fn test_no_cross_talk_between_concurrent_records() {
    let logger = Logger::new("isolation");
    let fields = logger
        .field_set(["seqid", "message", "thread", "lineno"])
        .unwrap();

    let results: Vec<(String, ResolvedFields)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|worker| {
                let logger = &logger;
                let fields = &fields;
                thread::Builder::new()
                    .name(format!("worker-{}", worker))
                    .spawn_scoped(scope, move || {
                        (0..100)
                            .map(|i| {
                                let message = format!("worker-{} message {}", worker, i);
                                let resolved = logger.debug(fields, message.clone());
                                (message, resolved)
                            })
                            .collect::<Vec<_>>()
                    })
                    .expect("spawn worker")
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    let mut seen: HashMap<u64, String> = HashMap::new();
    for (message, resolved) in &results {
        assert_eq!(resolved.get("message"), Some(&FieldValue::from(message.as_str())));

        let worker = message.split(' ').next().unwrap();
        assert_eq!(resolved.get("thread"), Some(&FieldValue::from(worker)));

        let lineno = resolved.get("lineno").and_then(FieldValue::as_i64).unwrap();
        assert!(lineno > 0);

        let previous = seen.insert(seqid_of(resolved), message.clone());
        assert!(previous.is_none(), "Sequence id reused");
    }

    assert_eq!(seen.len(), THREADS * 100);
    assert_eq!(logger.metrics().runtime_captures(), (THREADS * 100) as u64);
}

#[test]
fn test_concurrent_capture_failures_are_counted() {
    let logger = Logger::new("failures");
    let fields = FieldSet::builtin(&[Field::Funcname, Field::Lineno]);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..250 {
                    let resolved = logger.emit(&fields, LogLevel::Warn, "lost", CallSite::unknown());
                    assert_eq!(resolved.get("lineno"), Some(&FieldValue::Int(-1)));
                }
            });
        }
    });

    assert_eq!(logger.metrics().runtime_captures(), 1000);
    assert_eq!(logger.metrics().capture_failures(), 1000);
}
