use futura::{ErrorKind, FutureBuilder, FutureError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_timeout_completes_before_deadline() {
    let result = FutureBuilder::with_workers(1)
        .run(|| {
            thread::sleep(Duration::from_millis(10));
            123
        })
        .get_timeout(Ok, Err, Duration::from_secs(5));

    assert!(
        matches!(result, Ok(123)),
        "Timed get should return the value when it resolves in time"
    );
}

#[test]
fn test_timeout_expires_without_waiting_for_the_computation() {
    let builder = FutureBuilder::with_workers(1);
    let started = Instant::now();

    let error = builder
        .run(|| {
            thread::sleep(Duration::from_millis(800));
            456
        })
        .wait_timeout(Duration::from_millis(30))
        .unwrap_err();

    assert!(matches!(error, FutureError::DeadlineExceeded(d) if d == Duration::from_millis(30)));
    assert!(
        started.elapsed() < Duration::from_millis(600),
        "Timed get should return shortly after the deadline"
    );
}

#[test]
fn test_timeout_is_reported_through_on_failure() {
    let kind = FutureBuilder::build()
        .run(|| thread::sleep(Duration::from_millis(300)))
        .get_timeout(|_| None, |e| Some(e.kind()), Duration::from_millis(20));

    assert_eq!(kind, Some(ErrorKind::DeadlineExceeded));
}

#[test]
fn test_timeout_does_not_cancel_the_computation() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();

    let builder = FutureBuilder::with_workers(1);
    let result = builder
        .run(move || {
            thread::sleep(Duration::from_millis(100));
            flag.store(true, Ordering::SeqCst);
        })
        .wait_timeout(Duration::from_millis(10));

    assert!(result.unwrap_err().is_deadline_exceeded());

    let deadline = Instant::now() + Duration::from_secs(5);
    while !finished.load(Ordering::SeqCst) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert!(
        finished.load(Ordering::SeqCst),
        "The abandoned computation should still run to completion"
    );
}

#[test]
fn test_timeout_measured_from_the_call() {
    let handle = FutureBuilder::with_workers(1).run(|| {
        thread::sleep(Duration::from_millis(50));
        "late"
    });

    // Most of the computation happens before the timed get starts.
    thread::sleep(Duration::from_millis(30));

    let value = handle.get_timeout(Some, |_| None, Duration::from_secs(2));
    assert_eq!(value, Some("late"));
}

#[test]
fn test_huge_timeout_behaves_like_get() {
    let value = FutureBuilder::with_workers(1)
        .run(|| 9)
        .wait_timeout(Duration::MAX)
        .unwrap();

    assert_eq!(value, 9);
}

#[test]
fn test_failure_before_deadline_is_not_a_timeout() {
    let error = FutureBuilder::with_workers(1)
        .run(|| -> i32 { panic!("early failure") })
        .wait_timeout(Duration::from_secs(5))
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Computation);
}

#[test]
fn test_timeout_on_temporary_builder_returns_at_the_deadline() {
    let started = Instant::now();

    let kind = FutureBuilder::with_workers(1)
        .run(|| "future")
        .map(|s| {
            thread::sleep(Duration::from_millis(1500));
            s
        })
        .get_timeout(|_| None, |e| Some(e.kind()), Duration::from_millis(100));

    assert_eq!(kind, Some(ErrorKind::DeadlineExceeded));
    assert!(
        started.elapsed() < Duration::from_millis(1000),
        "Releasing the last handle must not wait for the running step"
    );
}
