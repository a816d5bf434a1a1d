use futura::{ErrorKind, Executor, FutureBuilder, FutureHandle, Job, PoolBuilder, Strategy, SubmissionRejected, ThreadPool};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Forwards to a real pool while counting submissions.
struct Counting {
    inner: ThreadPool,
    submissions: Arc<AtomicUsize>,
}

impl Executor for Counting {
    fn execute(&self, job: Job) -> Result<(), SubmissionRejected> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(job)
    }
}

fn counting() -> (FutureBuilder, Arc<AtomicUsize>) {
    let submissions = Arc::new(AtomicUsize::new(0));
    let strategy = Strategy::from_executor(Counting {
        inner: PoolBuilder::new().worker_threads(2).fifo().build(),
        submissions: submissions.clone(),
    });

    (FutureBuilder::build_with(strategy), submissions)
}

#[test]
fn test_map_chain_applies_steps_in_order() {
    let builder = FutureBuilder::with_workers(4);
    let trace = Arc::new(Mutex::new(Vec::new()));

    let (t0, t1, t2) = (trace.clone(), trace.clone(), trace.clone());

    let result = builder
        .run(move || {
            t0.lock().unwrap().push("root");
            1
        })
        .map(move |v| {
            t1.lock().unwrap().push("first");
            v + 1
        })
        .map(move |v| {
            t2.lock().unwrap().push("second");
            v * 10
        })
        .wait();

    assert_eq!(result.unwrap(), 20);
    assert_eq!(*trace.lock().unwrap(), vec!["root", "first", "second"]);
}

#[test]
fn test_every_chain_step_is_a_new_submission() {
    let (builder, submissions) = counting();

    let value = builder.run(|| 2).map(|v| v + 1).map(|v| v * 2).wait().unwrap();

    assert_eq!(value, 6);
    assert_eq!(submissions.load(Ordering::SeqCst), 3);
}

#[test]
fn test_failed_root_short_circuits_the_chain() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = invoked.clone();

    let error = FutureBuilder::with_workers(1)
        .try_run(|| Err::<i32, _>(io::Error::other("root failed")))
        .map(move |v| {
            flag.store(true, Ordering::SeqCst);
            v + 1
        })
        .map(|v| v * 2)
        .wait()
        .unwrap_err();

    assert!(!invoked.load(Ordering::SeqCst), "map must not run after a failure");
    assert_eq!(error.kind(), ErrorKind::Computation);
    assert_eq!(error.to_string(), "root failed");
}

#[test]
fn test_failure_is_forwarded_without_new_submissions() {
    let (builder, submissions) = counting();

    let error = builder
        .run(|| -> i32 { panic!("nope") })
        .map(|v| v + 1)
        .map(|v| v + 2)
        .wait()
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Computation);
    assert_eq!(submissions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_step_skips_later_steps() {
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = invoked.clone();

    let error = FutureBuilder::with_workers(1)
        .run(|| 1)
        .try_map(|_| Err::<i32, _>(io::Error::new(io::ErrorKind::InvalidData, "bad input")))
        .map(move |v| {
            flag.store(true, Ordering::SeqCst);
            v
        })
        .wait()
        .unwrap_err();

    assert!(!invoked.load(Ordering::SeqCst));
    assert_eq!(error.kind(), ErrorKind::Continuation);

    let cause = error.cause().unwrap();
    let io_error = cause.downcast_ref::<io::Error>().unwrap();
    assert_eq!(io_error.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_try_map_success_passes_the_value_through() {
    let value = FutureBuilder::with_workers(1)
        .run(|| "42")
        .try_map(|s| s.parse::<u32>())
        .wait()
        .unwrap();

    assert_eq!(value, 42);
}

#[test]
fn test_try_map_parse_error_is_the_cause() {
    let error = FutureBuilder::with_workers(1)
        .run(|| "forty-two")
        .try_map(|s| s.parse::<u32>())
        .wait()
        .unwrap_err();

    assert!(error.cause().unwrap().is::<std::num::ParseIntError>());
}

#[test]
fn test_flat_map_flattens_inner_success() {
    let builder = FutureBuilder::with_workers(2);
    let inner = builder.clone();

    let value = builder
        .run(|| 5)
        .flat_map(move |v| inner.run(move || v * 3))
        .map(|v| v + 1)
        .wait()
        .unwrap();

    assert_eq!(value, 16);
}

#[test]
fn test_flat_map_forwards_inner_failure_unchanged() {
    let builder = FutureBuilder::with_workers(2);
    let inner = builder.clone();

    let error = builder
        .run(|| 5)
        .flat_map(move |_| inner.try_run(|| Err::<i32, _>(io::Error::other("inner failed"))))
        .wait()
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Computation);
    assert_eq!(error.to_string(), "inner failed");
}

#[test]
fn test_flat_map_panic_is_a_continuation_failure() {
    let error = FutureBuilder::with_workers(1)
        .run(|| 5)
        .flat_map(|_| -> futura::FutureHandle<i32> { panic!("no inner handle") })
        .wait()
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Continuation);
    assert_eq!(error.to_string(), "no inner handle");
}

#[test]
fn test_try_flat_map_error_is_a_continuation_failure() {
    let error = FutureBuilder::with_workers(1)
        .run(|| 5)
        .try_flat_map(|_| Err::<futura::FutureHandle<i32>, _>(io::Error::other("refused")))
        .wait()
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Continuation);
    assert_eq!(error.to_string(), "refused");
}

#[test]
fn test_try_flat_map_success_resolves_inner() {
    let builder = FutureBuilder::with_workers(1);
    let inner = FutureBuilder::with_workers(1);

    let value = builder
        .run(|| "7")
        .try_flat_map(move |s| s.parse::<i32>().map(|v| inner.run(move || v + 1)))
        .wait()
        .unwrap();

    assert_eq!(value, 8);
}

#[test]
fn test_map_on_resolved_handle() {
    let builder = FutureBuilder::with_workers(1);
    let handle = builder.run(|| 3);

    while !handle.is_done() {
        std::thread::yield_now();
    }

    assert_eq!(handle.map(|v| v * v).wait().unwrap(), 9);
}

#[test]
fn test_deep_chain_resolves() {
    let mut handle = FutureBuilder::with_workers(2).run(|| 0u64);

    for _ in 0..200 {
        handle = handle.map(|v| v + 1);
    }

    assert_eq!(handle.wait().unwrap(), 200);
}

#[test]
fn test_flat_map_onto_a_temporary_pool() {
    let builder = FutureBuilder::with_workers(1);

    for _ in 0..50 {
        let length = builder
            .run(|| "future")
            .flat_map(|s| FutureBuilder::with_workers(1).run(move || s.len()))
            .get(Ok, |e| Err(e.kind()));

        assert_eq!(length, Ok(6));
    }
}

fn countdown(builder: FutureBuilder, n: usize) -> FutureHandle<usize> {
    if n == 0 {
        return builder.run(|| 0);
    }

    let next = builder.clone();
    builder
        .run(move || n - 1)
        .flat_map(move |m| countdown(next, m).map(|depth| depth + 1))
}

#[test]
fn test_recursive_flat_map_resolves() {
    let value = countdown(FutureBuilder::with_workers(2), 100).wait().unwrap();

    assert_eq!(value, 100);
}
