//! Worker Pool Behaviour Tests
//!
//! End-to-end checks of queue ordering, size reporting, fault isolation and
//! graceful stop through the public Processor API.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use workpool_core::application::{LifecycleState, Processor, ProcessorConfig};
use workpool_core::port::ProcessError;

const TICK: Duration = Duration::from_millis(25);

async fn eventually(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let until = Instant::now() + deadline;
    while Instant::now() < until {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    cond()
}

fn collector<T: Send + 'static>() -> (
    Arc<Mutex<Vec<T>>>,
    impl Fn(T) -> Result<(), ProcessError> + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |item: T| {
        sink.lock().unwrap().push(item);
        Ok(())
    })
}

/// Scenario: one worker, item "A" is picked up within a tick
#[tokio::test]
async fn test_single_worker_scenario() {
    let (seen, process) = collector::<String>();
    let processor = Processor::with_config(
        1,
        ProcessorConfig::new(1).with_tick_interval(TICK),
        process,
    )
    .unwrap();
    processor.start(CancellationToken::new()).unwrap();

    assert_eq!(processor.enqueue("A".to_string()).unwrap(), 1);
    assert_eq!(processor.queue_size(), 1);

    assert!(eventually(Duration::from_secs(2), || seen.lock().unwrap().len() == 1).await);
    assert_eq!(seen.lock().unwrap().as_slice(), ["A".to_string()]);
    assert_eq!(processor.queue_size(), 0);

    processor.stop().await;
}

/// Scenario: three workers drain five rapidly enqueued items
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_workers_drain_five_items() {
    let (seen, process) = collector::<u32>();
    let processor = Processor::with_config(
        2,
        ProcessorConfig::new(3).with_tick_interval(Duration::from_millis(200)),
        process,
    )
    .unwrap();
    processor.start(CancellationToken::new()).unwrap();

    for i in 0..5 {
        processor.enqueue(i).unwrap();
    }
    assert_eq!(processor.queue_size(), 5);

    assert!(eventually(Duration::from_secs(5), || processor.queue_size() == 0).await);
    assert!(eventually(Duration::from_secs(2), || seen.lock().unwrap().len() == 5).await);
    processor.stop().await;

    let mut items = seen.lock().unwrap().clone();
    items.sort_unstable();
    assert_eq!(items, vec![0, 1, 2, 3, 4]);
}

/// Concurrent submitters: every enqueue counts once and every item is
/// processed exactly once
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_enqueue_no_loss_or_duplication() {
    let (seen, process) = collector::<u32>();
    let processor = Arc::new(
        Processor::with_config(
            1,
            ProcessorConfig::new(4).with_tick_interval(Duration::from_millis(5)),
            process,
        )
        .unwrap(),
    );

    let mut submitters = Vec::new();
    for task in 0..8u32 {
        let processor = Arc::clone(&processor);
        submitters.push(tokio::spawn(async move {
            let mut sizes = Vec::new();
            for i in 0..25u32 {
                sizes.push(processor.enqueue(task * 100 + i).unwrap());
            }
            sizes
        }));
    }

    let mut reported = Vec::new();
    for submitter in submitters {
        reported.extend(submitter.await.unwrap());
    }

    // Nothing dequeued yet: reported sizes are exactly 1..=200
    assert_eq!(processor.queue_size(), 200);
    reported.sort_unstable();
    assert_eq!(reported, (1..=200).collect::<Vec<usize>>());

    processor.start(CancellationToken::new()).unwrap();
    assert!(eventually(Duration::from_secs(10), || seen.lock().unwrap().len() == 200).await);
    processor.stop().await;

    let items = seen.lock().unwrap().clone();
    let unique: HashSet<_> = items.iter().copied().collect();
    assert_eq!(items.len(), 200);
    assert_eq!(unique.len(), 200);
}

/// A single worker hands items to the callback in insertion order
#[tokio::test]
async fn test_fifo_with_single_worker() {
    let (seen, process) = collector::<usize>();
    let processor = Processor::with_config(
        1,
        ProcessorConfig::new(1).with_tick_interval(Duration::from_millis(5)),
        process,
    )
    .unwrap();

    for i in 0..20 {
        processor.enqueue(i).unwrap();
    }
    processor.start(CancellationToken::new()).unwrap();

    assert!(eventually(Duration::from_secs(5), || seen.lock().unwrap().len() == 20).await);
    processor.stop().await;
    assert_eq!(*seen.lock().unwrap(), (0..20).collect::<Vec<_>>());
}

/// A panicking callback takes out only its own worker
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fault_isolation() {
    let processor = Processor::with_config(
        1,
        ProcessorConfig::new(3).with_tick_interval(TICK),
        |item: &'static str| {
            if item == "poison" {
                panic!("cannot handle poison");
            }
            Ok(())
        },
    )
    .unwrap();
    processor.enqueue("poison").unwrap();
    processor.start(CancellationToken::new()).unwrap();

    assert!(eventually(Duration::from_secs(2), || processor.live_workers() == 2).await);

    for _ in 0..6 {
        processor.enqueue("fine").unwrap();
    }
    assert!(eventually(Duration::from_secs(3), || processor.stats().processed == 6).await);

    let stats = processor.stats();
    assert_eq!(stats.faulted, 1);
    assert_eq!(stats.live_workers, 2);
    assert_eq!(stats.worker_count, 3);

    processor.stop().await;
    assert_eq!(processor.live_workers(), 0);
}

/// After stop returns nothing is dequeued any more
#[tokio::test]
async fn test_graceful_stop_leaves_items() {
    let (seen, process) = collector::<u32>();
    let processor = Processor::with_config(
        1,
        ProcessorConfig::new(2).with_tick_interval(TICK),
        process,
    )
    .unwrap();
    processor.start(CancellationToken::new()).unwrap();
    processor.stop().await;

    assert_eq!(processor.state(), LifecycleState::Stopped);
    for i in 0..3 {
        processor.enqueue(i).unwrap();
    }
    sleep(TICK * 4).await;

    assert_eq!(processor.queue_size(), 3);
    assert!(seen.lock().unwrap().is_empty());
}
