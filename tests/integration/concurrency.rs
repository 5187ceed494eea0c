//! Concurrency and race condition tests
//!
//! These tests verify thread-safety and concurrent operation:
//! - Concurrent appends interleaved with drains lose and duplicate nothing
//! - Many generators ticking at once record every alert
//! - Subscribers coming and going while samples are published

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use disaster_monitoring::{
    actors::generator::GeneratorHandle, alerts::AlertBuffer, catalog::MetricCatalog,
    sampler::RngSampler,
};

use crate::helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_and_drains_partition_alerts() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 500;

    let buffer = AlertBuffer::new();
    let done = Arc::new(AtomicBool::new(false));

    let mut writers = vec![];
    for writer in 0..WRITERS {
        let buffer = buffer.clone();
        writers.push(tokio::spawn(async move {
            for i in 0..PER_WRITER {
                let id = (writer * PER_WRITER + i) as f64;
                buffer
                    .append(create_test_alert(&format!("W{writer}"), id))
                    .await;
                if i % 50 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }

    let drainer = {
        let buffer = buffer.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut drains = vec![];
            while !done.load(Ordering::SeqCst) {
                drains.push(buffer.drain_all().await);
                tokio::task::yield_now().await;
            }
            drains
        })
    };

    for writer in writers {
        writer.await.unwrap();
    }
    done.store(true, Ordering::SeqCst);

    let mut drains = drainer.await.unwrap();
    drains.push(buffer.drain_all().await);

    let all: Vec<_> = drains.into_iter().flatten().collect();
    assert_eq!(all.len(), WRITERS * PER_WRITER, "every alert drained once");

    let unique: HashSet<u64> = all.iter().map(|a| a.value as u64).collect();
    assert_eq!(unique.len(), WRITERS * PER_WRITER, "no alert drained twice");

    // each writer's alerts come out in the order they were appended
    for writer in 0..WRITERS {
        let location = format!("W{writer}");
        let values: Vec<f64> = all
            .iter()
            .filter(|a| a.location == location)
            .map(|a| a.value)
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    assert!(buffer.drain_all().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generators_record_every_spike() {
    const LOCATIONS: usize = 5;
    const TICKS: usize = 20;

    let context = create_test_context(MetricCatalog::default(), QUIET_INTERVAL, 1.0);
    let alerts = context.alerts.clone();
    let metrics = context.catalog.len();
    let mut subscription = context.hub.subscribe();

    let handles: Vec<_> = (0..LOCATIONS)
        .map(|i| {
            GeneratorHandle::spawn(
                format!("L{i}"),
                RngSampler::seeded(i as u64),
                context.clone(),
            )
        })
        .collect();

    // the immediate first tick of every generator
    for _ in 0..LOCATIONS {
        let _ = recv_sample(&mut subscription).await;
    }

    let mut tasks = vec![];
    for handle in &handles {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..TICKS {
                handle.tick_now().await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let drained = alerts.drain_all().await;
    assert_eq!(drained.len(), LOCATIONS * (TICKS + 1) * metrics);

    for handle in handles {
        handle.shutdown().await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subscribe_churn_during_publishing() {
    let supervisor = create_test_supervisor(
        &["A", "B", "C"],
        MetricCatalog::default(),
        Duration::from_millis(5),
        0.05,
    );
    let hub = supervisor.context().hub.clone();
    let mut steady = hub.subscribe();

    supervisor.start().await;

    let churn = {
        let hub = hub.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let mut subscription = hub.subscribe();
                let _ = subscription.try_recv();
                hub.unsubscribe(subscription);
                tokio::task::yield_now().await;
            }
        })
    };

    let mut received = 0;
    while received < 30 {
        let _ = recv_sample(&mut steady).await;
        received += 1;
    }

    churn.await.unwrap();
    assert_eq!(hub.subscriber_count(), 1);

    supervisor.stop_all().await;
}
