//! Location lifecycle tests
//!
//! These tests verify that:
//! - Stopping a location ends its samples after the in-flight tick
//! - Other locations keep running
//! - Restarting spawns a fresh generator

use std::time::Duration;

use disaster_monitoring::{catalog::MetricCatalog, supervisor::LocationState};

use crate::helpers::*;

const FAST_INTERVAL: Duration = Duration::from_millis(20);

#[tokio::test]
async fn test_stop_location_ends_its_samples() {
    let supervisor =
        create_test_supervisor(&["A", "B"], MetricCatalog::default(), FAST_INTERVAL, 0.05);
    let mut subscription = supervisor.context().hub.subscribe();

    supervisor.start().await;

    // wait until B has produced something
    loop {
        if recv_sample(&mut subscription).await.location == "B" {
            break;
        }
    }

    let handle = supervisor.stop("B").await.expect("B was running");
    assert!(!supervisor.is_running("B").await);
    assert!(supervisor.is_running("A").await);

    tokio::time::timeout(Duration::from_secs(1), handle.stopped())
        .await
        .expect("generator B should exit after its current tick");

    // discard everything published up to now, including a possible last tick of B
    while subscription.try_recv().is_some() {}

    tokio::time::sleep(FAST_INTERVAL * 5).await;

    let mut from_a = 0;
    while let Some(sample) = subscription.try_recv() {
        assert_ne!(sample.location, "B", "no samples for B after stop");
        from_a += 1;
    }
    assert!(from_a > 0, "A keeps publishing");

    supervisor.stop_all().await;
}

#[tokio::test]
async fn test_stopped_location_reported_in_status() {
    let supervisor =
        create_test_supervisor(&["A", "B", "C"], MetricCatalog::default(), QUIET_INTERVAL, 0.05);
    supervisor.start().await;
    supervisor.stop("B").await;

    let states: Vec<_> = supervisor
        .status()
        .await
        .into_iter()
        .map(|s| (s.location, s.state))
        .collect();

    assert_eq!(
        states,
        vec![
            ("A".to_string(), LocationState::Running),
            ("B".to_string(), LocationState::Stopped),
            ("C".to_string(), LocationState::Running),
        ]
    );

    supervisor.stop_all().await;
}

#[tokio::test]
async fn test_restart_after_stop_publishes_again() {
    let supervisor = create_test_supervisor(&["A"], MetricCatalog::default(), QUIET_INTERVAL, 0.0);
    let mut subscription = supervisor.context().hub.subscribe();

    supervisor.start().await;
    let _ = recv_sample(&mut subscription).await;

    let old = supervisor.stop("A").await.unwrap();
    old.stopped().await;
    assert!(subscription.try_recv().is_none());

    assert_eq!(supervisor.start().await, 1);
    let sample = recv_sample(&mut subscription).await;
    assert_eq!(sample.location, "A");

    supervisor.stop_all().await;
}

#[tokio::test]
async fn test_stop_all_ends_every_generator() {
    let supervisor = create_test_supervisor(
        &["A", "B", "C", "D", "E"],
        MetricCatalog::default(),
        FAST_INTERVAL,
        0.05,
    );
    let hub = supervisor.context().hub.clone();
    let mut subscription = hub.subscribe();
    supervisor.start().await;
    let _ = recv_sample(&mut subscription).await;

    for handle in supervisor.stop_all().await {
        tokio::time::timeout(Duration::from_secs(1), handle.stopped())
            .await
            .unwrap();
    }

    while subscription.try_recv().is_some() {}
    tokio::time::sleep(FAST_INTERVAL * 5).await;
    assert!(subscription.try_recv().is_none());
    assert!(supervisor.running().await.is_empty());
}
