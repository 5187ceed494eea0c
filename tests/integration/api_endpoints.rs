//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - All REST endpoints return the documented response shapes
//! - The alert endpoint drains the buffer
//! - Location start/stop works and unknown locations are rejected
//! - WebSocket streaming delivers `disaster_data` events

use std::net::SocketAddr;
use std::time::Duration;

use disaster_monitoring::{
    api::{
        AlertsResponse, ApiConfig, ApiState, LocationsResponse, ReadingsResponse, StatsResponse,
        StreamEvent, spawn_api_server,
    },
    catalog::MetricCatalog,
    supervisor::{LocationState, LocationSupervisor},
};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::*;

// Helper to create test API server
async fn spawn_test_api(supervisor: LocationSupervisor) -> SocketAddr {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
        enable_cors: true,
    };

    spawn_api_server(config, ApiState::new(supervisor))
        .await
        .unwrap()
}

fn create_api_supervisor() -> LocationSupervisor {
    create_test_supervisor(&["A", "B", "C"], MetricCatalog::default(), QUIET_INTERVAL, 0.0)
}

#[tokio::test]
async fn test_banner_endpoints() {
    let addr = spawn_test_api(create_api_supervisor()).await;

    let home = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains("running"));

    let response = reqwest::get(format!("http://{addr}/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let addr = spawn_test_api(create_api_supervisor()).await;

    let response = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_alerts_endpoint_drains_buffer() {
    let supervisor = create_api_supervisor();
    let alerts = supervisor.context().alerts.clone();
    let addr = spawn_test_api(supervisor).await;

    alerts.append(create_test_alert("A", 150.0)).await;
    alerts.append(create_test_alert("C", 180.5)).await;

    let body: AlertsResponse = reqwest::get(format!("http://{addr}/api/alerts"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.alerts.len(), 2);
    assert_eq!(body.alerts[0].location, "A");
    assert_eq!(body.alerts[1].value, 180.5);

    let raw: Value = reqwest::get(format!("http://{addr}/api/alerts"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(raw["status"], "success");
    assert_eq!(raw["alerts"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_alert_wire_format() {
    let supervisor = create_api_supervisor();
    let alerts = supervisor.context().alerts.clone();
    let addr = spawn_test_api(supervisor).await;

    alerts.append(create_test_alert("B", 130.25)).await;

    let raw: Value = reqwest::get(format!("http://{addr}/api/alerts"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let alert = &raw["alerts"][0];
    assert_eq!(alert["location"], "B");
    assert_eq!(alert["disaster_type"], "wind_speed");
    assert_eq!(alert["value"], 130.25);
    assert_eq!(alert["unit"], "km/h");
    assert!(alert["timestamp"].is_string());
}

#[tokio::test]
async fn test_readings_endpoint_synthesizes_every_location() {
    let addr = spawn_test_api(create_api_supervisor()).await;

    let body: ReadingsResponse = reqwest::get(format!("http://{addr}/api/readings"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.status, "success");
    assert_eq!(
        body.readings.keys().cloned().collect::<Vec<_>>(),
        vec!["A", "B", "C"]
    );

    let catalog = MetricCatalog::default();
    for per_metric in body.readings.values() {
        assert_eq!(per_metric.len(), catalog.len());
        for metric in catalog.iter() {
            let reading = &per_metric[&metric.name];
            assert!(reading.value >= metric.min && reading.value <= metric.max);
            assert_eq!(reading.unit, metric.unit);
        }
    }
}

#[tokio::test]
async fn test_readings_do_not_raise_alerts() {
    let supervisor = create_api_supervisor();
    let alerts = supervisor.context().alerts.clone();
    let addr = spawn_test_api(supervisor).await;

    for _ in 0..10 {
        let response = reqwest::get(format!("http://{addr}/api/readings"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert!(alerts.is_empty().await);
}

#[tokio::test]
async fn test_metrics_endpoint_lists_catalog() {
    let addr = spawn_test_api(create_api_supervisor()).await;

    let body: Value = reqwest::get(format!("http://{addr}/api/metrics"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let metrics = body["metrics"].as_array().unwrap();
    assert_eq!(metrics.len(), 5);
    assert_eq!(metrics[2]["name"], "wind_speed");
    assert_eq!(metrics[2]["alert_threshold"], 120.0);
}

#[tokio::test]
async fn test_location_start_and_stop() {
    let supervisor = create_api_supervisor();
    let addr = spawn_test_api(supervisor.clone()).await;
    let client = reqwest::Client::new();

    let body: LocationsResponse = client
        .get(format!("http://{addr}/api/locations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.locations.iter().all(|l| l.state == LocationState::Stopped));

    let body: LocationsResponse = client
        .post(format!("http://{addr}/api/locations/B/start"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let b = body.locations.iter().find(|l| l.location == "B").unwrap();
    assert_eq!(b.state, LocationState::Running);
    assert!(supervisor.is_running("B").await);

    let response = client
        .post(format!("http://{addr}/api/locations/B/stop"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!supervisor.is_running("B").await);
}

#[tokio::test]
async fn test_unknown_location_returns_structured_error() {
    let addr = spawn_test_api(create_api_supervisor()).await;
    let client = reqwest::Client::new();

    for action in ["start", "stop"] {
        let response = client
            .post(format!("http://{addr}/api/locations/Z/{action}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("Z"));
    }
}

#[tokio::test]
async fn test_unknown_route_returns_structured_error() {
    let addr = spawn_test_api(create_api_supervisor()).await;

    let response = reqwest::get(format!("http://{addr}/api/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_stats_endpoint() {
    let supervisor = create_api_supervisor();
    supervisor.start_location("A").await.unwrap();
    supervisor
        .context()
        .alerts
        .append(create_test_alert("A", 125.0))
        .await;
    let addr = spawn_test_api(supervisor.clone()).await;

    let body: StatsResponse = reqwest::get(format!("http://{addr}/api/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.pending_alerts, 1);
    assert_eq!(body.running_locations, vec!["A"]);
    assert_eq!(body.configured_locations, 3);
    assert_eq!(body.metrics, 5);
    assert_eq!(body.subscribers, 0);

    supervisor.stop_all().await;
}

#[tokio::test]
async fn test_websocket_streams_disaster_data() {
    let supervisor = create_api_supervisor();
    let hub = supervisor.context().hub.clone();
    let addr = spawn_test_api(supervisor.clone()).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/api/stream"))
        .await
        .unwrap();

    // the subscription is registered right after the upgrade completes
    tokio::time::timeout(Duration::from_secs(1), async {
        while hub.subscriber_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    supervisor.start_location("C").await.unwrap();

    let message = tokio::time::timeout(Duration::from_secs(1), socket.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let text = match message {
        Message::Text(text) => text,
        other => panic!("expected a text frame, got {other:?}"),
    };
    let event: StreamEvent = serde_json::from_str(&text).unwrap();
    assert_eq!(event.event, "disaster_data");
    assert_eq!(event.data.location, "C");
    assert_eq!(event.data.readings.len(), 5);

    supervisor.stop_all().await;
}

#[tokio::test]
async fn test_websocket_disconnect_releases_subscription() {
    let supervisor = create_api_supervisor();
    let hub = supervisor.context().hub.clone();
    let addr = spawn_test_api(supervisor.clone()).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/api/stream"))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        while hub.subscriber_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    socket.close(None).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        while hub.subscriber_count() != 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("subscription should be released after disconnect");
}
