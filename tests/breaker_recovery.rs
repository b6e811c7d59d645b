//! Circuit breaker behaviour observed through the full reservation path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reservation_service::config::{CircuitBreakerConfig, ServiceConfig};
use reservation_service::lifecycle::Application;
use reservation_service::resilience::{CircuitBreakerRegistry, CircuitState};
use reservation_service::Room;

mod common;

fn small_breaker(wait_ms: u64) -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        sliding_window_size: 4,
        minimum_number_of_calls: 4,
        failure_rate_threshold: 50.0,
        wait_duration_in_open_state_ms: wait_ms,
        permitted_calls_in_half_open_state: 2,
        ..Default::default()
    }
}

fn config_for(endpoint: String, breaker: CircuitBreakerConfig) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.rooms.endpoint = endpoint;
    config.rooms.timeout_ms = 500;
    config
        .circuit_breakers
        .insert(config.rooms.circuit_breaker.clone(), breaker);
    config
}

#[tokio::test]
async fn test_open_breaker_stops_calling_backend() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (503, "service unavailable".to_string())
        }
    })
    .await;
    let config = config_for(common::endpoint(addr), small_breaker(60_000));
    let app = Application::build(config).unwrap();

    for _ in 0..4 {
        assert_eq!(app.new_reservation().await.room, Some(Room::fallback()));
    }
    let breaker = app.registry().circuit_breaker("go/slow");
    assert_eq!(breaker.state(), CircuitState::Open);
    assert_eq!(hits.load(Ordering::SeqCst), 4);

    for _ in 0..5 {
        assert_eq!(app.new_reservation().await.room, Some(Room::fallback()));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert_eq!(breaker.metrics().not_permitted_calls, 5);
}

#[tokio::test]
async fn test_breaker_recovers_after_wait() {
    let healthy = Arc::new(AtomicBool::new(false));
    let flag = healthy.clone();
    let addr = common::start_programmable_backend(move || {
        let flag = flag.clone();
        async move {
            if flag.load(Ordering::SeqCst) {
                (200, r#"[{"id":3,"name":"Annex","description":""}]"#.to_string())
            } else {
                (200, "not json".to_string())
            }
        }
    })
    .await;
    let app = Application::build(config_for(common::endpoint(addr), small_breaker(200))).unwrap();
    let breaker = app.registry().circuit_breaker("go/slow");

    for _ in 0..4 {
        app.new_reservation().await;
    }
    assert_eq!(breaker.state(), CircuitState::Open);

    healthy.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let first = app.new_reservation().await;
    assert_eq!(first.room.map(|r| r.id), Some(3));
    assert_eq!(breaker.state(), CircuitState::HalfOpen);

    let second = app.new_reservation().await;
    assert_eq!(second.room.map(|r| r.id), Some(3));
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_applications_sharing_registry_share_breaker() {
    let addr = common::start_mock_backend("garbage").await;
    let config = config_for(common::endpoint(addr), small_breaker(60_000));
    let registry = Arc::new(CircuitBreakerRegistry::from_config(&config));

    let a = Application::with_registry(config.clone(), registry.clone()).unwrap();
    let b = Application::with_registry(config, registry.clone()).unwrap();

    for _ in 0..2 {
        a.new_reservation().await;
        b.new_reservation().await;
    }

    assert_eq!(registry.circuit_breaker("go/slow").state(), CircuitState::Open);
    assert_eq!(registry.all().len(), 1);
    assert_eq!(registry.reset_all(), 1);
    assert_eq!(registry.circuit_breaker("go/slow").state(), CircuitState::Closed);
}
