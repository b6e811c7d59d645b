//! End-to-end reservation scenarios against a mock room service.

use std::time::{Duration, Instant};

use reservation_service::config::{parse_config, ServiceConfig};
use reservation_service::lifecycle::{Application, Shutdown};
use reservation_service::Room;

mod common;

fn config_for(endpoint: String, timeout_ms: u64) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.rooms.endpoint = endpoint;
    config.rooms.timeout_ms = timeout_ms;
    config
}

#[tokio::test]
async fn test_first_room_is_embedded() {
    let addr =
        common::start_mock_backend(r#"[{"id":5,"name":"Hall A","description":"big"},{"id":6,"name":"Hall B","description":""}]"#)
            .await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    let reservation = app.new_reservation().await;

    let room = reservation.room.expect("room should be present");
    assert_eq!(room.id, 5);
    assert_eq!(room.name, "Hall A");
    assert_eq!(room.description, "big");
    assert_eq!(reservation.title, "テスト");
}

#[tokio::test]
async fn test_empty_list_leaves_room_absent() {
    let addr = common::start_mock_backend("[]").await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    let reservation = app.new_reservation().await;

    assert_eq!(reservation.room, None);
    let json = serde_json::to_value(&reservation).unwrap();
    assert!(json["room"].is_null());
}

#[tokio::test]
async fn test_null_body_leaves_room_absent() {
    for body in ["null", "[null]", r#"[null,{"id":4,"name":"Side"}]"#] {
        let addr = common::start_mock_backend(body).await;
        let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

        assert_eq!(app.new_reservation().await.room, None, "body {}", body);
    }
}

#[tokio::test]
async fn test_error_status_with_room_list_embeds_room() {
    let addr = common::start_programmable_backend(|| async {
        (503, r#"[{"id":1,"name":"x"}]"#.to_string())
    })
    .await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    let room = app.new_reservation().await.room;

    assert_eq!(room.map(|r| r.id), Some(1));
}

#[tokio::test]
async fn test_unreachable_endpoint_uses_fallback_within_timeout() {
    let endpoint = common::endpoint(common::closed_port());
    let app = Application::build(config_for(endpoint, 1000)).unwrap();

    let start = Instant::now();
    let reservation = app.new_reservation().await;

    assert!(start.elapsed() < Duration::from_millis(1500));
    assert_eq!(reservation.room, Some(Room::fallback()));
}

#[tokio::test]
async fn test_slow_endpoint_times_out_to_fallback() {
    let addr = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, r#"[{"id":9,"name":"Too late","description":""}]"#.to_string())
    })
    .await;
    let app = Application::build(config_for(common::endpoint(addr), 200)).unwrap();

    let start = Instant::now();
    let reservation = app.new_reservation().await;

    assert!(start.elapsed() < Duration::from_millis(1000), "took {:?}", start.elapsed());
    assert_eq!(reservation.room, Some(Room::fallback()));
}

#[tokio::test]
async fn test_malformed_body_uses_fallback() {
    let addr = common::start_mock_backend("<html>busy</html>").await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    assert_eq!(app.new_reservation().await.room, Some(Room::fallback()));
}

#[tokio::test]
async fn test_error_status_with_error_document_uses_fallback() {
    let addr = common::start_programmable_backend(|| async {
        (500, r#"{"error":"internal"}"#.to_string())
    })
    .await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    assert_eq!(app.new_reservation().await.room, Some(Room::fallback()));
}

#[tokio::test]
async fn test_reservation_ids_unique_and_dates_well_formed() {
    let addr = common::start_mock_backend("[]").await;
    let app = Application::build(config_for(common::endpoint(addr), 1000)).unwrap();

    let a = app.new_reservation().await;
    let b = app.new_reservation().await;

    assert_ne!(a.id, b.id);
    for date in [&a.begin_date, &b.begin_date] {
        assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok(), "{}", date);
        assert_eq!(date.len(), 25, "{}", date);
    }
}

#[tokio::test]
async fn test_cancellation_aborts_lookup() {
    let addr = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "[]".to_string())
    })
    .await;
    let app = Application::build(config_for(common::endpoint(addr), 5000)).unwrap();
    let shutdown = Shutdown::new();
    let mut cancel = shutdown.subscribe();

    let start = Instant::now();
    let trigger = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();
    };
    let (reservation, _) = tokio::join!(
        app.reservations().new_reservation_until_cancelled(&mut cancel),
        trigger
    );

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(reservation.room, Some(Room::fallback()));
}

#[tokio::test]
async fn test_application_from_toml() {
    let addr = common::start_mock_backend(r#"[{"id":12,"name":"Loft"}]"#).await;
    let config = parse_config(&format!(
        r#"
        [rooms]
        endpoint = "{}"
        timeout_ms = 800

        [reservation]
        title = "Offsite"
        "#,
        common::endpoint(addr)
    ))
    .unwrap();
    let app = Application::build(config).unwrap();

    let reservation = app.new_reservation().await;

    assert_eq!(reservation.title, "Offsite");
    assert_eq!(
        reservation.room,
        Some(Room {
            id: 12,
            name: "Loft".into(),
            description: String::new(),
        })
    );
}
