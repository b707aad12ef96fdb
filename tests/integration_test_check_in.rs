mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn backdate_check_in(app: &TestApp, guest_id: &str, minutes: i64) {
    let earlier = Utc::now() - Duration::minutes(minutes);
    sqlx::query("UPDATE guests SET check_in_time = ? WHERE id = ?")
        .bind(earlier)
        .bind(guest_id)
        .execute(&app.pool)
        .await
        .expect("Failed to backdate check-in time");
}

async fn fetch_guest(app: &TestApp, guest_id: &str) -> Value {
    let (status, body) = app.get_json(&format!("/api/v1/guests/{}", guest_id)).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_scan_checks_in_fresh_guest() {
    let app = TestApp::new().await;
    let (status, guest) = app.create_guest(json!({"name": "jane doe"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(guest["name"], "Jane Doe");
    assert_eq!(guest["attendance_status"], "NOT_ATTENDED");

    let unique_id = guest["unique_id"].as_str().unwrap();
    let (status, body) = app.scan(unique_id).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "CHECKED_IN");
    assert_eq!(body["message"], "Check-in successful");
    assert_eq!(body["guest"]["attendance_status"], "ATTENDED");
    assert!(!body["guest"]["check_in_time"].is_null());
    assert_eq!(body["guest"]["food_status"], "NOT_TAKEN");
}

#[tokio::test]
async fn test_rescan_within_cooldown_blocks_food_without_mutation() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Max"})).await;
    let unique_id = guest["unique_id"].as_str().unwrap();
    let guest_id = guest["id"].as_str().unwrap();

    let (_, first) = app.scan(unique_id).await;
    assert_eq!(first["outcome"], "CHECKED_IN");

    let (status, second) = app.scan(unique_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"], "FOOD_BLOCKED_COOLDOWN");
    assert_eq!(second["message"], "Wait 2 Mins");
    let details = second["details"].as_str().unwrap();
    assert!(details.starts_with("Checked in 0m"), "details: {}", details);
    assert!(details.contains("Please wait 2 mins for food."));

    // Blocked scans must not mutate anything.
    let current = fetch_guest(&app, guest_id).await;
    assert_eq!(current["food_status"], "NOT_TAKEN");
    assert!(current["food_time"].is_null());
    assert_eq!(current["check_in_time"], first["guest"]["check_in_time"]);
}

#[tokio::test]
async fn test_blocked_scan_reports_elapsed_minutes_and_seconds() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Lena"})).await;
    let unique_id = guest["unique_id"].as_str().unwrap();
    let guest_id = guest["id"].as_str().unwrap();

    app.scan(unique_id).await;
    backdate_check_in(&app, guest_id, 1).await;

    let (_, body) = app.scan(unique_id).await;
    assert_eq!(body["outcome"], "FOOD_BLOCKED_COOLDOWN");
    let details = body["details"].as_str().unwrap();
    assert!(details.starts_with("Checked in 1m"), "details: {}", details);
}

#[tokio::test]
async fn test_food_issued_after_cooldown_then_terminal() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Omar"})).await;
    let unique_id = guest["unique_id"].as_str().unwrap();
    let guest_id = guest["id"].as_str().unwrap();

    app.scan(unique_id).await;
    backdate_check_in(&app, guest_id, 3).await;

    let (status, body) = app.scan(unique_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "FOOD_ISSUED");
    assert_eq!(body["message"], "Food issued successfully");
    assert_eq!(body["guest"]["food_status"], "TAKEN");
    assert!(!body["guest"]["food_time"].is_null());

    // Terminal state is idempotent under repeated scans.
    for _ in 0..3 {
        let (status, again) = app.scan(unique_id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["outcome"], "ALREADY_PROCESSED");
        assert_eq!(
            again["details"],
            "Guest has already checked in and taken food."
        );
        assert_eq!(again["guest"]["food_time"], body["guest"]["food_time"]);
    }
}

#[tokio::test]
async fn test_food_issued_at_exact_cooldown_boundary() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Ada"})).await;
    let unique_id = guest["unique_id"].as_str().unwrap();
    let guest_id = guest["id"].as_str().unwrap();

    app.scan(unique_id).await;
    backdate_check_in(&app, guest_id, 2).await;

    let (_, body) = app.scan(unique_id).await;
    assert_eq!(body["outcome"], "FOOD_ISSUED");
}

#[tokio::test]
async fn test_unknown_id_is_not_found_and_mutates_nothing() {
    let app = TestApp::new().await;

    for raw in ["NOPE99", " nope99 ", "\tNoPe99\n"] {
        let (status, body) = app.scan(raw).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["outcome"], "NOT_FOUND");
        assert_eq!(body["message"], "Guest not found");
        assert!(body.get("guest").is_none());
    }

    let (_, list) = app.get_json("/api/v1/guests").await;
    assert_eq!(list["stats"]["total"], 0);
}

#[tokio::test]
async fn test_blank_id_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app.scan("   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lookup_is_case_and_whitespace_insensitive() {
    let app = TestApp::new().await;
    let (_, guest) = app
        .create_guest(json!({"name": "Priya", "unique_id": "AB12CD"}))
        .await;
    assert_eq!(guest["unique_id"], "AB12CD");

    let (status, body) = app.scan(" ab12cd ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "CHECKED_IN");
    assert_eq!(body["guest"]["unique_id"], "AB12CD");
}

#[tokio::test]
async fn test_admin_forced_attendance_without_time_allows_food() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Nils"})).await;
    let guest_id = guest["id"].as_str().unwrap();
    let unique_id = guest["unique_id"].as_str().unwrap();

    // Operator correction path: mark attended directly, no check-in time.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/v1/guests/{}", guest_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"attendance_status": "ATTENDED"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patched = parse_body(response).await;
    assert_eq!(patched["attendance_status"], "ATTENDED");
    assert!(patched["check_in_time"].is_null());

    let (_, body) = app.scan(unique_id).await;
    assert_eq!(body["outcome"], "FOOD_ISSUED");
}

#[tokio::test]
async fn test_concurrent_scans_check_in_exactly_once() {
    let app = TestApp::new().await;
    let (_, guest) = app.create_guest(json!({"name": "Rika"})).await;
    let unique_id = guest["unique_id"].as_str().unwrap().to_string();

    let (first, second) = tokio::join!(app.scan(&unique_id), app.scan(&unique_id));

    let mut outcomes = vec![
        first.1["outcome"].as_str().unwrap().to_string(),
        second.1["outcome"].as_str().unwrap().to_string(),
    ];
    outcomes.sort();

    // One station wins the check-in; the other re-evaluates and hits the
    // food cooldown. Never two CHECKED_IN.
    assert_eq!(outcomes, vec!["CHECKED_IN", "FOOD_BLOCKED_COOLDOWN"]);

    let guest_id = guest["id"].as_str().unwrap();
    let current = fetch_guest(&app, guest_id).await;
    assert_eq!(current["attendance_status"], "ATTENDED");
    assert_eq!(current["food_status"], "NOT_TAKEN");
}
