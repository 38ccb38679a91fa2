mod common;

use actix_web::{http::StatusCode, test};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::{get, money, put_json, TestApp};

#[actix_rt::test]
async fn test_get_profile() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let profile: Value =
        test::call_and_read_body_json(&app, get("/api/profile").to_request()).await;
    assert_eq!(profile["name"], "Sarah Johnson");
    assert_eq!(profile["loyalty_points"], 8750);
    assert_eq!(profile["loyalty_tier"], "Gold");
    assert_eq!(profile["languages"].as_array().unwrap().len(), 9);
}

#[actix_rt::test]
async fn test_update_profile() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for (body, message) in [
        (json!({"name": "   "}), "Name cannot be empty"),
        (json!({"email": "sarah@"}), "Please enter a valid email address"),
        (json!({"phone": "555-CALL-NOW"}), "Please enter a valid phone number"),
    ] {
        let resp = test::call_service(&app, put_json("/api/profile", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"], "invalid_profile");
        assert_eq!(error["message"], message);
    }

    let req = put_json(
        "/api/profile",
        json!({"name": " Sarah J. ", "email": "sarah.j@example.com", "phone": "+44 20 7946 0958"}),
    )
    .to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["name"], "Sarah J.");
    assert_eq!(profile["email"], "sarah.j@example.com");
    assert_eq!(profile["phone"], "+44 20 7946 0958");

    // Only the fields sent are changed; an empty phone clears it
    let req = put_json("/api/profile", json!({"phone": ""})).to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert!(profile["phone"].is_null());
    assert_eq!(profile["name"], "Sarah J.");
}

#[actix_rt::test]
async fn test_update_language() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = put_json("/api/profile/language", json!({"language": "fr"})).to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["language"], "fr");

    let req = put_json("/api/profile/language", json!({"language": "tlh"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_language");
}

#[actix_rt::test]
async fn test_trips_and_loyalty() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let trips: Value =
        test::call_and_read_body_json(&app, get("/api/profile/trips").to_request()).await;
    assert_eq!(trips.as_array().unwrap().len(), 3);

    let req = get("/api/profile/trips?status=completed").to_request();
    let completed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(completed.as_array().unwrap().len(), 2);
    assert!(completed
        .as_array()
        .unwrap()
        .iter()
        .all(|trip| trip["status"] == "completed"));

    let resp = test::call_service(&app, get("/api/profile/trips?status=lost").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let loyalty: Value =
        test::call_and_read_body_json(&app, get("/api/profile/loyalty").to_request()).await;
    assert_eq!(loyalty["points"], 8750);
    assert_eq!(loyalty["tier"]["name"], "Gold");
    assert_eq!(loyalty["next_tier"]["name"], "Platinum");
    assert_eq!(loyalty["points_to_next"], 6250);
    assert_eq!(money(&loyalty["progress_percent"]), dec!(37.5));
}
