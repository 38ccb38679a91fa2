#![allow(dead_code)]

use actix_web::{http::StatusCode, test, web, App};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Duration;

use stayfinder_api::{config::AppConfig, routes, state::AppState};

pub const POLICIES: [&str; 4] = ["terms", "privacy", "cancellation", "payment"];

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    /// Real routes and fixtures, no simulated delays.
    pub fn new() -> Self {
        Self::with_config(AppConfig::without_delays())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            state: web::Data::new(AppState::new(config)),
        }
    }

    /// Completing a booking takes `delay`, or gives up after `timeout`.
    pub fn with_completion_delay(delay: Duration, timeout: Duration) -> Self {
        let mut config = AppConfig::without_delays();
        config.delays.complete_booking = delay;
        config.delays.timeout = timeout;
        Self::with_config(config)
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }
}

/// Grand Palace Hotel, Deluxe City View, 15-18 Dec 2024.
pub fn paris_selection() -> Value {
    json!({
        "hotel_id": 1,
        "room_id": 1,
        "check_in": "2024-12-15",
        "check_out": "2024-12-18",
        "adults": 2,
        "children": 0
    })
}

pub fn valid_guest() -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@example.com",
        "phone": "+1 555 123 4567",
        "special_requests": "Late check-in"
    })
}

/// Money is serialized as a decimal string.
pub fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

pub fn post_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

pub fn put_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::put().uri(uri).set_json(body)
}

pub fn post_empty(uri: &str) -> test::TestRequest {
    test::TestRequest::post().uri(uri)
}

pub fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

/// Fills every step with valid data and stops on the review step.
pub async fn walk_to_review<S>(app: &S, id: &str)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let requests = vec![
        put_json(&format!("/api/bookings/{}/guest-info", id), valid_guest()),
        post_empty(&format!("/api/bookings/{}/advance", id)),
        put_json(&format!("/api/bookings/{}/payment-method", id), json!({"method": "paypal"})),
        post_empty(&format!("/api/bookings/{}/advance", id)),
        post_json(&format!("/api/bookings/{}/verification/send", id), json!({"method": "email"})),
        post_json(&format!("/api/bookings/{}/verification/verify", id), json!({"code": "123456"})),
        post_empty(&format!("/api/bookings/{}/advance", id)),
    ];
    for req in requests {
        let resp = test::call_service(app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    for policy in POLICIES {
        let req = put_json(
            &format!("/api/bookings/{}/policies/{}", id, policy),
            json!({"accepted": true}),
        );
        let resp = test::call_service(app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
