use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog = check_catalog(&state);
    health.services.insert("catalog".to_string(), catalog.clone());

    health.services.insert(
        "booking_sessions".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} active", state.bookings.len())),
        },
    );
    health.services.insert(
        "review_drafts".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} active", state.reviews.len())),
        },
    );

    if catalog.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(state: &AppState) -> ServiceStatus {
    let hotels = state.catalog.hotels.len();
    if hotels == 0 {
        return ServiceStatus {
            status: "error".to_string(),
            details: Some("No hotels loaded".to_string()),
        };
    }

    ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!("{} hotels loaded", hotels)),
    }
}
