use actix_web::web;

pub mod bookings;
pub mod error;
pub mod health;
pub mod hotels;
pub mod pricing;
pub mod profile;
pub mod reviews;

use error::ApiError;

fn invalid_input(error: &'static str, message: String) -> actix_web::Error {
    ApiError::bad_request(error, message).into()
}

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| invalid_input("invalid_body", err.to_string()));
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| invalid_input("invalid_query", err.to_string()));

    cfg.app_data(json_config)
        .app_data(query_config)
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/currencies", web::get().to(pricing::list_currencies))
                .service(
                    web::scope("/pricing")
                        .route("/quote", web::post().to(pricing::quote))
                        .route("/convert", web::post().to(pricing::convert)),
                )
                .service(
                    web::scope("/hotels")
                        .route("", web::get().to(hotels::search_hotels))
                        .route("/{id}", web::get().to(hotels::get_hotel)),
                )
                .service(
                    web::scope("/bookings")
                        .route("", web::post().to(bookings::create_booking))
                        .route("/{id}", web::get().to(bookings::get_booking))
                        .route("/{id}", web::delete().to(bookings::delete_booking))
                        .route("/{id}/guest-info", web::put().to(bookings::update_guest_info))
                        .route(
                            "/{id}/payment-method",
                            web::put().to(bookings::update_payment_method),
                        )
                        .route("/{id}/currency", web::put().to(bookings::update_currency))
                        .route("/{id}/verification/send", web::post().to(bookings::send_code))
                        .route("/{id}/verification/resend", web::post().to(bookings::resend_code))
                        .route("/{id}/verification/verify", web::post().to(bookings::verify_code))
                        .route("/{id}/policies/{policy}", web::put().to(bookings::update_policy))
                        .route("/{id}/advance", web::post().to(bookings::advance))
                        .route("/{id}/retreat", web::post().to(bookings::retreat))
                        .route("/{id}/summary", web::get().to(bookings::get_summary))
                        .route("/{id}/complete", web::post().to(bookings::complete_booking))
                        .route("/{id}/cancel", web::post().to(bookings::cancel_booking))
                        .route("/{id}/calendar.ics", web::get().to(bookings::download_calendar))
                        .route("/{id}/calendar-links", web::get().to(bookings::calendar_links)),
                )
                .service(
                    web::scope("/reviews")
                        .route("", web::post().to(reviews::create_review))
                        .route("/{id}", web::get().to(reviews::get_review))
                        .route("/{id}", web::delete().to(reviews::delete_review))
                        .route("/{id}/ratings", web::put().to(reviews::update_ratings))
                        .route("/{id}/feedback", web::put().to(reviews::update_feedback))
                        .route("/{id}/photos", web::post().to(reviews::upload_photos))
                        .route("/{id}/photos/{index}", web::delete().to(reviews::remove_photo))
                        .route("/{id}/submit", web::post().to(reviews::submit_review)),
                )
                .service(
                    web::scope("/profile")
                        .route("", web::get().to(profile::get_profile))
                        .route("", web::put().to(profile::update_profile))
                        .route("/language", web::put().to(profile::update_language))
                        .route("/trips", web::get().to(profile::list_trips))
                        .route("/loyalty", web::get().to(profile::get_loyalty)),
                ),
        );
}
