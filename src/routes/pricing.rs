use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{currency::Currency, pricing::PricingInputs};
use crate::routes::error::ApiError;
use crate::services::pricing_service::PricingService;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ConvertRequest {
    amount: Decimal,
    from: String,
    to: String,
}

// GET /api/currencies
pub async fn list_currencies() -> HttpResponse {
    let currencies: Vec<_> = Currency::ALL.iter().map(Currency::info).collect();
    HttpResponse::Ok().json(currencies)
}

// POST /api/pricing/quote
pub async fn quote(
    state: web::Data<AppState>,
    input: web::Json<PricingInputs>,
) -> Result<HttpResponse, ApiError> {
    let breakdown = state.pricing.quote(&input)?;
    Ok(HttpResponse::Ok().json(breakdown))
}

// POST /api/pricing/convert
pub async fn convert(input: web::Json<ConvertRequest>) -> Result<HttpResponse, ApiError> {
    if input.amount < Decimal::ZERO {
        return Err(ApiError::bad_request("invalid_amount", "Amount cannot be negative"));
    }
    let from: Currency = input.from.parse()?;
    let to: Currency = input.to.parse()?;

    let conversion = PricingService::convert(input.amount, from, to)?;
    Ok(HttpResponse::Ok().json(conversion))
}
