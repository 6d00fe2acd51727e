use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::baggage;
use crate::error::AppResult;
use crate::services::baggage::excess_for_weight;
use crate::services::reservation::{
    self, BaggageRequest, CancelReservationRequest, CancellationView, CreateReservationRequest,
    QuoteRequest, QuoteView, RegisterPaymentRequest, ReprogramReservationRequest,
    ReservationSummary, ReservationView,
};
use crate::utils::jwt::Claims;
use crate::utils::money::round2;
use crate::AppState;

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ReservationView>> {
    let view = reservation::create_reservation(&state.db, &claims, payload).await?;
    Ok(Json(view))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<ReservationSummary>>> {
    Ok(Json(reservation::list(&state.db, &claims).await?))
}

pub async fn get_by_code(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
) -> AppResult<Json<ReservationView>> {
    Ok(Json(reservation::find_by_code(&state.db, &claims, &code).await?))
}

/// Dry-run pricing for a party of passengers, no rows written.
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<QuoteView>> {
    Ok(Json(reservation::quote_price(&state.db, payload).await?))
}

pub async fn register_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
    Json(payload): Json<RegisterPaymentRequest>,
) -> AppResult<Json<ReservationView>> {
    let view = reservation::register_payment(&state.db, &claims, &code, payload).await?;
    Ok(Json(view))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
    Json(payload): Json<CancelReservationRequest>,
) -> AppResult<Json<CancellationView>> {
    Ok(Json(reservation::cancel(&state.db, &claims, &code, payload).await?))
}

pub async fn reprogram(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
    Json(payload): Json<ReprogramReservationRequest>,
) -> AppResult<Json<CancellationView>> {
    Ok(Json(reservation::reprogram(&state.db, &claims, &code, payload).await?))
}

pub async fn register_baggage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((code, passenger_id)): Path<(String, Uuid)>,
    Json(payload): Json<BaggageRequest>,
) -> AppResult<Json<baggage::Model>> {
    let row =
        reservation::register_baggage(&state.db, &claims, &code, passenger_id, payload).await?;
    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
pub struct TariffQuery {
    pub weight_kg: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TariffResponse {
    pub weight_kg: Decimal,
    pub allowance_kg: Decimal,
    pub price_per_kilo: Decimal,
    pub excess_kg: Decimal,
    pub excess_cost: Decimal,
}

/// Standalone tariff lookup. Unlike the stored baggage cost, the
/// displayed figure is rounded half-up to two decimals.
pub async fn baggage_tariff(
    State(state): State<AppState>,
    Query(query): Query<TariffQuery>,
) -> AppResult<Json<TariffResponse>> {
    let tariff = reservation::active_baggage_tariff(&state.db).await?;
    let charge = excess_for_weight(query.weight_kg, &tariff);

    Ok(Json(TariffResponse {
        weight_kg: query.weight_kg,
        allowance_kg: charge.allowance_kg,
        price_per_kilo: charge.price_per_kilo,
        excess_kg: charge.excess_kg,
        excess_cost: round2(charge.excess_cost),
    }))
}
