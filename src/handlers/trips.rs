use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::route::{self, RouteStatus};
use crate::entities::trip::{self, TripStatus};
use crate::entities::vessel::{self, VesselStatus};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub route_id: i32,
    pub vessel_id: i32,
    pub travel_date: NaiveDate,
    pub boarding_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripStatusRequest {
    pub status: TripStatus,
}

#[derive(Debug, Deserialize)]
pub struct TripSearchQuery {
    pub route_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub route_id: i32,
    pub vessel_id: i32,
    pub vessel_name: String,
    pub travel_date: NaiveDate,
    pub boarding_time: NaiveTime,
    pub seats_available: i32,
    pub seats_occupied: i32,
    pub status: TripStatus,
}

fn trip_response(t: trip::Model, vessel_name: String) -> TripResponse {
    TripResponse {
        id: t.id,
        route_id: t.route_id,
        vessel_id: t.vessel_id,
        vessel_name,
        travel_date: t.travel_date,
        boarding_time: t.boarding_time,
        seats_available: t.seats_available,
        seats_occupied: t.seats_occupied,
        status: t.status,
    }
}

/// Schedule a trip. Seat capacity is captured from the vessel at
/// creation time.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateTripRequest>,
) -> AppResult<Json<TripResponse>> {
    let route = route::Entity::find_by_id(payload.route_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", payload.route_id)))?;
    if route.status != RouteStatus::Active {
        return Err(AppError::Conflict("The route is inactive".to_string()));
    }

    let vessel = vessel::Entity::find_by_id(payload.vessel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vessel {} not found", payload.vessel_id)))?;
    if vessel.status != VesselStatus::InService {
        return Err(AppError::Conflict(format!(
            "Vessel {} is not in service",
            vessel.name
        )));
    }

    if payload.travel_date < Utc::now().date_naive() {
        return Err(AppError::BadRequest(
            "The travel date cannot be in the past".to_string(),
        ));
    }

    let created = trip::ActiveModel {
        id: Set(Uuid::new_v4()),
        route_id: Set(route.id),
        vessel_id: Set(vessel.id),
        travel_date: Set(payload.travel_date),
        boarding_time: Set(payload.boarding_time),
        seats_available: Set(vessel.capacity),
        seats_occupied: Set(0),
        status: Set(TripStatus::Scheduled),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.db)
    .await?;

    let name = vessel.name;
    Ok(Json(trip_response(created, name)))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<TripResponse>>> {
    let trips = trip::Entity::find()
        .order_by_asc(trip::Column::TravelDate)
        .all(&state.db)
        .await?;
    let vessels = vessel::Entity::find().all(&state.db).await?;

    let responses = trips
        .into_iter()
        .map(|t| {
            let name = vessels
                .iter()
                .find(|v| v.id == t.vessel_id)
                .map(|v| v.name.clone())
                .unwrap_or_default();
            trip_response(t, name)
        })
        .collect();

    Ok(Json(responses))
}

/// Scheduled trips with seats left, optionally narrowed by route and
/// date window.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<TripSearchQuery>,
) -> AppResult<Json<Vec<TripResponse>>> {
    let mut find = trip::Entity::find()
        .filter(trip::Column::Status.eq(TripStatus::Scheduled))
        .filter(trip::Column::SeatsAvailable.gt(0))
        .filter(trip::Column::TravelDate.gte(Utc::now().date_naive()));

    if let Some(route_id) = query.route_id {
        find = find.filter(trip::Column::RouteId.eq(route_id));
    }
    if let Some(from) = query.from {
        find = find.filter(trip::Column::TravelDate.gte(from));
    }
    if let Some(to) = query.to {
        find = find.filter(trip::Column::TravelDate.lte(to));
    }

    let trips = find
        .order_by_asc(trip::Column::TravelDate)
        .all(&state.db)
        .await?;
    let vessels = vessel::Entity::find().all(&state.db).await?;

    let responses = trips
        .into_iter()
        .map(|t| {
            let name = vessels
                .iter()
                .find(|v| v.id == t.vessel_id)
                .map(|v| v.name.clone())
                .unwrap_or_default();
            trip_response(t, name)
        })
        .collect();

    Ok(Json(responses))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTripStatusRequest>,
) -> AppResult<Json<trip::Model>> {
    let existing = trip::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", id)))?;

    if existing.status == payload.status {
        return Err(AppError::Conflict(
            "The trip is already in that status".to_string(),
        ));
    }
    if existing.status == TripStatus::Completed || existing.status == TripStatus::Cancelled {
        return Err(AppError::Conflict(
            "The trip has already ended".to_string(),
        ));
    }

    let mut active: trip::ActiveModel = existing.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}
