use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::port;
use crate::entities::route::{self, RouteStatus};
use crate::entities::route_fare;
use crate::entities::vessel::{self, VesselStatus};
use crate::error::{AppError, AppResult};
use crate::AppState;

// ============ Ports ============

#[derive(Debug, Deserialize)]
pub struct CreatePortRequest {
    pub name: String,
    pub city: String,
}

pub async fn create_port(
    State(state): State<AppState>,
    Json(payload): Json<CreatePortRequest>,
) -> AppResult<Json<port::Model>> {
    let existing = port::Entity::find()
        .filter(port::Column::Name.eq(&payload.name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Port {} already exists",
            payload.name
        )));
    }

    let created = port::ActiveModel {
        name: Set(payload.name),
        city: Set(payload.city),
        active: Set(true),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list_ports(State(state): State<AppState>) -> AppResult<Json<Vec<port::Model>>> {
    Ok(Json(port::Entity::find().all(&state.db).await?))
}

// ============ Vessels ============

#[derive(Debug, Deserialize)]
pub struct CreateVesselRequest {
    pub name: String,
    pub capacity: i32,
}

pub async fn create_vessel(
    State(state): State<AppState>,
    Json(payload): Json<CreateVesselRequest>,
) -> AppResult<Json<vessel::Model>> {
    if payload.capacity <= 0 {
        return Err(AppError::BadRequest(
            "The vessel capacity must be positive".to_string(),
        ));
    }

    let created = vessel::ActiveModel {
        name: Set(payload.name),
        capacity: Set(payload.capacity),
        status: Set(VesselStatus::InService),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list_vessels(State(state): State<AppState>) -> AppResult<Json<Vec<vessel::Model>>> {
    Ok(Json(vessel::Entity::find().all(&state.db).await?))
}

// ============ Routes ============

#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    pub origin_port_id: i32,
    pub destination_port_id: i32,
    pub duration_hours: i32,
}

pub async fn create_route(
    State(state): State<AppState>,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<Json<route::Model>> {
    if payload.origin_port_id == payload.destination_port_id {
        return Err(AppError::BadRequest(
            "Origin and destination must differ".to_string(),
        ));
    }

    for id in [payload.origin_port_id, payload.destination_port_id] {
        port::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Port {} not found", id)))?;
    }

    let created = route::ActiveModel {
        origin_port_id: Set(payload.origin_port_id),
        destination_port_id: Set(payload.destination_port_id),
        duration_hours: Set(payload.duration_hours),
        status: Set(RouteStatus::Active),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<route::Model>>> {
    Ok(Json(route::Entity::find().all(&state.db).await?))
}

// ============ Fares ============

#[derive(Debug, Deserialize)]
pub struct OpenFareRequest {
    pub route_id: i32,
    pub base_price: Decimal,
}

/// Open a new fare for a route; the currently open fare, if any, is
/// closed in the same transaction so at most one open fare exists per
/// route.
pub async fn open_fare(
    State(state): State<AppState>,
    Json(payload): Json<OpenFareRequest>,
) -> AppResult<Json<route_fare::Model>> {
    if payload.base_price <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The base price must be positive".to_string(),
        ));
    }

    route::Entity::find_by_id(payload.route_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", payload.route_id)))?;

    let txn = state.db.begin().await?;
    let now = Utc::now();

    if let Some(current) = route_fare::Entity::find()
        .filter(route_fare::Column::RouteId.eq(payload.route_id))
        .filter(route_fare::Column::EndsAt.is_null())
        .one(&txn)
        .await?
    {
        let mut active: route_fare::ActiveModel = current.into();
        active.ends_at = Set(Some(now.into()));
        active.update(&txn).await?;
    }

    let created = route_fare::ActiveModel {
        route_id: Set(payload.route_id),
        base_price: Set(payload.base_price),
        starts_at: Set(now.into()),
        ends_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(Json(created))
}

pub async fn current_fare(
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
) -> AppResult<Json<route_fare::Model>> {
    let fare = route_fare::Entity::find()
        .filter(route_fare::Column::RouteId.eq(route_id))
        .filter(route_fare::Column::EndsAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} has no open fare", route_id)))?;

    Ok(Json(fare))
}
