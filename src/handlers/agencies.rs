use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::agency::{self, AgencyStatus};
use crate::entities::discount_rule::ValueType;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAgencyRequest {
    pub name: String,
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub commission_type: ValueType,
    pub commission_value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SetAgencyStatusRequest {
    pub status: AgencyStatus,
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateAgencyRequest>,
) -> AppResult<Json<agency::Model>> {
    if payload.tax_id.len() != 11 || !payload.tax_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "The tax id must be 11 digits".to_string(),
        ));
    }
    if payload.commission_value < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The commission cannot be negative".to_string(),
        ));
    }
    if payload.commission_type == ValueType::Percentage
        && payload.commission_value > Decimal::from(100)
    {
        return Err(AppError::BadRequest(
            "A percentage commission cannot exceed 100".to_string(),
        ));
    }

    let existing = agency::Entity::find()
        .filter(agency::Column::TaxId.eq(&payload.tax_id))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "An agency with tax id {} already exists",
            payload.tax_id
        )));
    }

    let created = agency::ActiveModel {
        name: Set(payload.name),
        tax_id: Set(payload.tax_id),
        address: Set(payload.address),
        phone: Set(payload.phone),
        commission_type: Set(payload.commission_type),
        commission_value: Set(payload.commission_value),
        status: Set(AgencyStatus::Active),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<agency::Model>>> {
    let agencies = agency::Entity::find()
        .order_by_asc(agency::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(agencies))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetAgencyStatusRequest>,
) -> AppResult<Json<agency::Model>> {
    let existing = agency::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Agency {} not found", id)))?;

    if existing.status == payload.status {
        return Err(AppError::Conflict(
            "The agency is already in that state".to_string(),
        ));
    }

    let mut active: agency::ActiveModel = existing.into();
    active.status = Set(payload.status);
    Ok(Json(active.update(&state.db).await?))
}
