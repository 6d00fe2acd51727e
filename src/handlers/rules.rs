use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::discount_rule::{self, ValueType};
use crate::entities::penalty_rule::{self, PenaltyKind};
use crate::error::{AppError, AppResult};
use crate::services::penalty::PenaltyPolicy;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRuleRequest {
    pub description: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub value_type: ValueType,
    pub value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePenaltyRuleRequest {
    pub kind: PenaltyKind,
    pub description: String,
    pub value_type: Option<ValueType>,
    pub value: Option<Decimal>,
    pub allowance_kg: Option<i32>,
    pub price_per_kilo: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

pub async fn create_discount_rule(
    State(state): State<AppState>,
    Json(payload): Json<CreateDiscountRuleRequest>,
) -> AppResult<Json<discount_rule::Model>> {
    if payload.value <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The rule value must be positive".to_string(),
        ));
    }
    if payload.value_type == ValueType::Percentage && payload.value > Decimal::from(100) {
        return Err(AppError::BadRequest(
            "A percentage cannot exceed 100".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (payload.min_age, payload.max_age) {
        if min > max {
            return Err(AppError::BadRequest(
                "min_age cannot exceed max_age".to_string(),
            ));
        }
    }

    let created = discount_rule::ActiveModel {
        description: Set(payload.description),
        min_age: Set(payload.min_age),
        max_age: Set(payload.max_age),
        value_type: Set(payload.value_type),
        value: Set(payload.value),
        active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list_discount_rules(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<discount_rule::Model>>> {
    let rules = discount_rule::Entity::find()
        .order_by_asc(discount_rule::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rules))
}

pub async fn set_discount_active(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<discount_rule::Model>> {
    let existing = discount_rule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Discount rule {} not found", id)))?;

    if existing.active == payload.active {
        return Err(AppError::Conflict(
            "The rule is already in that state".to_string(),
        ));
    }

    let mut active: discount_rule::ActiveModel = existing.into();
    active.active = Set(payload.active);
    Ok(Json(active.update(&state.db).await?))
}

pub async fn create_penalty_rule(
    State(state): State<AppState>,
    Json(payload): Json<CreatePenaltyRuleRequest>,
) -> AppResult<Json<penalty_rule::Model>> {
    let candidate = penalty_rule::Model {
        id: 0,
        kind: payload.kind,
        description: payload.description.clone(),
        value_type: payload.value_type,
        value: payload.value,
        allowance_kg: payload.allowance_kg,
        price_per_kilo: payload.price_per_kilo,
        active: true,
        created_at: Utc::now().into(),
    };
    // Rejects rows missing the columns their kind requires.
    PenaltyPolicy::try_from(&candidate).map_err(|_| {
        AppError::BadRequest("The rule is missing fields required by its kind".to_string())
    })?;

    let created = penalty_rule::ActiveModel {
        kind: Set(payload.kind),
        description: Set(payload.description),
        value_type: Set(payload.value_type),
        value: Set(payload.value),
        allowance_kg: Set(payload.allowance_kg),
        price_per_kilo: Set(payload.price_per_kilo),
        active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

pub async fn list_penalty_rules(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<penalty_rule::Model>>> {
    let rules = penalty_rule::Entity::find()
        .order_by_asc(penalty_rule::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rules))
}

pub async fn set_penalty_active(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<penalty_rule::Model>> {
    let existing = penalty_rule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Penalty rule {} not found", id)))?;

    if existing.active == payload.active {
        return Err(AppError::Conflict(
            "The rule is already in that state".to_string(),
        ));
    }

    let mut active: penalty_rule::ActiveModel = existing.into();
    active.active = Set(payload.active);
    Ok(Json(active.update(&state.db).await?))
}
