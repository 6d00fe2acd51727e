use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::agency;
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{hash_password, UserInfo};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub agency_id: Option<i32>,
}

/// Create a user with an explicit role. Agency users must reference an
/// existing agency; other roles must not carry one.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserInfo>> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    match (&payload.role, payload.agency_id) {
        (UserRole::Agency, None) => {
            return Err(AppError::BadRequest(
                "An agency user needs an agency_id".to_string(),
            ));
        }
        (UserRole::Agency, Some(id)) => {
            agency::Entity::find_by_id(id)
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Agency {} not found", id)))?;
        }
        (_, Some(_)) => {
            return Err(AppError::BadRequest(
                "Only agency users can carry an agency_id".to_string(),
            ));
        }
        _ => {}
    }

    let created = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email),
        password_hash: Set(hash_password(&payload.password)?),
        name: Set(payload.name),
        role: Set(payload.role),
        agency_id: Set(payload.agency_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created.into()))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = user::Entity::find().all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}
