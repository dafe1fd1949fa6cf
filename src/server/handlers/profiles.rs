use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::entities::{profiles, profiles::Entity as Profiles};
use crate::server::app::AppState;

use super::caller_id;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 200, description = "Profile created", body = crate::database::entities::profiles::Model),
        (status = 401, description = "Missing user id header"),
        (status = 409, description = "Profile already exists for this user")
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<Json<profiles::Model>, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let existing = Profiles::find()
        .filter(profiles::Column::UserId.eq(user_id.clone()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if existing.is_some() {
        return Err(StatusCode::CONFLICT);
    }

    let now = Utc::now();
    let profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        display_name: Set(payload.display_name),
        avatar_url: Set(payload.avatar_url),
        bio: Set(payload.bio),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let profile = profile.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating profile: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    responses(
        (status = 200, description = "The caller's own profile", body = crate::database::entities::profiles::Model),
        (status = 401, description = "Missing user id header"),
        (status = 404, description = "Caller has no profile yet")
    )
)]
pub async fn get_own_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<profiles::Model>, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let profile = Profiles::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID the profile belongs to")
    ),
    responses(
        (status = 200, description = "Profile found", body = crate::database::entities::profiles::Model),
        (status = 404, description = "No profile for this user")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<profiles::Model>, StatusCode> {
    let profile = Profiles::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(profile))
}
