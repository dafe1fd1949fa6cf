use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::entities::{neural_models, neural_models::Entity as NeuralModels};
use crate::document::LayerRecord;
use crate::server::app::AppState;
use crate::services::ModelService;

use super::caller_id;

/// Public listings are capped so a popular instance stays cheap to browse.
const PUBLIC_LISTING_LIMIT: u64 = 50;

fn default_public() -> bool {
    true
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateModelRequest {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub layers: Vec<LayerRecord>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateModelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub layers: Option<Vec<LayerRecord>>,
    pub is_public: Option<bool>,
}

/// A model row with its stored layer text expanded back into JSON.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ModelResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub model_data: Value,
    pub is_public: bool,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl ModelResponse {
    fn from_row(row: neural_models::Model) -> Result<Self, StatusCode> {
        let layers = ModelService::decode_layers(&row.model_data).map_err(|err| {
            tracing::error!("Stored model {} has unreadable layer data: {}", row.id, err);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            model_data: json!({ "layers": layers }),
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/models",
    responses(
        (status = 200, description = "List the caller's models", body = [ModelResponse]),
        (status = 401, description = "Missing user id header")
    )
)]
pub async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ModelResponse>>, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let rows = NeuralModels::find()
        .filter(neural_models::Column::UserId.eq(user_id))
        .order_by_desc(neural_models::Column::UpdatedAt)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    rows.into_iter()
        .map(ModelResponse::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/models",
    request_body = CreateModelRequest,
    responses(
        (status = 200, description = "Model saved", body = ModelResponse),
        (status = 401, description = "Missing user id header")
    )
)]
pub async fn create_model(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateModelRequest>,
) -> Result<Json<ModelResponse>, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let model_data =
        ModelService::encode_layers(&payload.layers).map_err(|_| StatusCode::BAD_REQUEST)?;

    let now = Utc::now();
    let model = neural_models::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        name: Set(payload.name),
        description: Set(payload.description),
        model_data: Set(model_data),
        is_public: Set(payload.is_public),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = model.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating model: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    ModelResponse::from_row(model).map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/models/public",
    responses(
        (status = 200, description = "List publicly shared models", body = [ModelResponse])
    )
)]
pub async fn list_public_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelResponse>>, StatusCode> {
    let rows = NeuralModels::find()
        .filter(neural_models::Column::IsPublic.eq(true))
        .order_by_desc(neural_models::Column::CreatedAt)
        .limit(PUBLIC_LISTING_LIMIT)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    rows.into_iter()
        .map(ModelResponse::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/models/{id}",
    params(
        ("id" = String, Path, description = "Model ID")
    ),
    responses(
        (status = 200, description = "Model found", body = ModelResponse),
        (status = 404, description = "Model not found or not visible to the caller")
    )
)]
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ModelResponse>, StatusCode> {
    let row = NeuralModels::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    // Private models are only visible to their owner. A 404 rather than a
    // 403 avoids confirming that the id exists.
    let visible = row.is_public || caller_id(&headers).as_deref() == Some(row.user_id.as_str());
    if !visible {
        return Err(StatusCode::NOT_FOUND);
    }

    ModelResponse::from_row(row).map(Json)
}

#[utoipa::path(
    put,
    path = "/api/v1/models/{id}",
    params(
        ("id" = String, Path, description = "Model ID")
    ),
    request_body = UpdateModelRequest,
    responses(
        (status = 200, description = "Model updated", body = ModelResponse),
        (status = 401, description = "Missing user id header"),
        (status = 404, description = "Model not found or not owned by the caller")
    )
)]
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateModelRequest>,
) -> Result<Json<ModelResponse>, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let row = NeuralModels::find_by_id(id)
        .filter(neural_models::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut model: neural_models::ActiveModel = row.into();
    if let Some(name) = payload.name {
        model.name = Set(name);
    }
    if let Some(description) = payload.description {
        model.description = Set(Some(description));
    }
    if let Some(layers) = payload.layers {
        let model_data =
            ModelService::encode_layers(&layers).map_err(|_| StatusCode::BAD_REQUEST)?;
        model.model_data = Set(model_data);
    }
    if let Some(is_public) = payload.is_public {
        model.is_public = Set(is_public);
    }
    model.updated_at = Set(Utc::now());

    let model = model
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    ModelResponse::from_row(model).map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/models/{id}",
    params(
        ("id" = String, Path, description = "Model ID")
    ),
    responses(
        (status = 204, description = "Model deleted"),
        (status = 401, description = "Missing user id header"),
        (status = 404, description = "Model not found or not owned by the caller")
    )
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let user_id = caller_id(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let result = NeuralModels::delete_many()
        .filter(neural_models::Column::Id.eq(id))
        .filter(neural_models::Column::UserId.eq(user_id))
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if result.rows_affected == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(StatusCode::NO_CONTENT)
}
