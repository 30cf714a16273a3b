//! Executor CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{normalize_optional, validate_required};
use ured_core::Executor;
use ured_db::ExecutorInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorRequest {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ExecutorRequest {
    fn into_input(self) -> ApiResult<ExecutorInput> {
        Ok(ExecutorInput {
            name: validate_required("name", &self.name)?,
            email: normalize_optional(self.email.as_deref()),
            phone: normalize_optional(self.phone.as_deref()),
            address: normalize_optional(self.address.as_deref()),
        })
    }
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Executor>>> {
    Ok(Json(state.db.executors().list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Executor>> {
    let executor = state
        .db
        .executors()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Executor".to_string(),
        })?;
    Ok(Json(executor))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<ExecutorRequest>,
) -> ApiResult<(StatusCode, Json<Executor>)> {
    let executor = state.db.executors().create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(executor)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ExecutorRequest>,
) -> ApiResult<Json<Executor>> {
    let repo = state.db.executors();
    repo.update(&id, req.into_input()?).await?;

    let executor = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Executor".to_string(),
        })?;
    Ok(Json(executor))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.executors().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
