//! Sanitary certificate endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{validate_entity_id, validate_required};
use ured_core::SanitaryRecord;
use ured_db::SanitaryInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitaryRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub employee_name: String,
    pub date_issued: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl SanitaryRequest {
    fn into_input(self) -> ApiResult<SanitaryInput> {
        let date_issued = self
            .date_issued
            .ok_or_else(|| ApiError::Validation("dateIssued is required".to_string()))?;
        let expiry_date = self
            .expiry_date
            .ok_or_else(|| ApiError::Validation("expiryDate is required".to_string()))?;

        if expiry_date < date_issued {
            return Err(ApiError::Validation(
                "expiryDate must not precede dateIssued".to_string(),
            ));
        }

        Ok(SanitaryInput {
            client_id: validate_entity_id("clientId", &self.client_id)?,
            employee_name: validate_required("employeeName", &self.employee_name)?,
            date_issued,
            expiry_date,
        })
    }
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<SanitaryRecord>>> {
    Ok(Json(state.db.sanitarne().list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SanitaryRecord>> {
    let record = state
        .db
        .sanitarne()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "SanitaryRecord".to_string(),
        })?;
    Ok(Json(record))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<SanitaryRequest>,
) -> ApiResult<(StatusCode, Json<SanitaryRecord>)> {
    let record = state.db.sanitarne().create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SanitaryRequest>,
) -> ApiResult<Json<SanitaryRecord>> {
    let repo = state.db.sanitarne();
    repo.update(&id, req.into_input()?).await?;

    let record = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "SanitaryRecord".to_string(),
        })?;
    Ok(Json(record))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.sanitarne().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
