//! Plan endpoints.
//!
//! Besides CRUD there is a bulk delete scoped to one client and a date
//! range; the planner UI wipes and regenerates recurring visits with it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{normalize_optional, validate_entity_id, validate_positive_amount, validate_required};
use ured_core::Plan;
use ured_db::PlanInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
        .route(
            "/delete-by-client-and-period",
            post(delete_by_client_and_period),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub executor_id: String,
    #[serde(default)]
    pub service: String,
    pub date: Option<NaiveDate>,
    pub recurrence: Option<String>,
    #[serde(default)]
    pub done: bool,
    /// The UI has always sent the amount as `price`.
    pub price: Option<f64>,
}

impl PlanRequest {
    fn into_input(self) -> ApiResult<PlanInput> {
        let price = self.price.unwrap_or(0.0);
        if price != 0.0 {
            validate_positive_amount("price", price)?;
        }

        Ok(PlanInput {
            client_id: validate_entity_id("clientId", &self.client_id)?,
            executor_id: validate_entity_id("executorId", &self.executor_id)?,
            service: validate_required("service", &self.service)?,
            date: self
                .date
                .ok_or_else(|| ApiError::Validation("date is required".to_string()))?,
            recurrence: normalize_optional(self.recurrence.as_deref()),
            done: self.done,
            price,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteByPeriodRequest {
    #[serde(default)]
    pub client_id: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteByPeriodResponse {
    pub deleted: u64,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Plan>>> {
    Ok(Json(state.db.plans().list().await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Plan>> {
    let plan = state
        .db
        .plans()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Plan".to_string(),
        })?;
    Ok(Json(plan))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<(StatusCode, Json<Plan>)> {
    let plan = state.db.plans().create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<Json<Plan>> {
    let repo = state.db.plans();
    repo.update(&id, req.into_input()?).await?;

    let plan = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Plan".to_string(),
        })?;
    Ok(Json(plan))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.plans().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_by_client_and_period(
    State(state): State<AppState>,
    Json(req): Json<DeleteByPeriodRequest>,
) -> ApiResult<Json<DeleteByPeriodResponse>> {
    let client_id = validate_entity_id("clientId", &req.client_id)?;
    let from = req
        .from
        .ok_or_else(|| ApiError::Validation("from is required".to_string()))?;
    let to = req
        .to
        .ok_or_else(|| ApiError::Validation("to is required".to_string()))?;

    if from > to {
        return Err(ApiError::Validation(
            "from must not be after to".to_string(),
        ));
    }

    let deleted = state
        .db
        .plans()
        .delete_by_client_and_period(&client_id, from, to)
        .await?;

    Ok(Json(DeleteByPeriodResponse { deleted }))
}
