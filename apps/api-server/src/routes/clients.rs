//! Client CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{normalize_optional, validate_required};
use ured_core::Client;
use ured_db::ClientInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

/// Client create/update body. Empty optional strings are stored as NULL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub postal_code: Option<String>,
    pub company_id: Option<String>,
    pub pib: Option<String>,
    pub contract_number: Option<String>,
    pub payment_term: Option<String>,
    pub amount_in_words: Option<String>,
}

impl ClientRequest {
    fn into_input(self) -> ApiResult<ClientInput> {
        Ok(ClientInput {
            name: validate_required("name", &self.name)?,
            email: validate_required("email", &self.email)?,
            phone: validate_required("phone", &self.phone)?,
            address: validate_required("address", &self.address)?,
            postal_code: normalize_optional(self.postal_code.as_deref()),
            company_id: normalize_optional(self.company_id.as_deref()),
            pib: normalize_optional(self.pib.as_deref()),
            contract_number: normalize_optional(self.contract_number.as_deref()),
            payment_term: normalize_optional(self.payment_term.as_deref()),
            amount_in_words: normalize_optional(self.amount_in_words.as_deref()),
        })
    }
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.db.clients().list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    let client = state
        .db
        .clients()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Client".to_string(),
        })?;
    Ok(Json(client))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = state.db.clients().create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<Json<Client>> {
    let repo = state.db.clients();
    repo.update(&id, req.into_input()?).await?;

    let client = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Client".to_string(),
        })?;
    Ok(Json(client))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.clients().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
