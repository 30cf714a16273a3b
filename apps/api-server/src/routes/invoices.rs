//! Invoice endpoints.
//!
//! Creation never takes a number from the client; the repository
//! allocates one from the year partition of the invoice date. Updates
//! may renumber explicitly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{normalize_optional, validate_entity_id};
use ured_core::Invoice;
use ured_db::{InvoiceUpdate, NewInvoice};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

/// Invoice create/update body.
///
/// `number` is honored only on update; creation always allocates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub number: Option<String>,
    #[serde(default)]
    pub client_id: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub total_no_vat: Option<f64>,
    pub vat: Option<f64>,
    pub total: Option<f64>,
    pub amount_in_words: Option<String>,
    pub contract_number: Option<String>,
    pub payment_term: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_order_number: Option<String>,
}

impl InvoiceRequest {
    fn validated_parts(self) -> ApiResult<(Option<String>, NewInvoice)> {
        let client_id = validate_entity_id("clientId", &self.client_id)?;
        let date = self
            .date
            .ok_or_else(|| ApiError::Validation("date is required".to_string()))?;

        let input = NewInvoice {
            client_id,
            date,
            description: normalize_optional(self.description.as_deref()),
            quantity: self.quantity,
            price: self.price,
            unit: normalize_optional(self.unit.as_deref()),
            total_no_vat: self.total_no_vat,
            vat: self.vat,
            total: self.total,
            amount_in_words: normalize_optional(self.amount_in_words.as_deref()),
            contract_number: normalize_optional(self.contract_number.as_deref()),
            payment_term: normalize_optional(self.payment_term.as_deref()),
            payment_date: self.payment_date,
            payment_order_number: normalize_optional(self.payment_order_number.as_deref()),
        };

        Ok((normalize_optional(self.number.as_deref()), input))
    }
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(state.db.invoices().list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let invoice = state
        .db
        .invoices()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Invoice".to_string(),
        })?;
    Ok(Json(invoice))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<InvoiceRequest>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    // Client-supplied numbers are dropped; allocation is server-side
    let (_, input) = req.validated_parts()?;
    let invoice = state.db.invoices().create(input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InvoiceRequest>,
) -> ApiResult<Json<Invoice>> {
    let (number, input) = req.validated_parts()?;
    let repo = state.db.invoices();

    repo.update(
        &id,
        InvoiceUpdate {
            number,
            client_id: input.client_id,
            date: input.date,
            description: input.description,
            quantity: input.quantity,
            price: input.price,
            unit: input.unit,
            total_no_vat: input.total_no_vat,
            vat: input.vat,
            total: input.total,
            amount_in_words: input.amount_in_words,
            contract_number: input.contract_number,
            payment_term: input.payment_term,
            payment_date: input.payment_date,
            payment_order_number: input.payment_order_number,
        },
    )
    .await?;

    let invoice = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Invoice".to_string(),
        })?;
    Ok(Json(invoice))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.invoices().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
