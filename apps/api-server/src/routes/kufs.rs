//! KUF (incoming invoice) endpoints.
//!
//! Wire field names stay Bosnian (`brojKuf`, `iznos`, `placeno`) to match
//! the books the operators keep.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_core::validation::{normalize_optional, validate_non_negative_amount, validate_required};
use ured_core::Kuf;
use ured_db::KufInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KufRequest {
    #[serde(default)]
    pub broj_kuf: String,
    pub datum_kuf: Option<NaiveDate>,
    pub datum_prijema: Option<NaiveDate>,
    #[serde(default)]
    pub ime_komitenta: String,
    pub id_komitenta: Option<String>,
    pub iznos: Option<f64>,
    #[serde(default)]
    pub placeno: bool,
}

impl KufRequest {
    fn into_input(self) -> ApiResult<KufInput> {
        let iznos = self.iznos.unwrap_or(0.0);
        validate_non_negative_amount("iznos", iznos)?;

        Ok(KufInput {
            broj_kuf: validate_required("brojKuf", &self.broj_kuf)?,
            datum_kuf: self
                .datum_kuf
                .ok_or_else(|| ApiError::Validation("datumKuf is required".to_string()))?,
            datum_prijema: self.datum_prijema,
            ime_komitenta: validate_required("imeKomitenta", &self.ime_komitenta)?,
            id_komitenta: normalize_optional(self.id_komitenta.as_deref()),
            iznos,
            placeno: self.placeno,
        })
    }
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Kuf>>> {
    Ok(Json(state.db.kufs().list().await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Kuf>> {
    let kuf = state
        .db
        .kufs()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Kuf".to_string(),
        })?;
    Ok(Json(kuf))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<KufRequest>,
) -> ApiResult<(StatusCode, Json<Kuf>)> {
    let kuf = state.db.kufs().create(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(kuf)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<KufRequest>,
) -> ApiResult<Json<Kuf>> {
    let repo = state.db.kufs();
    repo.update(&id, req.into_input()?).await?;

    let kuf = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            entity: "Kuf".to_string(),
        })?;
    Ok(Json(kuf))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db.kufs().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
