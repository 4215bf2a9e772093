//! Handlers for `/data` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/data`       | Optional `start_date`, `end_date`, `regions`, `commodities`, `limit` |
//! | `GET`    | `/data/count` | Same filters, `limit` ignored; `{"total_count": n}` |
//! | `POST`   | `/data`       | Body: [`CreateBody`] |
//! | `PUT`    | `/data/:id`   | Body: [`UpdateBody`], any subset of fields |
//! | `DELETE` | `/data/:id`   | |
//!
//! Mutations answer with `{"status": "success", "data": [...]}` where `data`
//! holds the affected rows. Update and delete of an unknown id succeed with
//! empty `data`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use harga_core::{
  observation::{NewPriceEntry, PriceEntryPatch, PriceFilter, PriceObservation},
  service::PriceService,
  store::PriceStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{context::Caller, error::ApiError};

// ─── Query parameters ─────────────────────────────────────────────────────────

/// Filter parameters shared by list and count.
///
/// Region and commodity names may be given as repeated keys
/// (`regions=Aceh&regions=Bali`), with PHP-style brackets (`regions[]=Aceh`),
/// or in the singular (`region=Aceh`). Each value is one whole name, commas
/// included.
#[derive(Debug, Default)]
pub struct FilterParams {
  pub filter: PriceFilter,
  pub limit:  Option<usize>,
}

fn parse_date(key: &str, value: &str) -> Result<Option<NaiveDate>, ApiError> {
  if value.trim().is_empty() {
    return Ok(None);
  }
  value
    .trim()
    .parse()
    .map(Some)
    .map_err(|_| ApiError::BadRequest(format!("invalid {key} {value:?}, expected YYYY-MM-DD")))
}

fn push_name(into: &mut Vec<String>, value: String) {
  if !value.trim().is_empty() {
    into.push(value);
  }
}

impl FilterParams {
  pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
    let mut params = FilterParams::default();
    for (key, value) in pairs {
      match key.as_str() {
        "start_date" => params.filter.start_date = parse_date(&key, &value)?,
        "end_date" => params.filter.end_date = parse_date(&key, &value)?,
        "region" | "regions" | "regions[]" => push_name(&mut params.filter.regions, value),
        "commodity" | "commodities" | "commodities[]" => {
          push_name(&mut params.filter.commodities, value)
        }
        "limit" => {
          let limit = value
            .trim()
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("invalid limit {value:?}")))?;
          params.limit = Some(limit);
        }
        _ => {}
      }
    }
    Ok(params)
  }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id {raw:?}")))
}

// ─── Responses ────────────────────────────────────────────────────────────────

/// Envelope returned by create, update and delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
  pub status: String,
  pub data:   Vec<PriceObservation>,
}

impl MutationResponse {
  fn success(data: impl IntoIterator<Item = PriceObservation>) -> Json<Self> {
    Json(Self {
      status: "success".to_owned(),
      data:   data.into_iter().collect(),
    })
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
  pub total_count: u64,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /data[?start_date=...][&end_date=...][&regions=...][&commodities=...][&limit=...]`
pub async fn list<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
  Caller(ctx): Caller,
  Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<PriceObservation>>, ApiError> {
  let params = FilterParams::from_pairs(pairs)?;
  let rows = service.list(&ctx, &params.filter, params.limit).await?;
  Ok(Json(rows))
}

// ─── Count ────────────────────────────────────────────────────────────────────

/// `GET /data/count` — same filters as [`list`]; `limit` is ignored.
pub async fn count<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
  Caller(ctx): Caller,
  Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CountResponse>, ApiError> {
  let params = FilterParams::from_pairs(pairs)?;
  let total_count = service.count(&ctx, &params.filter).await?;
  Ok(Json(CountResponse { total_count }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /data`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub region:     String,
  pub commodity:  String,
  pub date:       NaiveDate,
  pub price:      f64,
  pub created_by: String,
}

impl From<CreateBody> for NewPriceEntry {
  fn from(b: CreateBody) -> Self {
    NewPriceEntry {
      region:     b.region,
      commodity:  b.commodity,
      date:       b.date,
      price:      b.price,
      created_by: b.created_by,
    }
  }
}

/// `POST /data`
pub async fn create<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
  Caller(ctx): Caller,
  Json(body): Json<CreateBody>,
) -> Result<Json<MutationResponse>, ApiError> {
  let row = service.create(&ctx, NewPriceEntry::from(body)).await?;
  Ok(MutationResponse::success([row]))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /data/:id`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub region:     Option<String>,
  pub commodity:  Option<String>,
  pub date:       Option<NaiveDate>,
  pub price:      Option<f64>,
  pub created_by: Option<String>,
}

impl From<UpdateBody> for PriceEntryPatch {
  fn from(b: UpdateBody) -> Self {
    PriceEntryPatch {
      region:     b.region,
      commodity:  b.commodity,
      date:       b.date,
      price:      b.price,
      created_by: b.created_by,
    }
  }
}

/// `PUT /data/:id`
pub async fn update_one<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<MutationResponse>, ApiError> {
  let id = parse_id(&id)?;
  let updated = service.update(&ctx, id, PriceEntryPatch::from(body)).await?;
  Ok(MutationResponse::success(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /data/:id`
pub async fn delete_one<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
  let id = parse_id(&id)?;
  let deleted = service.delete(&ctx, id).await?;
  Ok(MutationResponse::success(deleted))
}
