//! JSON REST API for harga.
//!
//! Exposes an axum [`Router`] backed by a [`PriceService`] over any
//! [`PriceStore`]. TLS, tracing layers and token verification are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = harga_api::api_router(service.clone());
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod prices;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, put},
};
use harga_core::{service::PriceService, store::PriceStore};
use serde_json::{Value, json};

pub use error::ApiError;

/// `GET /` — liveness probe.
async fn root() -> Json<Value> { Json(json!({ "message": "Food Price API is running" })) }

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<PriceService<S>>) -> Router<()>
where
  S: PriceStore + 'static,
{
  Router::new()
    .route("/", get(root))
    // Prices
    .route("/data", get(prices::list::<S>).post(prices::create::<S>))
    .route("/data/count", get(prices::count::<S>))
    .route("/data/{id}", put(prices::update_one::<S>).delete(prices::delete_one::<S>))
    // Catalog
    .route("/regions", get(catalog::regions::<S>))
    .route("/commodities", get(catalog::commodities::<S>))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────
