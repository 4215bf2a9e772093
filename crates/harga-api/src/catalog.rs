//! Handlers exposing the id catalog, so clients can build their region and
//! commodity pickers from the same table the service resolves against.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/regions` | `[{"name": "Aceh", "id": 11}, ...]` in catalog order |
//! | `GET`  | `/commodities` | Same shape |

use std::sync::Arc;

use axum::{Json, extract::State};
use harga_core::{catalog::CatalogEntry, service::PriceService, store::PriceStore};

/// `GET /regions`
pub async fn regions<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
) -> Json<Vec<CatalogEntry>> {
  Json(service.catalog().to_config().regions)
}

/// `GET /commodities`
pub async fn commodities<S: PriceStore>(
  State(service): State<Arc<PriceService<S>>>,
) -> Json<Vec<CatalogEntry>> {
  Json(service.catalog().to_config().commodities)
}
