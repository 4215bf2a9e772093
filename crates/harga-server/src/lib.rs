//! Server assembly for harga: configuration, catalog loading and the
//! top-level HTTP application.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use harga_core::{
  catalog::{Catalog, CatalogConfig},
  service::{Limits, PriceService},
  store::PriceStore,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Catalog(#[from] harga_core::Error),

  #[error("max_limit must be at least 1")]
  ZeroMaxLimit,
}

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("prices.db") }

fn default_limit() -> usize { Limits::default().default_limit }

fn default_max_limit() -> usize { Limits::default().max_limit }

/// Runtime server configuration, deserialised from `config.toml` and
/// `HARGA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default = "default_limit")]
  pub default_limit: usize,
  #[serde(default = "default_max_limit")]
  pub max_limit:     usize,
  /// Replaces the built-in catalog when present.
  #[serde(default)]
  pub catalog:       Option<CatalogConfig>,
}

impl ServerConfig {
  /// Layer the optional file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, Error> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("HARGA"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn limits(&self) -> Result<Limits, Error> {
    if self.max_limit == 0 {
      return Err(Error::ZeroMaxLimit);
    }
    Ok(Limits {
      default_limit: self.default_limit,
      max_limit:     self.max_limit,
    })
  }

  pub fn catalog(&self) -> Result<Catalog, Error> {
    match &self.catalog {
      Some(cfg) => Ok(Catalog::from_config(cfg)?),
      None => Ok(Catalog::builtin()),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the service for `store` from `config`.
pub fn build_service<S: PriceStore>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<PriceService<S>, Error> {
  let catalog = config.catalog()?;
  tracing::info!(
    regions = catalog.regions().count(),
    commodities = catalog.commodities().count(),
    "catalog loaded"
  );
  Ok(PriceService::new(store, Arc::new(catalog)).with_limits(config.limits()?))
}

/// The API router wrapped in request tracing.
pub fn app<S: PriceStore + 'static>(service: Arc<PriceService<S>>) -> Router {
  harga_api::api_router(service).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use harga_core::catalog::RegionId;
  use harga_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  fn write_config(contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("harga-config-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_gives_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/harga.toml")).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.store_path, PathBuf::from("prices.db"));
    assert_eq!(cfg.limits().unwrap(), Limits::default());
    assert_eq!(cfg.catalog().unwrap().regions().count(), 34);
  }

  #[test]
  fn file_overrides_defaults_and_catalog() {
    let path = write_config(
      r#"
host = "0.0.0.0"
port = 9000
max_limit = 50

[[catalog.regions]]
name = "Nusantara"
id   = 99

[[catalog.commodities]]
name = "Garam"
id   = 14
"#,
    );
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.limits().unwrap().max_limit, 50);

    let catalog = cfg.catalog().unwrap();
    assert_eq!(catalog.resolve_region("Nusantara").unwrap(), RegionId(99));
    assert!(catalog.resolve_region("Aceh").is_err());

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[test]
  fn invalid_catalog_is_reported() {
    let path = write_config(
      r#"
[[catalog.regions]]
name = "Aceh"
id   = 11

[[catalog.regions]]
name = "Aceh"
id   = 12
"#,
    );
    let cfg = ServerConfig::load(&path).unwrap();
    assert!(matches!(cfg.catalog(), Err(Error::Catalog(_))));
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[test]
  fn zero_max_limit_is_rejected() {
    let path = write_config("max_limit = 0\n");
    let cfg = ServerConfig::load(&path).unwrap();
    assert!(matches!(cfg.limits(), Err(Error::ZeroMaxLimit)));
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
  }

  #[tokio::test]
  async fn app_serves_api_routes() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/harga.toml")).unwrap();
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let service = build_service(store, &cfg).unwrap();
    let app = app(Arc::new(service));

    let resp = app
      .oneshot(Request::get("/data/count").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total_count"], 0);
  }
}
