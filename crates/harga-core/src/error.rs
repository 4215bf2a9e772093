//! Error types for `harga-core`.

use thiserror::Error;

/// Everything a [`PriceService`](crate::service::PriceService) operation can
/// fail with.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Region '{0}' not found")]
  RegionNotFound(String),

  #[error("Commodity '{0}' not found")]
  CommodityNotFound(String),

  #[error("No valid fields to update")]
  NoFieldsToUpdate,

  #[error("price must be a non-negative number, got {0}")]
  InvalidPrice(f64),

  #[error("field '{0}' is required")]
  MissingField(&'static str),

  #[error("invalid catalog: {0}")]
  InvalidCatalog(String),

  /// The store refused a write. The message is the store's own, unchanged.
  #[error("{0}")]
  WriteRejected(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  InvalidRequest,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::RegionNotFound(_) | Error::CommodityNotFound(_) => ErrorKind::NotFound,
      Error::NoFieldsToUpdate
      | Error::InvalidPrice(_)
      | Error::MissingField(_)
      | Error::WriteRejected(_) => ErrorKind::InvalidRequest,
      Error::InvalidCatalog(_) | Error::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
