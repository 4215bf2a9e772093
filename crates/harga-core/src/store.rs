//! The `PriceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `harga-store-sqlite`).
//! [`PriceService`](crate::service::PriceService) depends on this
//! abstraction, not on any concrete backend. Every method is a single
//! statement against the store; atomicity and isolation between concurrent
//! callers are the backend's responsibility.

use std::future::Future;

use uuid::Uuid;

use crate::observation::{
  NewObservation, ObservationChanges, PriceObservation, ResolvedFilter,
};

/// Abstraction over the relational store holding price observations.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PriceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return at most `limit` rows matching `filter`, in no particular order.
  fn select<'a>(
    &'a self,
    filter: &'a ResolvedFilter,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<PriceObservation>, Self::Error>> + Send + 'a;

  /// Count every row matching `filter`.
  fn count<'a>(
    &'a self,
    filter: &'a ResolvedFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Persist a new row. The store assigns its id.
  fn insert(
    &self,
    row: NewObservation,
  ) -> impl Future<Output = Result<PriceObservation, Self::Error>> + Send + '_;

  /// Apply `changes` to the row with `id` and return it as stored afterwards.
  /// Returns `None` if no such row exists.
  fn update(
    &self,
    id: Uuid,
    changes: ObservationChanges,
  ) -> impl Future<Output = Result<Option<PriceObservation>, Self::Error>> + Send + '_;

  /// Remove the row with `id` and return it. Returns `None` if no such row
  /// exists.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PriceObservation>, Self::Error>> + Send + '_;
}
