//! [`PriceService`]: the price operations, addressed by region and commodity
//! name.
//!
//! Every operation validates and resolves its input against the [`Catalog`]
//! first and then issues exactly one store call. Nothing is cached, queued or
//! retried.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  catalog::Catalog,
  observation::{NewPriceEntry, PriceEntryPatch, PriceFilter, PriceObservation},
  store::PriceStore,
};

// ─── Request context ─────────────────────────────────────────────────────────

/// Per-request information about who is calling.
///
/// The identity is issued by an external provider and is opaque here; it is
/// only recorded alongside each operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
  pub caller: Option<String>,
}

impl RequestContext {
  pub fn for_caller(caller: impl Into<String>) -> Self {
    Self { caller: Some(caller.into()) }
  }

  pub fn caller(&self) -> &str { self.caller.as_deref().unwrap_or("anonymous") }
}

// ─── Limits ──────────────────────────────────────────────────────────────────

/// Bounds on list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
  /// Used when the caller does not ask for a limit.
  pub default_limit: usize,
  /// Upper bound on any requested limit.
  pub max_limit:     usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      default_limit: 1000,
      max_limit:     10_000,
    }
  }
}

impl Limits {
  pub fn effective(&self, requested: Option<usize>) -> usize {
    requested.unwrap_or(self.default_limit).min(self.max_limit)
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct PriceService<S> {
  store:   Arc<S>,
  catalog: Arc<Catalog>,
  limits:  Limits,
}

impl<S: PriceStore> PriceService<S> {
  pub fn new(store: Arc<S>, catalog: Arc<Catalog>) -> Self {
    Self { store, catalog, limits: Limits::default() }
  }

  pub fn with_limits(mut self, limits: Limits) -> Self {
    self.limits = limits;
    self
  }

  pub fn catalog(&self) -> &Catalog { &self.catalog }

  pub fn limits(&self) -> Limits { self.limits }

  /// Rows matching `filter`, capped at `limit` (or the default limit).
  pub async fn list(
    &self,
    ctx: &RequestContext,
    filter: &PriceFilter,
    limit: Option<usize>,
  ) -> Result<Vec<PriceObservation>> {
    let resolved = filter.resolve(&self.catalog)?;
    let limit = self.limits.effective(limit);

    let rows = self
      .store
      .select(&resolved, limit)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    tracing::debug!(caller = ctx.caller(), limit, returned = rows.len(), "listed prices");
    Ok(rows)
  }

  /// Number of rows matching `filter`. No limit applies.
  pub async fn count(&self, ctx: &RequestContext, filter: &PriceFilter) -> Result<u64> {
    let resolved = filter.resolve(&self.catalog)?;

    let total = self
      .store
      .count(&resolved)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    tracing::debug!(caller = ctx.caller(), total, "counted prices");
    Ok(total)
  }

  pub async fn create(
    &self,
    ctx: &RequestContext,
    entry: NewPriceEntry,
  ) -> Result<PriceObservation> {
    let row = entry.resolve(&self.catalog)?;

    let stored = self
      .store
      .insert(row)
      .await
      .map_err(|e| Error::WriteRejected(Box::new(e)))?;

    tracing::info!(caller = ctx.caller(), id = %stored.id, "created price");
    Ok(stored)
  }

  /// Apply the present fields of `patch` to row `id`.
  ///
  /// An unknown `id` is not an error: the result is simply `None`.
  pub async fn update(
    &self,
    ctx: &RequestContext,
    id: Uuid,
    patch: PriceEntryPatch,
  ) -> Result<Option<PriceObservation>> {
    let changes = patch.resolve(&self.catalog)?;

    let updated = self
      .store
      .update(id, changes)
      .await
      .map_err(|e| Error::WriteRejected(Box::new(e)))?;

    tracing::info!(caller = ctx.caller(), %id, matched = updated.is_some(), "updated price");
    Ok(updated)
  }

  /// Delete row `id`. An unknown `id` yields `None`.
  pub async fn delete(
    &self,
    ctx: &RequestContext,
    id: Uuid,
  ) -> Result<Option<PriceObservation>> {
    let deleted = self
      .store
      .delete(id)
      .await
      .map_err(|e| Error::WriteRejected(Box::new(e)))?;

    tracing::info!(caller = ctx.caller(), %id, matched = deleted.is_some(), "deleted price");
    Ok(deleted)
  }
}
