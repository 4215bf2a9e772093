//! [`SqliteStore`], the SQLite implementation of [`PriceStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use harga_core::{
  observation::{NewObservation, ObservationChanges, PriceObservation, ResolvedFilter},
  store::PriceStore,
};

use crate::{
  Error, Result,
  encode::{
    COLUMNS, RawObservation, encode_commodity, encode_date, encode_region, encode_uuid,
  },
  query::{set_clause, where_clause},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A price store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement that yields at most one full row.
  async fn one_row(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Option<PriceObservation>> {
    let raw: Option<RawObservation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params_from_iter(params.iter()),
              RawObservation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawObservation::into_observation).transpose()
  }
}

// ─── PriceStore impl ─────────────────────────────────────────────────────────

impl PriceStore for SqliteStore {
  type Error = Error;

  async fn select(
    &self,
    filter: &ResolvedFilter,
    limit: usize,
  ) -> Result<Vec<PriceObservation>> {
    let mut fragment = where_clause(filter);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);
    fragment.params.push(rusqlite::types::Value::Integer(limit_val));
    let sql = format!(
      "SELECT {COLUMNS} FROM prices {} LIMIT ?{}",
      fragment.sql,
      fragment.params.len()
    );
    let params = fragment.params;

    let raws: Vec<RawObservation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(params.iter()),
            RawObservation::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObservation::into_observation).collect()
  }

  async fn count(&self, filter: &ResolvedFilter) -> Result<u64> {
    let fragment = where_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM prices {}", fragment.sql);
    let params = fragment.params;

    let total: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?)
      })
      .await?;

    u64::try_from(total).map_err(|_| Error::NegativeCount(total))
  }

  async fn insert(&self, row: NewObservation) -> Result<PriceObservation> {
    let stored = row.into_stored(Uuid::new_v4());

    let id_str        = encode_uuid(stored.id);
    let region_id     = encode_region(stored.region_id);
    let commodity_id  = encode_commodity(stored.commodity_id);
    let date_str      = encode_date(stored.date);
    let price         = stored.price;
    let created_by    = stored.created_by.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO prices (id, region_id, commodity_id, date, price, created_by)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, region_id, commodity_id, date_str, price, created_by],
        )?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  async fn update(
    &self,
    id: Uuid,
    changes: ObservationChanges,
  ) -> Result<Option<PriceObservation>> {
    let mut fragment = set_clause(&changes);
    fragment
      .params
      .push(rusqlite::types::Value::Text(encode_uuid(id)));
    let id_param = fragment.params.len();

    let sql = if fragment.sql.is_empty() {
      format!("SELECT {COLUMNS} FROM prices WHERE id = ?{id_param}")
    } else {
      format!(
        "UPDATE prices SET {} WHERE id = ?{id_param} RETURNING {COLUMNS}",
        fragment.sql
      )
    };

    self.one_row(sql, fragment.params).await
  }

  async fn delete(&self, id: Uuid) -> Result<Option<PriceObservation>> {
    let sql = format!("DELETE FROM prices WHERE id = ?1 RETURNING {COLUMNS}");
    self
      .one_row(sql, vec![rusqlite::types::Value::Text(encode_uuid(id))])
      .await
  }
}
