//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so that lexical comparison matches
//! calendar order. UUIDs are stored as hyphenated lowercase strings.

use chrono::NaiveDate;
use harga_core::{
  catalog::{CommodityId, RegionId},
  observation::PriceObservation,
};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every statement that reads whole rows.
pub const COLUMNS: &str = "id, region_id, commodity_id, date, price, created_by";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn encode_region(id: RegionId) -> i64 { i64::from(id.0) }

pub fn encode_commodity(id: CommodityId) -> i64 { i64::from(id.0) }

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `prices` row.
pub struct RawObservation {
  pub id:           String,
  pub region_id:    u32,
  pub commodity_id: u32,
  pub date:         String,
  pub price:        f64,
  pub created_by:   String,
}

impl RawObservation {
  /// Read a row selected with [`COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      region_id:    row.get(1)?,
      commodity_id: row.get(2)?,
      date:         row.get(3)?,
      price:        row.get(4)?,
      created_by:   row.get(5)?,
    })
  }

  pub fn into_observation(self) -> Result<PriceObservation> {
    Ok(PriceObservation {
      id:           decode_uuid(&self.id)?,
      region_id:    RegionId(self.region_id),
      commodity_id: CommodityId(self.commodity_id),
      date:         decode_date(&self.date)?,
      price:        self.price,
      created_by:   self.created_by,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_format() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(encode_date(d), "2024-03-07");
    assert_eq!(decode_date("2024-03-07").unwrap(), d);
    assert!(matches!(decode_date("07/03/2024"), Err(Error::DateParse(_))));
  }
}
