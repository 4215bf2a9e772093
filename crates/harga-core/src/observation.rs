//! Price observations and the inputs used to create, change and filter them.
//!
//! Two layers of types live here. The name-level types ([`NewPriceEntry`],
//! [`PriceEntryPatch`], [`PriceFilter`]) carry what a caller typed. The
//! id-level types ([`NewObservation`], [`ObservationChanges`],
//! [`ResolvedFilter`]) are what a [`PriceStore`](crate::store::PriceStore)
//! receives after the catalog has translated every name.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  catalog::{Catalog, CommodityId, RegionId},
};

// ─── Stored row ──────────────────────────────────────────────────────────────

/// One observed price of a commodity in a region on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
  /// Assigned by the store on insert; never changes afterwards.
  pub id:           Uuid,
  pub region_id:    RegionId,
  pub commodity_id: CommodityId,
  pub date:         NaiveDate,
  pub price:        f64,
  pub created_by:   String,
}

// ─── Name-level inputs ───────────────────────────────────────────────────────

/// A new observation as submitted by a caller.
#[derive(Debug, Clone)]
pub struct NewPriceEntry {
  pub region:     String,
  pub commodity:  String,
  pub date:       NaiveDate,
  pub price:      f64,
  pub created_by: String,
}

/// A partial update. `None` and empty strings both mean "leave as is".
#[derive(Debug, Clone, Default)]
pub struct PriceEntryPatch {
  pub region:     Option<String>,
  pub commodity:  Option<String>,
  pub date:       Option<NaiveDate>,
  pub price:      Option<f64>,
  pub created_by: Option<String>,
}

/// Name-level filter set for list and count.
#[derive(Debug, Clone, Default)]
pub struct PriceFilter {
  /// Inclusive lower bound on `date`.
  pub start_date:  Option<NaiveDate>,
  /// Inclusive upper bound on `date`.
  pub end_date:    Option<NaiveDate>,
  pub regions:     Vec<String>,
  pub commodities: Vec<String>,
}

// ─── Id-level inputs ─────────────────────────────────────────────────────────

/// A fully-resolved row, minus the id the store will assign.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservation {
  pub region_id:    RegionId,
  pub commodity_id: CommodityId,
  pub date:         NaiveDate,
  pub price:        f64,
  pub created_by:   String,
}

impl NewObservation {
  pub fn into_stored(self, id: Uuid) -> PriceObservation {
    PriceObservation {
      id,
      region_id: self.region_id,
      commodity_id: self.commodity_id,
      date: self.date,
      price: self.price,
      created_by: self.created_by,
    }
  }
}

/// Column changes for an update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationChanges {
  pub region_id:    Option<RegionId>,
  pub commodity_id: Option<CommodityId>,
  pub date:         Option<NaiveDate>,
  pub price:        Option<f64>,
  pub created_by:   Option<String>,
}

impl ObservationChanges {
  pub fn is_empty(&self) -> bool {
    self.region_id.is_none()
      && self.commodity_id.is_none()
      && self.date.is_none()
      && self.price.is_none()
      && self.created_by.is_none()
  }

  /// Apply these changes to `row` in place.
  pub fn apply_to(&self, row: &mut PriceObservation) {
    if let Some(id) = self.region_id {
      row.region_id = id;
    }
    if let Some(id) = self.commodity_id {
      row.commodity_id = id;
    }
    if let Some(date) = self.date {
      row.date = date;
    }
    if let Some(price) = self.price {
      row.price = price;
    }
    if let Some(by) = &self.created_by {
      row.created_by = by.clone();
    }
  }
}

/// A column condition: equality for a single id, set membership otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<T> {
  Eq(T),
  In(Vec<T>),
}

impl<T: Copy + Ord> Condition<T> {
  /// Collapse `ids` into a condition. Returns `None` for an empty set.
  pub fn from_set(ids: BTreeSet<T>) -> Option<Self> {
    match ids.len() {
      0 => None,
      1 => ids.into_iter().next().map(Condition::Eq),
      _ => Some(Condition::In(ids.into_iter().collect())),
    }
  }

  pub fn matches(&self, value: T) -> bool {
    match self {
      Condition::Eq(v) => *v == value,
      Condition::In(vs) => vs.contains(&value),
    }
  }
}

/// Id-level filter handed to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFilter {
  pub start_date:  Option<NaiveDate>,
  pub end_date:    Option<NaiveDate>,
  pub regions:     Option<Condition<RegionId>>,
  pub commodities: Option<Condition<CommodityId>>,
}

impl ResolvedFilter {
  /// Whether `row` satisfies every present condition.
  pub fn matches(&self, row: &PriceObservation) -> bool {
    self.start_date.is_none_or(|d| row.date >= d)
      && self.end_date.is_none_or(|d| row.date <= d)
      && self.regions.as_ref().is_none_or(|c| c.matches(row.region_id))
      && self
        .commodities
        .as_ref()
        .is_none_or(|c| c.matches(row.commodity_id))
  }
}

// ─── Validation and resolution ───────────────────────────────────────────────

fn check_price(price: f64) -> Result<f64> {
  if price.is_finite() && price >= 0.0 {
    Ok(price)
  } else {
    Err(Error::InvalidPrice(price))
  }
}

/// Treat `Some("")` (after trimming) the same as `None`.
fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

impl NewPriceEntry {
  pub fn resolve(&self, catalog: &Catalog) -> Result<NewObservation> {
    let region_id = catalog.resolve_region(&self.region)?;
    let commodity_id = catalog.resolve_commodity(&self.commodity)?;
    let price = check_price(self.price)?;
    if self.created_by.trim().is_empty() {
      return Err(Error::MissingField("created_by"));
    }
    Ok(NewObservation {
      region_id,
      commodity_id,
      date: self.date,
      price,
      created_by: self.created_by.clone(),
    })
  }
}

impl PriceEntryPatch {
  /// Validate and translate every present field.
  ///
  /// Returns [`Error::NoFieldsToUpdate`] if nothing remains.
  pub fn resolve(&self, catalog: &Catalog) -> Result<ObservationChanges> {
    let changes = ObservationChanges {
      region_id:    non_blank(self.region.as_deref())
        .map(|n| catalog.resolve_region(n))
        .transpose()?,
      commodity_id: non_blank(self.commodity.as_deref())
        .map(|n| catalog.resolve_commodity(n))
        .transpose()?,
      date:         self.date,
      price:        self.price.map(check_price).transpose()?,
      created_by:   non_blank(self.created_by.as_deref()).map(str::to_owned),
    };

    if changes.is_empty() {
      return Err(Error::NoFieldsToUpdate);
    }
    Ok(changes)
  }
}

impl PriceFilter {
  /// Resolve every region and commodity name. A single unknown name fails
  /// the whole filter.
  pub fn resolve(&self, catalog: &Catalog) -> Result<ResolvedFilter> {
    let regions = self
      .regions
      .iter()
      .map(|n| catalog.resolve_region(n))
      .collect::<Result<BTreeSet<_>>>()?;
    let commodities = self
      .commodities
      .iter()
      .map(|n| catalog.resolve_commodity(n))
      .collect::<Result<BTreeSet<_>>>()?;

    Ok(ResolvedFilter {
      start_date:  self.start_date,
      end_date:    self.end_date,
      regions:     Condition::from_set(regions),
      commodities: Condition::from_set(commodities),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn entry() -> NewPriceEntry {
    NewPriceEntry {
      region:     "Aceh".into(),
      commodity:  "Beras Medium".into(),
      date:       day(2024, 1, 1),
      price:      12000.0,
      created_by: "tester".into(),
    }
  }

  #[test]
  fn entry_resolves_names_to_ids() {
    let c = Catalog::builtin();
    let row = entry().resolve(&c).unwrap();
    assert_eq!(row.region_id, c.resolve_region("Aceh").unwrap());
    assert_eq!(row.commodity_id, c.resolve_commodity("Beras Medium").unwrap());
    assert_eq!(row.price, 12000.0);
  }

  #[test]
  fn entry_rejects_negative_and_nan_prices() {
    let c = Catalog::builtin();
    let mut e = entry();
    e.price = -1.0;
    assert!(matches!(e.resolve(&c), Err(Error::InvalidPrice(_))));
    e.price = f64::NAN;
    assert!(matches!(e.resolve(&c), Err(Error::InvalidPrice(_))));
    e.price = 0.0;
    assert!(e.resolve(&c).is_ok());
  }

  #[test]
  fn entry_requires_created_by() {
    let c = Catalog::builtin();
    let mut e = entry();
    e.created_by = "   ".into();
    assert!(matches!(e.resolve(&c), Err(Error::MissingField("created_by"))));
  }

  #[test]
  fn entry_with_unknown_commodity_is_not_found() {
    let c = Catalog::builtin();
    let mut e = entry();
    e.commodity = "Garam".into();
    assert!(matches!(e.resolve(&c), Err(Error::CommodityNotFound(n)) if n == "Garam"));
  }

  #[test]
  fn empty_patch_has_no_fields() {
    let c = Catalog::builtin();
    let err = PriceEntryPatch::default().resolve(&c).unwrap_err();
    assert!(matches!(err, Error::NoFieldsToUpdate));
    assert_eq!(err.to_string(), "No valid fields to update");
  }

  #[test]
  fn blank_strings_in_patch_count_as_absent() {
    let c = Catalog::builtin();
    let patch = PriceEntryPatch {
      region: Some(String::new()),
      created_by: Some("  ".into()),
      ..Default::default()
    };
    assert!(matches!(patch.resolve(&c), Err(Error::NoFieldsToUpdate)));
  }

  #[test]
  fn price_only_patch_touches_only_price() {
    let c = Catalog::builtin();
    let patch = PriceEntryPatch { price: Some(15000.0), ..Default::default() };
    let changes = patch.resolve(&c).unwrap();
    assert_eq!(changes, ObservationChanges {
      price: Some(15000.0),
      ..Default::default()
    });

    let mut row = entry().resolve(&c).unwrap().into_stored(Uuid::new_v4());
    let before = row.clone();
    changes.apply_to(&mut row);
    assert_eq!(row.price, 15000.0);
    assert_eq!(row.region_id, before.region_id);
    assert_eq!(row.commodity_id, before.commodity_id);
    assert_eq!(row.date, before.date);
    assert_eq!(row.created_by, before.created_by);
  }

  #[test]
  fn patch_with_unknown_region_is_not_found() {
    let c = Catalog::builtin();
    let patch = PriceEntryPatch {
      region: Some("Atlantis".into()),
      price: Some(1.0),
      ..Default::default()
    };
    assert!(matches!(patch.resolve(&c), Err(Error::RegionNotFound(_))));
  }

  #[test]
  fn single_name_becomes_equality_and_duplicates_collapse() {
    let c = Catalog::builtin();
    let one = PriceFilter { regions: vec!["Aceh".into()], ..Default::default() };
    let twice = PriceFilter {
      regions: vec!["Aceh".into(), " Aceh".into()],
      ..Default::default()
    };
    let a = one.resolve(&c).unwrap();
    let b = twice.resolve(&c).unwrap();
    assert_eq!(a.regions, Some(Condition::Eq(RegionId(11))));
    assert_eq!(a, b);
  }

  #[test]
  fn several_names_become_membership() {
    let c = Catalog::builtin();
    let f = PriceFilter {
      commodities: vec!["Gula Konsumsi".into(), "Bawang Merah".into()],
      ..Default::default()
    };
    let resolved = f.resolve(&c).unwrap();
    assert_eq!(
      resolved.commodities,
      Some(Condition::In(vec![CommodityId(1), CommodityId(9)]))
    );
    assert_eq!(resolved.regions, None);
  }

  #[test]
  fn one_bad_name_fails_the_whole_filter() {
    let c = Catalog::builtin();
    let f = PriceFilter {
      regions: vec!["Aceh".into(), "Unknownland".into(), "Bali".into()],
      ..Default::default()
    };
    assert!(matches!(f.resolve(&c), Err(Error::RegionNotFound(n)) if n == "Unknownland"));
  }

  #[test]
  fn resolved_filter_matches_inclusive_dates() {
    let c = Catalog::builtin();
    let row = entry().resolve(&c).unwrap().into_stored(Uuid::new_v4());
    let f = ResolvedFilter {
      start_date: Some(day(2024, 1, 1)),
      end_date: Some(day(2024, 1, 1)),
      ..Default::default()
    };
    assert!(f.matches(&row));
    let later = ResolvedFilter { start_date: Some(day(2024, 1, 2)), ..Default::default() };
    assert!(!later.matches(&row));
  }
}
