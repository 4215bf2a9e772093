//! The id catalog: the fixed association between human-readable region and
//! commodity names and the opaque ids stored on price rows.
//!
//! A [`Catalog`] is built once at startup (from configuration or
//! [`Catalog::builtin`]) and shared read-only afterwards. Lookups trim
//! surrounding whitespace and are otherwise exact and case-sensitive.

use std::{collections::HashMap, fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

/// Identifier of a region (province).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RegionId(pub u32);

/// Identifier of a tracked commodity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommodityId(pub u32);

impl fmt::Display for RegionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl fmt::Display for CommodityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Configuration shape ─────────────────────────────────────────────────────

/// One `name = id` pair as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub name: String,
  pub id:   u32,
}

/// Deserialisable form of a [`Catalog`].
///
/// ```toml
/// [[catalog.regions]]
/// name = "Aceh"
/// id   = 11
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
  #[serde(default)]
  pub regions:     Vec<CatalogEntry>,
  #[serde(default)]
  pub commodities: Vec<CatalogEntry>,
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// A single name→id table that remembers declaration order.
#[derive(Debug, Clone)]
struct Table<Id> {
  by_name: HashMap<String, Id>,
  order:   Vec<(String, Id)>,
}

impl<Id: Copy + Eq + Hash + fmt::Display> Table<Id> {
  fn build(
    what: &str,
    entries: impl IntoIterator<Item = (String, Id)>,
  ) -> Result<Self> {
    let mut by_name = HashMap::new();
    let mut seen_ids = HashMap::new();
    let mut order = Vec::new();

    for (name, id) in entries {
      let name = name.trim().to_owned();
      if name.is_empty() {
        return Err(Error::InvalidCatalog(format!("blank {what} name for id {id}")));
      }
      if by_name.contains_key(&name) {
        return Err(Error::InvalidCatalog(format!("duplicate {what} name {name:?}")));
      }
      if let Some(other) = seen_ids.insert(id, name.clone()) {
        return Err(Error::InvalidCatalog(format!(
          "{what} id {id} is shared by {other:?} and {name:?}"
        )));
      }
      by_name.insert(name.clone(), id);
      order.push((name, id));
    }

    Ok(Self { by_name, order })
  }

  fn get(&self, name: &str) -> Option<Id> { self.by_name.get(name.trim()).copied() }
}

/// Bidirectional name↔id association for regions and commodities.
#[derive(Debug, Clone)]
pub struct Catalog {
  regions:     Table<RegionId>,
  commodities: Table<CommodityId>,
}

impl Catalog {
  /// Build a catalog from explicit entries.
  ///
  /// Fails if a table contains a blank name, a repeated name, or two names
  /// sharing one id.
  pub fn new(
    regions: impl IntoIterator<Item = (String, RegionId)>,
    commodities: impl IntoIterator<Item = (String, CommodityId)>,
  ) -> Result<Self> {
    Ok(Self {
      regions:     Table::build("region", regions)?,
      commodities: Table::build("commodity", commodities)?,
    })
  }

  pub fn from_config(config: &CatalogConfig) -> Result<Self> {
    Self::new(
      config.regions.iter().map(|e| (e.name.clone(), RegionId(e.id))),
      config.commodities.iter().map(|e| (e.name.clone(), CommodityId(e.id))),
    )
  }

  /// The 34 provinces (keyed by BPS province code) and the 13 staple
  /// commodities tracked by the national price panel.
  pub fn builtin() -> Self {
    let regions = BUILTIN_REGIONS
      .iter()
      .map(|&(name, id)| (name.to_owned(), RegionId(id)));
    let commodities = BUILTIN_COMMODITIES
      .iter()
      .map(|&(name, id)| (name.to_owned(), CommodityId(id)));
    // The built-in tables are constant and free of duplicates.
    match Self::new(regions, commodities) {
      Ok(catalog) => catalog,
      Err(e) => unreachable!("built-in catalog is invalid: {e}"),
    }
  }

  pub fn resolve_region(&self, name: &str) -> Result<RegionId> {
    self
      .regions
      .get(name)
      .ok_or_else(|| Error::RegionNotFound(name.to_owned()))
  }

  pub fn resolve_commodity(&self, name: &str) -> Result<CommodityId> {
    self
      .commodities
      .get(name)
      .ok_or_else(|| Error::CommodityNotFound(name.to_owned()))
  }

  /// Regions in declaration order.
  pub fn regions(&self) -> impl Iterator<Item = (&str, RegionId)> + '_ {
    self.regions.order.iter().map(|(n, id)| (n.as_str(), *id))
  }

  /// Commodities in declaration order.
  pub fn commodities(&self) -> impl Iterator<Item = (&str, CommodityId)> + '_ {
    self.commodities.order.iter().map(|(n, id)| (n.as_str(), *id))
  }

  /// Convert back into the configuration shape, e.g. for `--print-catalog`.
  pub fn to_config(&self) -> CatalogConfig {
    CatalogConfig {
      regions:     self
        .regions()
        .map(|(name, id)| CatalogEntry { name: name.to_owned(), id: id.0 })
        .collect(),
      commodities: self
        .commodities()
        .map(|(name, id)| CatalogEntry { name: name.to_owned(), id: id.0 })
        .collect(),
    }
  }
}

const BUILTIN_REGIONS: &[(&str, u32)] = &[
  ("Aceh", 11),
  ("Sumatera Utara", 12),
  ("Sumatera Barat", 13),
  ("Riau", 14),
  ("Jambi", 15),
  ("Sumatera Selatan", 16),
  ("Bengkulu", 17),
  ("Lampung", 18),
  ("Kepulauan Bangka Belitung", 19),
  ("Kepulauan Riau", 21),
  ("DKI Jakarta", 31),
  ("Jawa Barat", 32),
  ("Jawa Tengah", 33),
  ("DI Yogyakarta", 34),
  ("Jawa Timur", 35),
  ("Banten", 36),
  ("Bali", 51),
  ("Nusa Tenggara Barat", 52),
  ("Nusa Tenggara Timur", 53),
  ("Kalimantan Barat", 61),
  ("Kalimantan Tengah", 62),
  ("Kalimantan Selatan", 63),
  ("Kalimantan Timur", 64),
  ("Kalimantan Utara", 65),
  ("Sulawesi Utara", 71),
  ("Sulawesi Tengah", 72),
  ("Sulawesi Selatan", 73),
  ("Sulawesi Tenggara", 74),
  ("Gorontalo", 75),
  ("Sulawesi Barat", 76),
  ("Maluku", 81),
  ("Maluku Utara", 82),
  ("Papua Barat", 91),
  ("Papua", 94),
];

const BUILTIN_COMMODITIES: &[(&str, u32)] = &[
  ("Bawang Merah", 1),
  ("Bawang Putih Bonggol", 2),
  ("Beras Medium", 3),
  ("Beras Premium", 4),
  ("Cabai Merah Keriting", 5),
  ("Cabai Rawit Merah", 6),
  ("Daging Ayam Ras", 7),
  ("Daging Sapi Murni", 8),
  ("Gula Konsumsi", 9),
  ("Minyak Goreng Curah", 10),
  ("Minyak Goreng Kemasan Sederhana", 11),
  ("Telur Ayam Ras", 12),
  ("Tepung Terigu (Curah)", 13),
];
