//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use harga_core::{
  catalog::{CommodityId, RegionId},
  observation::{Condition, NewObservation, ObservationChanges, ResolvedFilter},
  store::PriceStore,
};
use uuid::Uuid;

use crate::{SqliteStore, error::Error};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, d).unwrap() }

fn row(region: u32, commodity: u32, d: u32, price: f64) -> NewObservation {
  NewObservation {
    region_id:    RegionId(region),
    commodity_id: CommodityId(commodity),
    date:         day(d),
    price,
    created_by:   "tester".into(),
  }
}

async fn seeded() -> SqliteStore {
  let s = store().await;
  for r in [
    row(11, 3, 1, 12000.0),
    row(11, 9, 2, 17500.0),
    row(51, 3, 3, 13000.0),
    row(31, 12, 4, 29000.0),
    row(51, 9, 5, 18000.0),
  ] {
    s.insert(r).await.unwrap();
  }
  s
}

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_assigns_distinct_ids() {
  let s = store().await;
  let a = s.insert(row(11, 3, 1, 1.0)).await.unwrap();
  let b = s.insert(row(11, 3, 1, 1.0)).await.unwrap();
  assert_ne!(a.id, b.id);

  let all = s.select(&ResolvedFilter::default(), 10).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.contains(&a));
  assert!(all.contains(&b));
}

#[tokio::test]
async fn negative_price_is_rejected_by_the_schema() {
  let s = store().await;
  let err = s.insert(row(11, 3, 1, -5.0)).await.unwrap_err();
  assert!(matches!(err, Error::Sqlite(_)), "{err:?}");
  let message = err.to_string();
  assert!(message.contains("CHECK constraint failed"), "{message}");
  assert!(!message.contains("Rusqlite("), "{message}");
  assert_eq!(s.count(&ResolvedFilter::default()).await.unwrap(), 0);
}

// ─── Select / count ──────────────────────────────────────────────────────────

#[tokio::test]
async fn equality_and_membership_filters() {
  let s = seeded().await;

  let aceh = ResolvedFilter {
    regions: Some(Condition::Eq(RegionId(11))),
    ..Default::default()
  };
  let rows = s.select(&aceh, 100).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert!(rows.iter().all(|r| r.region_id == RegionId(11)));

  let aceh_or_bali = ResolvedFilter {
    regions: Some(Condition::In(vec![RegionId(11), RegionId(51)])),
    commodities: Some(Condition::Eq(CommodityId(9))),
    ..Default::default()
  };
  let rows = s.select(&aceh_or_bali, 100).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert!(rows.iter().all(|r| r.commodity_id == CommodityId(9)));
}

#[tokio::test]
async fn date_bounds_are_inclusive() {
  let s = seeded().await;
  let filter = ResolvedFilter {
    start_date: Some(day(2)),
    end_date: Some(day(4)),
    ..Default::default()
  };
  let rows = s.select(&filter, 100).await.unwrap();
  let mut days: Vec<_> = rows.iter().map(|r| r.date).collect();
  days.sort();
  assert_eq!(days, vec![day(2), day(3), day(4)]);
  assert_eq!(s.count(&filter).await.unwrap(), 3);
}

#[tokio::test]
async fn limit_caps_select_but_not_count() {
  let s = seeded().await;
  let all = ResolvedFilter::default();
  assert_eq!(s.select(&all, 2).await.unwrap().len(), 2);
  assert_eq!(s.select(&all, 0).await.unwrap().len(), 0);
  assert_eq!(s.select(&all, usize::MAX).await.unwrap().len(), 5);
  assert_eq!(s.count(&all).await.unwrap(), 5);
}

#[tokio::test]
async fn no_match_returns_empty() {
  let s = seeded().await;
  let filter = ResolvedFilter {
    regions: Some(Condition::Eq(RegionId(94))),
    ..Default::default()
  };
  assert!(s.select(&filter, 100).await.unwrap().is_empty());
  assert_eq!(s.count(&filter).await.unwrap(), 0);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_given_columns() {
  let s = store().await;
  let original = s.insert(row(11, 3, 1, 12000.0)).await.unwrap();

  let updated = s
    .update(original.id, ObservationChanges {
      price: Some(15000.0),
      ..Default::default()
    })
    .await
    .unwrap()
    .expect("row exists");

  assert_eq!(updated.id, original.id);
  assert_eq!(updated.price, 15000.0);
  assert_eq!(updated.region_id, original.region_id);
  assert_eq!(updated.commodity_id, original.commodity_id);
  assert_eq!(updated.date, original.date);
  assert_eq!(updated.created_by, original.created_by);

  let stored = s.select(&ResolvedFilter::default(), 10).await.unwrap();
  assert_eq!(stored, vec![updated]);
}

#[tokio::test]
async fn update_every_column() {
  let s = store().await;
  let original = s.insert(row(11, 3, 1, 12000.0)).await.unwrap();

  let updated = s
    .update(original.id, ObservationChanges {
      region_id:    Some(RegionId(51)),
      commodity_id: Some(CommodityId(4)),
      date:         Some(day(9)),
      price:        Some(0.0),
      created_by:   Some("editor".into()),
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated, harga_core::observation::PriceObservation {
    id:           original.id,
    region_id:    RegionId(51),
    commodity_id: CommodityId(4),
    date:         day(9),
    price:        0.0,
    created_by:   "editor".into(),
  });
}

#[tokio::test]
async fn update_missing_row_is_none() {
  let s = seeded().await;
  let result = s
    .update(Uuid::new_v4(), ObservationChanges {
      price: Some(1.0),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_to_negative_price_fails() {
  let s = store().await;
  let original = s.insert(row(11, 3, 1, 12000.0)).await.unwrap();
  let result = s
    .update(original.id, ObservationChanges {
      price: Some(-1.0),
      ..Default::default()
    })
    .await;
  assert!(result.is_err());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_row_once() {
  let s = seeded().await;
  let victim = s.select(&ResolvedFilter::default(), 1).await.unwrap().remove(0);

  let deleted = s.delete(victim.id).await.unwrap();
  assert_eq!(deleted, Some(victim.clone()));
  assert_eq!(s.delete(victim.id).await.unwrap(), None);
  assert_eq!(s.count(&ResolvedFilter::default()).await.unwrap(), 4);
}

#[tokio::test]
async fn data_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("harga-test-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("prices.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(row(11, 3, 1, 12000.0)).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let rows = s.select(&ResolvedFilter::default(), 10).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].id, id);

  std::fs::remove_dir_all(&dir).ok();
}
