//! Shared test fixtures
//!
//! In-memory store setup and entry factories used across module tests.

use chrono::NaiveDate;

use crate::db::{self, initialize_in_memory};
use crate::models::{CycleData, DailySymptomEntry, Phase};
use crate::store::{SymptomStore, KEY_CYCLE_DATA};

/// An in-memory store seeded with cycle data derived from `last_period`
/// (28-day cycle, 5-day period).
pub async fn store_with_cycle(last_period: NaiveDate) -> SymptomStore {
  let pool = initialize_in_memory().await.expect("in-memory pool");
  let cycle = CycleData::derive(last_period, 28, 5);
  db::kv_set(
    &pool,
    KEY_CYCLE_DATA,
    &serde_json::to_string(&cycle).expect("serialize cycle data"),
  )
  .await
  .expect("seed cycle data");
  SymptomStore::new(pool)
}

/// Blank entry with a single symptom set.
pub fn entry_with(date: NaiveDate, phase: Phase, symptom: &str, severity: u8) -> DailySymptomEntry {
  let mut entry = DailySymptomEntry::blank(date, 0, phase);
  entry.symptoms.insert(symptom.to_string(), severity);
  entry
}
