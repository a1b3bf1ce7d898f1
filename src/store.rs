//! Symptom store
//!
//! One record per calendar date over the key-value backing store. The store
//! keeps its own ascending date index as a KV value instead of relying on
//! SQL range queries, so range and last-n reads are index slices with each
//! record fetched individually.

use chrono::NaiveDate;

use crate::db::{self, DbPool};
use crate::error::{EngineError, EngineResult};
use crate::models::{CycleData, DailySymptomEntry, SYMPTOM_KEYS};
use crate::phase;

pub const KEY_ENTRY_INDEX: &str = "entry-index";
pub const KEY_CYCLE_DATA: &str = "cycle-data";
pub const KEY_PREFERENCES: &str = "notification-preferences";

pub fn entry_key(date: NaiveDate) -> String {
  format!("entry:{}", date.format("%Y-%m-%d"))
}

/// ---------------------------------------------------------------------------
/// Symptom Store
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SymptomStore {
  pool: DbPool,
}

impl SymptomStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Upsert an entry by date. Validation runs first; nothing is persisted
  /// for a rejected entry. `cycle_day` and `phase` are stamped here from
  /// the cycle data currently known to the store and are never recomputed
  /// retroactively if that data later changes.
  pub async fn save(&self, mut entry: DailySymptomEntry) -> EngineResult<DailySymptomEntry> {
    validate_entry(&entry)?;

    if let Some(cycle) = self.cycle_data().await? {
      let (day, phase) =
        phase::day_and_phase(cycle.last_period_date, entry.date, cycle.cycle_length);
      entry.cycle_day = day;
      entry.phase = phase;
    }

    let json = serde_json::to_string(&entry)?;
    db::kv_set(&self.pool, &entry_key(entry.date), &json).await?;
    self.index_insert(entry.date).await?;

    tracing::debug!(date = %entry.date, "saved daily entry");
    Ok(entry)
  }

  /// Fetch a single entry by date.
  pub async fn get(&self, date: NaiveDate) -> EngineResult<Option<DailySymptomEntry>> {
    match db::kv_get(&self.pool, &entry_key(date)).await? {
      Some(json) => Ok(Some(serde_json::from_str(&json)?)),
      None => Ok(None),
    }
  }

  /// All entries with `start <= date <= end`, ascending by date.
  pub async fn get_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> EngineResult<Vec<DailySymptomEntry>> {
    let dates = self.index().await?;
    let mut entries = Vec::new();
    for date in dates.into_iter().filter(|d| *d >= start && *d <= end) {
      if let Some(entry) = self.get(date).await? {
        entries.push(entry);
      }
    }
    Ok(entries)
  }

  /// The most recent `n` entries, still ascending by date.
  pub async fn get_last_n(&self, n: usize) -> EngineResult<Vec<DailySymptomEntry>> {
    let dates = self.index().await?;
    let tail_start = dates.len().saturating_sub(n);
    let mut entries = Vec::new();
    for date in &dates[tail_start..] {
      if let Some(entry) = self.get(*date).await? {
        entries.push(entry);
      }
    }
    Ok(entries)
  }

  /// Every stored entry, ascending by date.
  pub async fn get_all(&self) -> EngineResult<Vec<DailySymptomEntry>> {
    let dates = self.index().await?;
    let mut entries = Vec::new();
    for date in dates {
      if let Some(entry) = self.get(date).await? {
        entries.push(entry);
      }
    }
    Ok(entries)
  }

  /// Zero-valued entry for `today`: every known symptom at severity 0, no
  /// mood, midpoint energy/sleep, cycle day and phase computed from the
  /// cycle data the store was last told about. Without cycle data the
  /// template defaults to day 0 / menstrual.
  pub async fn new_today_template(&self, today: NaiveDate) -> EngineResult<DailySymptomEntry> {
    let (day, phase) = match self.cycle_data().await? {
      Some(cycle) => phase::day_and_phase(cycle.last_period_date, today, cycle.cycle_length),
      None => (0, crate::models::Phase::Menstrual),
    };
    Ok(DailySymptomEntry::blank(today, day, phase))
  }

  /// The cycle data this store currently knows about, if any.
  pub async fn cycle_data(&self) -> EngineResult<Option<CycleData>> {
    match db::kv_get(&self.pool, KEY_CYCLE_DATA).await? {
      Some(json) => Ok(Some(serde_json::from_str(&json)?)),
      None => Ok(None),
    }
  }

  /// ---------------------------------------------------------------------------
  /// Date Index
  /// ---------------------------------------------------------------------------

  async fn index(&self) -> EngineResult<Vec<NaiveDate>> {
    match db::kv_get(&self.pool, KEY_ENTRY_INDEX).await? {
      Some(json) => Ok(serde_json::from_str(&json)?),
      None => Ok(Vec::new()),
    }
  }

  /// Insert a date into the sorted index. Idempotent: re-inserting a known
  /// date is a no-op.
  async fn index_insert(&self, date: NaiveDate) -> EngineResult<()> {
    let mut dates = self.index().await?;
    if let Err(pos) = dates.binary_search(&date) {
      dates.insert(pos, date);
      let json = serde_json::to_string(&dates)?;
      db::kv_set(&self.pool, KEY_ENTRY_INDEX, &json).await?;
    }
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Write-Boundary Validation
/// ---------------------------------------------------------------------------

/// Severity and scale checks before anything touches the store. Dates are
/// well-formed by construction (`NaiveDate`), so only value ranges and the
/// symptom vocabulary need checking here.
fn validate_entry(entry: &DailySymptomEntry) -> EngineResult<()> {
  for (symptom, severity) in &entry.symptoms {
    if !SYMPTOM_KEYS.contains(&symptom.as_str()) {
      return Err(EngineError::Validation(format!(
        "unknown symptom key: {}",
        symptom
      )));
    }
    if *severity > 10 {
      return Err(EngineError::Validation(format!(
        "severity for {} must be 0-10, got {}",
        symptom, severity
      )));
    }
  }
  if entry.energy_level > 10 {
    return Err(EngineError::Validation(format!(
      "energy level must be 0-10, got {}",
      entry.energy_level
    )));
  }
  if entry.sleep_quality > 10 {
    return Err(EngineError::Validation(format!(
      "sleep quality must be 0-10, got {}",
      entry.sleep_quality
    )));
  }
  if let Some(hours) = entry.sleep_hours {
    if !(0.0..=24.0).contains(&hours) {
      return Err(EngineError::Validation(format!(
        "sleep hours must be 0-24, got {}",
        hours
      )));
    }
  }
  if let Some(weight) = entry.weight {
    if !weight.is_finite() || weight <= 0.0 {
      return Err(EngineError::Validation(format!(
        "weight must be positive, got {}",
        weight
      )));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::initialize_in_memory;
  use crate::models::Phase;
  use crate::test_utils::store_with_cycle;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[tokio::test]
  async fn save_is_idempotent_on_the_index() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    let entry = DailySymptomEntry::blank(d(2025, 3, 5), 0, Phase::Menstrual);

    store.save(entry.clone()).await.unwrap();
    store.save(entry).await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(store.index().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn save_stamps_cycle_day_and_phase_from_stored_cycle_data() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    // Build the entry with wrong phase fields; save must overwrite them.
    let entry = DailySymptomEntry::blank(d(2025, 3, 10), 99, Phase::Luteal);

    let saved = store.save(entry).await.unwrap();

    assert_eq!(saved.cycle_day, 9);
    assert_eq!(saved.phase, Phase::Follicular);
  }

  #[tokio::test]
  async fn reads_come_back_sorted_ascending() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    for day in [12u32, 3, 7, 9, 5] {
      let entry = DailySymptomEntry::blank(d(2025, 3, day), 0, Phase::Menstrual);
      store.save(entry).await.unwrap();
    }

    let all = store.get_all().await.unwrap();
    let dates: Vec<_> = all.iter().map(|e| e.date).collect();
    assert_eq!(
      dates,
      vec![d(2025, 3, 3), d(2025, 3, 5), d(2025, 3, 7), d(2025, 3, 9), d(2025, 3, 12)]
    );

    let range = store.get_range(d(2025, 3, 5), d(2025, 3, 9)).await.unwrap();
    let dates: Vec<_> = range.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![d(2025, 3, 5), d(2025, 3, 7), d(2025, 3, 9)]);

    let last_two = store.get_last_n(2).await.unwrap();
    let dates: Vec<_> = last_two.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![d(2025, 3, 9), d(2025, 3, 12)]);
  }

  #[tokio::test]
  async fn get_last_n_larger_than_stored_returns_everything() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    let entry = DailySymptomEntry::blank(d(2025, 3, 2), 0, Phase::Menstrual);
    store.save(entry).await.unwrap();

    assert_eq!(store.get_last_n(10).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn validation_rejects_out_of_range_severity() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    let mut entry = DailySymptomEntry::blank(d(2025, 3, 5), 0, Phase::Menstrual);
    entry.symptoms.insert("cramps".to_string(), 11);

    let err = store.save(entry).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(store.get_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn validation_rejects_unknown_symptom_key() {
    let store = store_with_cycle(d(2025, 3, 1)).await;
    let mut entry = DailySymptomEntry::blank(d(2025, 3, 5), 0, Phase::Menstrual);
    entry.symptoms.insert("levitation".to_string(), 2);

    let err = store.save(entry).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
  }

  #[tokio::test]
  async fn today_template_uses_stored_cycle_data() {
    let store = store_with_cycle(d(2025, 3, 1)).await;

    let template = store.new_today_template(d(2025, 3, 16)).await.unwrap();

    assert_eq!(template.cycle_day, 15);
    assert_eq!(template.phase, Phase::Ovulation);
    assert!(template.symptoms.values().all(|&s| s == 0));
  }

  #[tokio::test]
  async fn today_template_without_cycle_data_defaults_to_day_zero() {
    let pool = initialize_in_memory().await.unwrap();
    let store = SymptomStore::new(pool);

    let template = store.new_today_template(d(2025, 3, 16)).await.unwrap();

    assert_eq!(template.cycle_day, 0);
    assert_eq!(template.phase, Phase::Menstrual);
  }
}
