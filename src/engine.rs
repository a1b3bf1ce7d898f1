//! Engine facade
//!
//! One explicit context object composing the store, the analyzers, and the
//! scheduler, constructed once by the host and passed by reference to every
//! call site. All time-dependent calls route through the injected clock so
//! isolated instances can be frozen in tests.

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::Clock;
use crate::db::DbPool;
use crate::error::EngineResult;
use crate::insights::InsightGenerator;
use crate::models::{
  CycleData, DailySymptomEntry, Insight, NotificationPreferences, NotificationPreferencesUpdate,
  Phase,
};
use crate::patterns::{self, SymptomPattern, SymptomStats};
use crate::phase::{self, PhaseTheme};
use crate::scheduler::{NotificationScheduler, NotificationSink};
use crate::store::SymptomStore;
use crate::templates::RandomSource;

/// Phase metadata for the current cycle day, consumed by screens to style
/// themselves.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPhase {
  pub cycle_day: u32,
  pub phase: Phase,
  pub theme: PhaseTheme,
  pub days_until_next_period: u32,
}

pub struct CycleEngine {
  clock: Box<dyn Clock>,
  store: SymptomStore,
  insights: InsightGenerator,
  scheduler: NotificationScheduler,
}

impl CycleEngine {
  pub fn new(
    pool: DbPool,
    clock: Box<dyn Clock>,
    sink: Box<dyn NotificationSink>,
    rng: Box<dyn RandomSource>,
  ) -> Self {
    let store = SymptomStore::new(pool.clone());
    let insights = InsightGenerator::new(store.clone());
    let scheduler = NotificationScheduler::new(pool, sink, rng);
    Self {
      clock,
      store,
      insights,
      scheduler,
    }
  }

  /// ---------------------------------------------------------------------------
  /// Daily Logging
  /// ---------------------------------------------------------------------------

  pub async fn today_template(&self) -> EngineResult<DailySymptomEntry> {
    self.store.new_today_template(self.clock.today()).await
  }

  pub async fn save_entry(&self, entry: DailySymptomEntry) -> EngineResult<DailySymptomEntry> {
    self.store.save(entry).await
  }

  pub async fn entry(&self, date: NaiveDate) -> EngineResult<Option<DailySymptomEntry>> {
    self.store.get(date).await
  }

  pub async fn recent_entries(&self, n: usize) -> EngineResult<Vec<DailySymptomEntry>> {
    self.store.get_last_n(n).await
  }

  /// ---------------------------------------------------------------------------
  /// Phase & Analytics
  /// ---------------------------------------------------------------------------

  /// Phase metadata for today. None until a last period date is known.
  pub async fn current_phase(&self) -> EngineResult<Option<CurrentPhase>> {
    let cycle = match self.store.cycle_data().await? {
      Some(cycle) => cycle,
      None => return Ok(None),
    };
    let (cycle_day, phase) =
      phase::day_and_phase(cycle.last_period_date, self.clock.today(), cycle.cycle_length);
    Ok(Some(CurrentPhase {
      cycle_day,
      phase,
      theme: phase::theme_for(phase),
      days_until_next_period: cycle.cycle_length - cycle_day,
    }))
  }

  /// Ranked advisory insights. Best-effort: degrades to empty on store
  /// failure rather than surfacing an error to the presentation layer.
  pub async fn insights(&self) -> Vec<Insight> {
    self.insights.generate(self.clock.today()).await
  }

  /// Filtered per-symptom, per-phase patterns over the full history.
  /// Advisory path: degrades to empty on store failure.
  pub async fn patterns(&self) -> Vec<SymptomPattern> {
    match self.store.get_all().await {
      Ok(entries) => patterns::analyze(&entries),
      Err(e) => {
        tracing::warn!(error = %e, "pattern analysis degraded: entries unavailable");
        Vec::new()
      }
    }
  }

  pub async fn symptom_stats(&self, symptom: &str) -> EngineResult<SymptomStats> {
    let entries = self.store.get_all().await?;
    Ok(patterns::stats(&entries, symptom))
  }

  /// ---------------------------------------------------------------------------
  /// Cycle & Preferences
  /// ---------------------------------------------------------------------------

  pub async fn update_cycle_data(
    &mut self,
    last_period: NaiveDate,
    cycle_length: Option<u32>,
    period_length: Option<u32>,
  ) -> EngineResult<CycleData> {
    let now = self.clock.now();
    self
      .scheduler
      .update_cycle_data(last_period, cycle_length, period_length, now)
      .await
  }

  pub async fn update_preferences(
    &mut self,
    update: &NotificationPreferencesUpdate,
  ) -> EngineResult<NotificationPreferences> {
    let now = self.clock.now();
    self.scheduler.update_preferences(update, now).await
  }

  pub async fn cycle_data(&self) -> EngineResult<Option<CycleData>> {
    self.store.cycle_data().await
  }

  pub async fn preferences(&self) -> EngineResult<NotificationPreferences> {
    self.scheduler.load_preferences().await
  }
}
