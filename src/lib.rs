//! Cycle intelligence engine
//!
//! Turns a last-period date plus a log of daily symptom entries into a
//! deterministic phase classification, per-phase symptom patterns, ranked
//! advisory insights, and a quiet-hours-aware schedule of future local
//! reminders. In-process library: the host UI supplies a storage path, a
//! notification sink, and (optionally) a clock and random source.

mod clock;
mod db;
mod engine;
mod error;
mod insights;
mod models;
mod patterns;
mod phase;
mod scheduler;
mod store;
mod templates;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{initialize_db, initialize_in_memory, kv_get, kv_keys, kv_set, DbPool};
pub use engine::{CurrentPhase, CycleEngine};
pub use error::{EngineError, EngineResult};
pub use insights::InsightGenerator;
pub use models::{
  CycleData, DailySymptomEntry, Insight, InsightKind, InsightSeverity, Mood,
  NotificationCategory, NotificationPreferences, NotificationPreferencesUpdate, Phase,
  QuietHours, ScheduledNotification, SYMPTOM_KEYS,
};
pub use patterns::{analyze, stats, SymptomPattern, SymptomStats, Trend};
pub use phase::{cycle_day, day_and_phase, phase_for_day, theme_for, PhaseTheme};
pub use scheduler::{InMemorySink, NotificationScheduler, NotificationSink};
pub use store::SymptomStore;
pub use templates::{RandomSource, SeededSource, ThreadRngSource};
