//! Local reminder scheduling
//!
//! Expands the enabled preference categories into concrete future instants,
//! filters them through quiet hours, then reconciles against what the
//! host's notification backend already has scheduled. The reconcile is a
//! diff: stale notifications are cancelled and missing ones scheduled, so
//! an interrupted run leaves a partially-updated but still valid schedule
//! rather than an empty one.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::db::{self, DbPool};
use crate::error::{EngineError, EngineResult};
use crate::models::{
  CycleData, NotificationCategory, NotificationPreferences, NotificationPreferencesUpdate,
  Phase, QuietHours, ScheduledNotification,
};
use crate::models::cycle::{DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};
use crate::phase;
use crate::store::{KEY_CYCLE_DATA, KEY_PREFERENCES};
use crate::templates::{self, RandomSource};

/// How far ahead the recurring daily categories are expanded.
const DAILY_HORIZON_DAYS: i64 = 30;

/// Fixed local clock times per recurring category.
const SYMPTOM_LOGGING_TIME: (u32, u32) = (9, 0);
const HEALTH_TIP_TIME: (u32, u32) = (14, 0);
const AFFIRMATION_TIME: (u32, u32) = (19, 0);
const DAILY_CHECKIN_TIME: (u32, u32) = (8, 0);
const REMINDER_TIME: (u32, u32) = (9, 0);
const MONTHLY_SUMMARY_TIME: (u32, u32) = (10, 0);

/// ---------------------------------------------------------------------------
/// Notification Sink
/// ---------------------------------------------------------------------------

/// The host's local notification backend. The engine decides what and when;
/// the sink delivers.
pub trait NotificationSink: Send + Sync {
  fn scheduled(&self) -> EngineResult<Vec<ScheduledNotification>>;
  fn schedule(&mut self, notification: ScheduledNotification) -> EngineResult<()>;
  fn cancel(&mut self, id: &str) -> EngineResult<()>;
  fn cancel_all(&mut self) -> EngineResult<()>;
}

/// Sink that keeps the schedule in memory. Used in tests and headless
/// previews where no platform notification center exists.
#[derive(Debug, Default)]
pub struct InMemorySink {
  pub notifications: Vec<ScheduledNotification>,
  pub cancelled_ids: Vec<String>,
  pub schedule_calls: usize,
}

impl NotificationSink for InMemorySink {
  fn scheduled(&self) -> EngineResult<Vec<ScheduledNotification>> {
    Ok(self.notifications.clone())
  }

  fn schedule(&mut self, notification: ScheduledNotification) -> EngineResult<()> {
    self.schedule_calls += 1;
    self.notifications.push(notification);
    Ok(())
  }

  fn cancel(&mut self, id: &str) -> EngineResult<()> {
    self.notifications.retain(|n| n.id != id);
    self.cancelled_ids.push(id.to_string());
    Ok(())
  }

  fn cancel_all(&mut self) -> EngineResult<()> {
    self.notifications.clear();
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Scheduler
/// ---------------------------------------------------------------------------

pub struct NotificationScheduler {
  pool: DbPool,
  sink: Box<dyn NotificationSink>,
  rng: Box<dyn RandomSource>,
}

impl NotificationScheduler {
  pub fn new(pool: DbPool, sink: Box<dyn NotificationSink>, rng: Box<dyn RandomSource>) -> Self {
    Self { pool, sink, rng }
  }

  pub fn sink(&self) -> &dyn NotificationSink {
    self.sink.as_ref()
  }

  /// Recreate the cycle data wholesale from a new last-period date, persist
  /// it, and reschedule everything.
  pub async fn update_cycle_data(
    &mut self,
    last_period: NaiveDate,
    cycle_length: Option<u32>,
    period_length: Option<u32>,
    now: DateTime<Utc>,
  ) -> EngineResult<CycleData> {
    let cycle = CycleData::derive(
      last_period,
      cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH),
      period_length.unwrap_or(DEFAULT_PERIOD_LENGTH),
    );
    if cycle.cycle_length == 0 || cycle.cycle_length > 90 {
      return Err(EngineError::Validation(format!(
        "cycle length must be 1-90 days, got {}",
        cycle.cycle_length
      )));
    }

    db::kv_set(&self.pool, KEY_CYCLE_DATA, &serde_json::to_string(&cycle)?).await?;
    tracing::info!(last_period = %last_period, cycle_length = cycle.cycle_length, "cycle data updated");

    self.schedule_notifications(now).await?;
    Ok(cycle)
  }

  /// Merge a partial preference update, reschedule with the merged
  /// preferences, and persist them only once the reschedule succeeded. A
  /// scheduling failure therefore leaves the previously persisted
  /// preferences untouched.
  pub async fn update_preferences(
    &mut self,
    update: &NotificationPreferencesUpdate,
    now: DateTime<Utc>,
  ) -> EngineResult<NotificationPreferences> {
    if let Some(quiet) = &update.quiet_hours {
      if QuietHours::parse_boundary(&quiet.start).is_none()
        || QuietHours::parse_boundary(&quiet.end).is_none()
      {
        return Err(EngineError::Validation(format!(
          "quiet hours must be HH:MM, got {}-{}",
          quiet.start, quiet.end
        )));
      }
    }

    let stored = self.load_preferences().await?;
    let merged = stored.merged(update);

    self.reschedule_with(&merged, now).await?;

    db::kv_set(&self.pool, KEY_PREFERENCES, &serde_json::to_string(&merged)?).await?;
    Ok(merged)
  }

  /// Re-derive the full future notification set from the stored
  /// preferences and cycle data, and reconcile the sink against it.
  pub async fn schedule_notifications(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
    let prefs = self.load_preferences().await?;
    self.reschedule_with(&prefs, now).await
  }

  pub async fn load_preferences(&self) -> EngineResult<NotificationPreferences> {
    match db::kv_get(&self.pool, KEY_PREFERENCES).await? {
      Some(json) => Ok(serde_json::from_str(&json)?),
      None => Ok(NotificationPreferences::default()),
    }
  }

  async fn load_cycle_data(&self) -> EngineResult<Option<CycleData>> {
    match db::kv_get(&self.pool, KEY_CYCLE_DATA).await? {
      Some(json) => Ok(Some(serde_json::from_str(&json)?)),
      None => Ok(None),
    }
  }

  async fn reschedule_with(
    &mut self,
    prefs: &NotificationPreferences,
    now: DateTime<Utc>,
  ) -> EngineResult<()> {
    // Without cycle data there is nothing to anchor the schedule to.
    let desired = match self.load_cycle_data().await? {
      Some(cycle) => build_desired_set(prefs, &cycle, now, self.rng.as_mut()),
      None => Vec::new(),
    };

    let current = self.sink.scheduled()?;

    let mut cancelled = 0usize;
    for existing in &current {
      if !desired.iter().any(|n| n.id == existing.id) {
        self.sink.cancel(&existing.id)?;
        cancelled += 1;
      }
    }

    let mut added = 0usize;
    for notification in desired {
      if !current.iter().any(|n| n.id == notification.id) {
        self.sink.schedule(notification)?;
        added += 1;
      }
    }

    tracing::info!(added, cancelled, "notification schedule reconciled");
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Desired Set Expansion
/// ---------------------------------------------------------------------------

fn at(date: NaiveDate, (hour, minute): (u32, u32)) -> Option<DateTime<Utc>> {
  let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
  Some(date.and_time(time).and_utc())
}

/// Expand the enabled categories into the full desired set: singleton
/// period/ovulation reminders, 30 days of each recurring category, and the
/// monthly summary. Every instant is strictly in the future and outside
/// quiet hours.
fn build_desired_set(
  prefs: &NotificationPreferences,
  cycle: &CycleData,
  now: DateTime<Utc>,
  rng: &mut dyn RandomSource,
) -> Vec<ScheduledNotification> {
  let mut desired = Vec::new();
  let today = now.date_naive();

  // Tip and affirmation copy is keyed by the phase at scheduling time, not
  // the phase that will hold on the fire date. Known approximation, kept.
  let current_phase: Phase = phase::phase_for_day(phase::cycle_day(
    cycle.last_period_date,
    today,
    cycle.cycle_length,
  ));

  let push = |category: NotificationCategory,
                  fire_at: Option<DateTime<Utc>>,
                  body: String,
                  tag: &str,
                  desired: &mut Vec<ScheduledNotification>| {
    if let Some(fire_at) = fire_at {
      if fire_at > now && !prefs.quiet_hours.contains(fire_at.time()) {
        desired.push(ScheduledNotification::new(category, fire_at, body, tag.to_string()));
      }
    }
  };

  if prefs.period_reminder {
    push(
      NotificationCategory::PeriodReminder,
      at(cycle.next_period_date - Duration::days(1), REMINDER_TIME),
      templates::PERIOD_REMINDER_BODY.to_string(),
      "period",
      &mut desired,
    );
  }

  if prefs.ovulation_reminder {
    push(
      NotificationCategory::OvulationReminder,
      at(cycle.ovulation_date, REMINDER_TIME),
      templates::OVULATION_REMINDER_BODY.to_string(),
      "ovulation",
      &mut desired,
    );
  }

  for offset in 0..DAILY_HORIZON_DAYS {
    let date = today + Duration::days(offset);

    if prefs.symptom_logging {
      push(
        NotificationCategory::SymptomLogging,
        at(date, SYMPTOM_LOGGING_TIME),
        templates::symptom_logging_prompt(rng).to_string(),
        "log",
        &mut desired,
      );
    }
    if prefs.health_tips {
      push(
        NotificationCategory::HealthTip,
        at(date, HEALTH_TIP_TIME),
        templates::health_tip(current_phase, rng).to_string(),
        "tip",
        &mut desired,
      );
    }
    if prefs.affirmations {
      push(
        NotificationCategory::Affirmation,
        at(date, AFFIRMATION_TIME),
        templates::affirmation(current_phase, rng).to_string(),
        "affirmation",
        &mut desired,
      );
    }
    if prefs.daily_checkin {
      push(
        NotificationCategory::DailyCheckin,
        at(date, DAILY_CHECKIN_TIME),
        templates::daily_checkin_prompt(rng).to_string(),
        "checkin",
        &mut desired,
      );
    }
  }

  if prefs.monthly_summary {
    push(
      NotificationCategory::MonthlySummary,
      first_of_next_month(today).and_then(|d| at(d, MONTHLY_SUMMARY_TIME)),
      templates::MONTHLY_SUMMARY_BODY.to_string(),
      "summary",
      &mut desired,
    );
  }

  desired.sort_by_key(|n| n.fire_at);
  desired
}

fn first_of_next_month(today: NaiveDate) -> Option<NaiveDate> {
  if today.month() == 12 {
    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
  } else {
    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
  }
}
