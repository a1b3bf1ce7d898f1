use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Notification Category
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
  PeriodReminder,
  OvulationReminder,
  SymptomLogging,
  HealthTip,
  Affirmation,
  DailyCheckin,
  MonthlySummary,
}

impl NotificationCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      NotificationCategory::PeriodReminder => "period_reminder",
      NotificationCategory::OvulationReminder => "ovulation_reminder",
      NotificationCategory::SymptomLogging => "symptom_logging",
      NotificationCategory::HealthTip => "health_tip",
      NotificationCategory::Affirmation => "affirmation",
      NotificationCategory::DailyCheckin => "daily_checkin",
      NotificationCategory::MonthlySummary => "monthly_summary",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Quiet Hours
/// ---------------------------------------------------------------------------

/// User-configured local time window during which nothing may fire.
/// `start > end` denotes an overnight span wrapping midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuietHours {
  pub enabled: bool,
  /// "HH:MM"
  pub start: String,
  /// "HH:MM"
  pub end: String,
}

impl Default for QuietHours {
  fn default() -> Self {
    Self {
      enabled: false,
      start: "22:00".to_string(),
      end: "08:00".to_string(),
    }
  }
}

impl QuietHours {
  /// Parse a "HH:MM" boundary. None for malformed input.
  pub fn parse_boundary(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
  }

  /// Whether a local time-of-day falls inside the window (inclusive bounds).
  /// Supports both a same-day window and one wrapping midnight. A window
  /// with malformed boundaries suppresses nothing.
  pub fn contains(&self, time: NaiveTime) -> bool {
    if !self.enabled {
      return false;
    }
    let (start, end) = match (Self::parse_boundary(&self.start), Self::parse_boundary(&self.end)) {
      (Some(s), Some(e)) => (s, e),
      _ => return false,
    };
    if start <= end {
      time >= start && time <= end
    } else {
      time >= start || time <= end
    }
  }
}

/// ---------------------------------------------------------------------------
/// Notification Preferences
/// ---------------------------------------------------------------------------

/// Persisted per-category toggles plus the quiet-hours window. Mutated by
/// partial merge, never replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
  pub period_reminder: bool,
  pub ovulation_reminder: bool,
  pub symptom_logging: bool,
  pub health_tips: bool,
  pub affirmations: bool,
  pub daily_checkin: bool,
  pub monthly_summary: bool,
  pub quiet_hours: QuietHours,
  /// IANA timezone name, carried for the host; the engine itself compares
  /// wall-clock times only.
  pub timezone: String,
}

impl Default for NotificationPreferences {
  fn default() -> Self {
    Self {
      period_reminder: true,
      ovulation_reminder: true,
      symptom_logging: true,
      health_tips: true,
      affirmations: true,
      daily_checkin: true,
      monthly_summary: true,
      quiet_hours: QuietHours::default(),
      timezone: "UTC".to_string(),
    }
  }
}

/// Partial update merged into stored preferences; `None` leaves the stored
/// field untouched (same shape as a COALESCE-style settings update).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPreferencesUpdate {
  pub period_reminder: Option<bool>,
  pub ovulation_reminder: Option<bool>,
  pub symptom_logging: Option<bool>,
  pub health_tips: Option<bool>,
  pub affirmations: Option<bool>,
  pub daily_checkin: Option<bool>,
  pub monthly_summary: Option<bool>,
  pub quiet_hours: Option<QuietHours>,
  pub timezone: Option<String>,
}

impl NotificationPreferences {
  /// Apply a partial update, returning the merged preferences.
  pub fn merged(&self, update: &NotificationPreferencesUpdate) -> Self {
    Self {
      period_reminder: update.period_reminder.unwrap_or(self.period_reminder),
      ovulation_reminder: update.ovulation_reminder.unwrap_or(self.ovulation_reminder),
      symptom_logging: update.symptom_logging.unwrap_or(self.symptom_logging),
      health_tips: update.health_tips.unwrap_or(self.health_tips),
      affirmations: update.affirmations.unwrap_or(self.affirmations),
      daily_checkin: update.daily_checkin.unwrap_or(self.daily_checkin),
      monthly_summary: update.monthly_summary.unwrap_or(self.monthly_summary),
      quiet_hours: update.quiet_hours.clone().unwrap_or_else(|| self.quiet_hours.clone()),
      timezone: update.timezone.clone().unwrap_or_else(|| self.timezone.clone()),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Scheduled Notification
/// ---------------------------------------------------------------------------

/// One future local reminder. Engine-internal; handed to the host's
/// notification backend and never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
  /// Deterministic identity (category + fire instant) so successive
  /// scheduling runs can be diffed.
  pub id: String,
  pub category: NotificationCategory,
  pub fire_at: DateTime<Utc>,
  pub body: String,
  /// Opaque tag the host can route on when the notification is tapped.
  pub payload_tag: String,
}

impl ScheduledNotification {
  pub fn new(
    category: NotificationCategory,
    fire_at: DateTime<Utc>,
    body: String,
    payload_tag: String,
  ) -> Self {
    let id = format!("{}-{}", category.as_str(), fire_at.format("%Y%m%d%H%M"));
    Self {
      id,
      category,
      fire_at,
      body,
      payload_tag,
    }
  }
}
