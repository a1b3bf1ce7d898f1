pub mod cycle;
pub mod entry;
pub mod insight;
pub mod notification;

pub use cycle::{CycleData, Phase};
pub use entry::{DailySymptomEntry, Mood, SYMPTOM_KEYS};
pub use insight::{Insight, InsightKind, InsightSeverity};
pub use notification::{
  NotificationCategory, NotificationPreferences, NotificationPreferencesUpdate, QuietHours,
  ScheduledNotification,
};
