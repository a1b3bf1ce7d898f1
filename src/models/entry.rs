use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cycle::Phase;

/// The fixed symptom vocabulary. Every entry carries a severity (0-10,
/// 0 = absent) for each of these keys; unknown keys are rejected at the
/// store's write boundary.
pub const SYMPTOM_KEYS: [&str; 12] = [
  "cramps",
  "headache",
  "bloating",
  "fatigue",
  "acne",
  "breast_tenderness",
  "mood_swings",
  "anxiety",
  "backache",
  "nausea",
  "cravings",
  "insomnia",
];

/// ---------------------------------------------------------------------------
/// Mood
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
  Happy,
  Calm,
  Neutral,
  Sad,
  Irritable,
  Anxious,
}

impl Mood {
  /// Fixed numeric score used by the mood-pattern rule: positive moods 3,
  /// neutral 2, negative moods 1.
  pub fn score(&self) -> u32 {
    match self {
      Mood::Happy | Mood::Calm => 3,
      Mood::Neutral => 2,
      Mood::Sad | Mood::Irritable | Mood::Anxious => 1,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Daily Symptom Entry
/// ---------------------------------------------------------------------------

/// One record per calendar date. `cycle_day` and `phase` are frozen at save
/// time from whatever last-period date the store knew then; they are not
/// recomputed retroactively if the cycle data later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySymptomEntry {
  pub date: NaiveDate,
  /// symptom key -> severity 0-10, 0 = absent
  pub symptoms: BTreeMap<String, u8>,
  pub mood: Option<Mood>,
  pub energy_level: u8,
  pub sleep_quality: u8,
  pub sleep_hours: Option<f64>,
  pub weight: Option<f64>,
  pub notes: String,
  /// Zero-indexed offset into the cycle at save time.
  pub cycle_day: u32,
  pub phase: Phase,
}

impl DailySymptomEntry {
  /// Severity for a symptom key, 0 when unrecorded.
  pub fn severity(&self, symptom: &str) -> u8 {
    self.symptoms.get(symptom).copied().unwrap_or(0)
  }

  /// Zero-valued entry for a date: every known symptom at 0, no mood,
  /// midpoint defaults for energy and sleep.
  pub fn blank(date: NaiveDate, cycle_day: u32, phase: Phase) -> Self {
    let symptoms = SYMPTOM_KEYS
      .iter()
      .map(|k| (k.to_string(), 0u8))
      .collect::<BTreeMap<_, _>>();

    Self {
      date,
      symptoms,
      mood: None,
      energy_level: 5,
      sleep_quality: 5,
      sleep_hours: None,
      weight: None,
      notes: String::new(),
      cycle_day,
      phase,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_entry_covers_every_symptom_key() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
    let entry = DailySymptomEntry::blank(date, 3, Phase::Menstrual);

    assert_eq!(entry.symptoms.len(), SYMPTOM_KEYS.len());
    assert!(entry.symptoms.values().all(|&s| s == 0));
    assert_eq!(entry.energy_level, 5);
    assert_eq!(entry.sleep_quality, 5);
    assert!(entry.mood.is_none());
  }

  #[test]
  fn severity_defaults_to_zero_for_missing_key() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
    let mut entry = DailySymptomEntry::blank(date, 0, Phase::Menstrual);
    entry.symptoms.insert("cramps".to_string(), 7);

    assert_eq!(entry.severity("cramps"), 7);
    assert_eq!(entry.severity("headache"), 0);
  }

  #[test]
  fn mood_scores_follow_fixed_map() {
    assert_eq!(Mood::Happy.score(), 3);
    assert_eq!(Mood::Calm.score(), 3);
    assert_eq!(Mood::Neutral.score(), 2);
    assert_eq!(Mood::Sad.score(), 1);
    assert_eq!(Mood::Irritable.score(), 1);
    assert_eq!(Mood::Anxious.score(), 1);
  }
}
