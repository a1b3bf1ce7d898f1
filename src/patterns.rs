//! Per-symptom, per-phase pattern statistics
//!
//! Pure computation over a set of daily entries: no I/O, no clock. Results
//! are deterministic and independent of input order because entries are
//! sorted internally and both symptoms and phases are walked in fixed
//! order. Derived on demand, never persisted.

use serde::{Deserialize, Serialize};

use crate::models::{DailySymptomEntry, Phase, SYMPTOM_KEYS};

/// ---------------------------------------------------------------------------
/// Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
  Increasing,
  Decreasing,
  Stable,
}

/// Aggregated statistics for one symptom within one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPattern {
  pub symptom: String,
  pub phase: Phase,
  /// Mean of nonzero severities, rounded to 1 decimal.
  pub average_severity: f64,
  /// Percent of this phase's entries with nonzero severity, rounded.
  pub frequency: u32,
  pub trend: Trend,
}

/// Whole-history summary for a single symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomStats {
  pub total_occurrences: u32,
  pub average_severity: f64,
  pub max_severity: u8,
  /// Phase with the most nonzero occurrences. Ties resolve to the first
  /// maximum in the fixed menstrual -> luteal iteration order; no stronger
  /// ordering is guaranteed.
  pub most_common_phase: Option<Phase>,
}

/// Keep a pattern only when it clears the fixed noise threshold. Product
/// decision, not a derived constant.
const MIN_FREQUENCY_PCT: u32 = 20;
const MIN_AVG_SEVERITY: f64 = 3.0;

/// Half-mean gap beyond which a trend counts as moving.
const TREND_DELTA: f64 = 0.5;

fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Analysis
/// ---------------------------------------------------------------------------

/// Compute filtered (symptom x phase) patterns for an entry set.
pub fn analyze(entries: &[DailySymptomEntry]) -> Vec<SymptomPattern> {
  let mut sorted: Vec<&DailySymptomEntry> = entries.iter().collect();
  sorted.sort_by_key(|e| e.date);

  let mut patterns = Vec::new();

  for phase in Phase::ALL {
    let phase_entries: Vec<&&DailySymptomEntry> =
      sorted.iter().filter(|e| e.phase == phase).collect();
    if phase_entries.is_empty() {
      continue;
    }

    for symptom in SYMPTOM_KEYS {
      let severities: Vec<u8> = phase_entries
        .iter()
        .map(|e| e.severity(symptom))
        .collect();
      let nonzero: Vec<u8> = severities.iter().copied().filter(|&s| s > 0).collect();
      if nonzero.is_empty() {
        continue;
      }

      let average_severity = round1(
        nonzero.iter().map(|&s| s as f64).sum::<f64>() / nonzero.len() as f64,
      );
      let frequency =
        ((nonzero.len() as f64 / phase_entries.len() as f64) * 100.0).round() as u32;
      let trend = trend_of(&severities);

      if frequency > MIN_FREQUENCY_PCT || average_severity > MIN_AVG_SEVERITY {
        patterns.push(SymptomPattern {
          symptom: symptom.to_string(),
          phase,
          average_severity,
          frequency,
          trend,
        });
      }
    }
  }

  patterns
}

/// Midpoint-split trend over date-ordered severities: compare the mean of
/// nonzero values in each half. A half with no nonzero values contributes 0.
fn trend_of(severities: &[u8]) -> Trend {
  let mid = severities.len() / 2;
  let (first, second) = severities.split_at(mid);

  let half_mean = |half: &[u8]| -> f64 {
    let nonzero: Vec<f64> = half.iter().filter(|&&s| s > 0).map(|&s| s as f64).collect();
    if nonzero.is_empty() {
      0.0
    } else {
      nonzero.iter().sum::<f64>() / nonzero.len() as f64
    }
  };

  let delta = half_mean(second) - half_mean(first);
  if delta > TREND_DELTA {
    Trend::Increasing
  } else if delta < -TREND_DELTA {
    Trend::Decreasing
  } else {
    Trend::Stable
  }
}

/// Whole-history stats for one symptom.
pub fn stats(entries: &[DailySymptomEntry], symptom: &str) -> SymptomStats {
  let severities: Vec<u8> = entries
    .iter()
    .map(|e| e.severity(symptom))
    .filter(|&s| s > 0)
    .collect();

  let total_occurrences = severities.len() as u32;
  let average_severity = if severities.is_empty() {
    0.0
  } else {
    round1(severities.iter().map(|&s| s as f64).sum::<f64>() / severities.len() as f64)
  };
  let max_severity = severities.iter().copied().max().unwrap_or(0);

  let mut most_common_phase = None;
  let mut best_count = 0usize;
  for phase in Phase::ALL {
    let count = entries
      .iter()
      .filter(|e| e.phase == phase && e.severity(symptom) > 0)
      .count();
    if count > best_count {
      best_count = count;
      most_common_phase = Some(phase);
    }
  }

  SymptomStats {
    total_occurrences,
    average_severity,
    max_severity,
    most_common_phase,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use crate::test_utils::entry_with as entry;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn menstrual_cramps_fixture_matches_expected_numbers() {
    // 6 entries with cramps=8 and 4 with cramps=0, all menstrual.
    let mut entries = Vec::new();
    for i in 0..6 {
      entries.push(entry(d(2025, 1, 1 + i), Phase::Menstrual, "cramps", 8));
    }
    for i in 0..4 {
      entries.push(entry(d(2025, 2, 1 + i), Phase::Menstrual, "cramps", 0));
    }

    let patterns = analyze(&entries);
    let cramps = patterns
      .iter()
      .find(|p| p.symptom == "cramps" && p.phase == Phase::Menstrual)
      .expect("cramps pattern should survive the filter");

    assert_eq!(cramps.frequency, 60);
    assert_eq!(cramps.average_severity, 8.0);
  }

  #[test]
  fn analyze_is_input_order_independent() {
    let mut entries = vec![
      entry(d(2025, 1, 1), Phase::Menstrual, "cramps", 2),
      entry(d(2025, 1, 2), Phase::Menstrual, "cramps", 4),
      entry(d(2025, 1, 3), Phase::Menstrual, "cramps", 6),
      entry(d(2025, 1, 4), Phase::Menstrual, "cramps", 8),
    ];

    let forward = analyze(&entries);
    entries.reverse();
    let backward = analyze(&entries);

    assert_eq!(forward, backward);
  }

  #[test]
  fn trend_classification_uses_midpoint_halves() {
    // First half mean 2, second half mean 7 -> increasing.
    let rising = vec![
      entry(d(2025, 1, 1), Phase::Luteal, "headache", 2),
      entry(d(2025, 1, 2), Phase::Luteal, "headache", 2),
      entry(d(2025, 1, 3), Phase::Luteal, "headache", 7),
      entry(d(2025, 1, 4), Phase::Luteal, "headache", 7),
    ];
    let patterns = analyze(&rising);
    assert_eq!(patterns[0].trend, Trend::Increasing);

    let falling = vec![
      entry(d(2025, 1, 1), Phase::Luteal, "headache", 7),
      entry(d(2025, 1, 2), Phase::Luteal, "headache", 7),
      entry(d(2025, 1, 3), Phase::Luteal, "headache", 2),
      entry(d(2025, 1, 4), Phase::Luteal, "headache", 2),
    ];
    assert_eq!(analyze(&falling)[0].trend, Trend::Decreasing);

    let flat = vec![
      entry(d(2025, 1, 1), Phase::Luteal, "headache", 5),
      entry(d(2025, 1, 2), Phase::Luteal, "headache", 5),
      entry(d(2025, 1, 3), Phase::Luteal, "headache", 5),
      entry(d(2025, 1, 4), Phase::Luteal, "headache", 5),
    ];
    assert_eq!(analyze(&flat)[0].trend, Trend::Stable);
  }

  #[test]
  fn empty_first_half_counts_as_zero_mean() {
    // Nonzero severities only in the second half: delta = 6 - 0.
    let entries = vec![
      entry(d(2025, 1, 1), Phase::Follicular, "acne", 0),
      entry(d(2025, 1, 2), Phase::Follicular, "acne", 0),
      entry(d(2025, 1, 3), Phase::Follicular, "acne", 6),
      entry(d(2025, 1, 4), Phase::Follicular, "acne", 6),
    ];

    let patterns = analyze(&entries);
    assert_eq!(patterns[0].trend, Trend::Increasing);
    assert_eq!(patterns[0].frequency, 50);
  }

  #[test]
  fn noise_filter_drops_rare_mild_patterns() {
    // 1 nonzero out of 10 (frequency 10) at severity 2: below both gates.
    let mut entries = vec![entry(d(2025, 1, 1), Phase::Menstrual, "nausea", 2)];
    for i in 0..9 {
      entries.push(entry(d(2025, 1, 2 + i), Phase::Menstrual, "nausea", 0));
    }

    assert!(analyze(&entries).is_empty());
  }

  #[test]
  fn low_frequency_high_severity_survives_the_filter() {
    // frequency 10 but average severity 9 -> kept via the severity gate.
    let mut entries = vec![entry(d(2025, 1, 1), Phase::Menstrual, "cramps", 9)];
    for i in 0..9 {
      entries.push(entry(d(2025, 1, 2 + i), Phase::Menstrual, "cramps", 0));
    }

    let patterns = analyze(&entries);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].frequency, 10);
  }

  #[test]
  fn stats_reports_counts_and_most_common_phase() {
    let entries = vec![
      entry(d(2025, 1, 1), Phase::Menstrual, "fatigue", 6),
      entry(d(2025, 1, 2), Phase::Menstrual, "fatigue", 4),
      entry(d(2025, 1, 10), Phase::Follicular, "fatigue", 8),
      entry(d(2025, 1, 25), Phase::Luteal, "fatigue", 0),
    ];

    let s = stats(&entries, "fatigue");

    assert_eq!(s.total_occurrences, 3);
    assert_eq!(s.average_severity, 6.0);
    assert_eq!(s.max_severity, 8);
    assert_eq!(s.most_common_phase, Some(Phase::Menstrual));
  }

  #[test]
  fn stats_with_no_occurrences() {
    let entries = vec![entry(d(2025, 1, 1), Phase::Menstrual, "fatigue", 0)];

    let s = stats(&entries, "fatigue");

    assert_eq!(s.total_occurrences, 0);
    assert_eq!(s.average_severity, 0.0);
    assert_eq!(s.max_severity, 0);
    assert_eq!(s.most_common_phase, None);
  }

  #[test]
  fn stats_tie_break_is_stable_under_fixed_phase_order() {
    let entries = vec![
      entry(d(2025, 1, 20), Phase::Luteal, "bloating", 5),
      entry(d(2025, 1, 1), Phase::Menstrual, "bloating", 5),
    ];

    // Equal counts: the first maximum in fixed order wins.
    assert_eq!(stats(&entries, "bloating").most_common_phase, Some(Phase::Menstrual));
  }
}
