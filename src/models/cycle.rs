use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Hormonal Phase
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Menstrual,  // days 1-7
  Follicular, // days 8-14
  Ovulation,  // days 15-21
  Luteal,     // days 22-28
}

impl Phase {
  /// Fixed iteration order, used everywhere a per-phase scan happens so
  /// results are stable for a given entry set.
  pub const ALL: [Phase; 4] = [
    Phase::Menstrual,
    Phase::Follicular,
    Phase::Ovulation,
    Phase::Luteal,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Menstrual => "menstrual",
      Phase::Follicular => "follicular",
      Phase::Ovulation => "ovulation",
      Phase::Luteal => "luteal",
    }
  }

  /// Display name for UI copy and insight text.
  pub fn display_name(&self) -> &'static str {
    match self {
      Phase::Menstrual => "Menstrual",
      Phase::Follicular => "Follicular",
      Phase::Ovulation => "Ovulation",
      Phase::Luteal => "Luteal",
    }
  }
}

impl std::fmt::Display for Phase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Cycle Data
/// ---------------------------------------------------------------------------

/// Persisted cycle parameters plus the dates derived from them.
///
/// Recreated wholesale every time the last period date is updated; the
/// derived dates are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleData {
  pub last_period_date: NaiveDate,
  pub cycle_length: u32,
  pub period_length: u32,
  pub next_period_date: NaiveDate,
  pub ovulation_date: NaiveDate,
  pub fertile_window_start: NaiveDate,
  pub fertile_window_end: NaiveDate,
}

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;

impl CycleData {
  /// Derive the full record from the raw inputs.
  ///
  /// next period = last + cycle_length, ovulation = next period - 14d,
  /// fertile window = [ovulation - 5d, ovulation + 1d]. Exact calendar-day
  /// arithmetic, no time-of-day component.
  pub fn derive(last_period_date: NaiveDate, cycle_length: u32, period_length: u32) -> Self {
    let next_period_date = last_period_date + chrono::Duration::days(cycle_length as i64);
    let ovulation_date = next_period_date - chrono::Duration::days(14);
    Self {
      last_period_date,
      cycle_length,
      period_length,
      next_period_date,
      ovulation_date,
      fertile_window_start: ovulation_date - chrono::Duration::days(5),
      fertile_window_end: ovulation_date + chrono::Duration::days(1),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn derive_with_default_lengths() {
    let data = CycleData::derive(d(2025, 3, 1), 28, 5);

    assert_eq!(data.next_period_date, d(2025, 3, 29)); // D + 28
    assert_eq!(data.ovulation_date, d(2025, 3, 15)); // D + 14
    assert_eq!(data.fertile_window_start, d(2025, 3, 10)); // D + 9
    assert_eq!(data.fertile_window_end, d(2025, 3, 16)); // D + 15
  }

  #[test]
  fn derive_crosses_month_boundary() {
    let data = CycleData::derive(d(2025, 1, 20), 30, 5);

    assert_eq!(data.next_period_date, d(2025, 2, 19));
    assert_eq!(data.ovulation_date, d(2025, 2, 5));
  }
}
