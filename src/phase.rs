//! Pure cycle-day and phase math
//!
//! No I/O and no ambient clock: callers pass the reference date explicitly.

use chrono::NaiveDate;

use crate::models::Phase;

/// ---------------------------------------------------------------------------
/// Cycle Day
/// ---------------------------------------------------------------------------

/// Zero-indexed day within the current cycle, always in
/// `[0, cycle_length - 1]`. The double modulo keeps the result non-negative
/// even when `today` precedes `last_period` (e.g. a future-dated period
/// start entered by mistake).
pub fn cycle_day(last_period: NaiveDate, today: NaiveDate, cycle_length: u32) -> u32 {
  let len = cycle_length.max(1) as i64;
  let days_since = (today - last_period).num_days();
  (((days_since % len) + len) % len) as u32
}

/// ---------------------------------------------------------------------------
/// Phase Boundaries
/// ---------------------------------------------------------------------------

/// Phase for a zero-indexed cycle day.
///
/// Boundaries are fixed over a 28-day cycle (days 1-7 menstrual, 8-14
/// follicular, 15-21 ovulation, 22-28 luteal) regardless of the configured
/// cycle length. Other calculations in this engine do take a variable cycle
/// length, so a 35-day cycle spends its tail pinned in the luteal phase;
/// that inconsistency is a known product simplification and is kept as-is.
pub fn phase_for_day(day_zero_indexed: u32) -> Phase {
  match day_zero_indexed {
    0..=6 => Phase::Menstrual,
    7..=13 => Phase::Follicular,
    14..=20 => Phase::Ovulation,
    _ => Phase::Luteal,
  }
}

/// Cycle day and phase for a date, as one call.
pub fn day_and_phase(last_period: NaiveDate, today: NaiveDate, cycle_length: u32) -> (u32, Phase) {
  let day = cycle_day(last_period, today, cycle_length);
  (day, phase_for_day(day))
}

/// ---------------------------------------------------------------------------
/// Phase Theme Metadata
/// ---------------------------------------------------------------------------

/// Presentation metadata for a phase, consumed by screens to style
/// themselves around the current cycle day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PhaseTheme {
  pub phase: Phase,
  pub name: &'static str,
  pub accent_color: &'static str,
  pub blurb: &'static str,
}

pub fn theme_for(phase: Phase) -> PhaseTheme {
  match phase {
    Phase::Menstrual => PhaseTheme {
      phase,
      name: "Menstrual",
      accent_color: "#C94F6D",
      blurb: "Rest and restore. Energy is naturally lower this week.",
    },
    Phase::Follicular => PhaseTheme {
      phase,
      name: "Follicular",
      accent_color: "#E8A87C",
      blurb: "Rising energy. A good window for starting new things.",
    },
    Phase::Ovulation => PhaseTheme {
      phase,
      name: "Ovulation",
      accent_color: "#F2C94C",
      blurb: "Peak energy and the most fertile days of the cycle.",
    },
    Phase::Luteal => PhaseTheme {
      phase,
      name: "Luteal",
      accent_color: "#9B7EBD",
      blurb: "Winding down. Premenstrual symptoms may start to appear.",
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn cycle_day_stays_in_range() {
    let last = d(2025, 1, 1);
    for offset in 0..120 {
      let today = last + chrono::Duration::days(offset);
      let day = cycle_day(last, today, 28);
      assert!(day < 28, "day {} out of range for offset {}", day, offset);
    }
  }

  #[test]
  fn cycle_day_wraps_at_cycle_length() {
    let last = d(2025, 1, 1);
    assert_eq!(cycle_day(last, d(2025, 1, 1), 28), 0);
    assert_eq!(cycle_day(last, d(2025, 1, 28), 28), 27);
    assert_eq!(cycle_day(last, d(2025, 1, 29), 28), 0);
  }

  #[test]
  fn cycle_day_is_non_negative_when_today_precedes_last_period() {
    let last = d(2025, 6, 15);
    let day = cycle_day(last, d(2025, 6, 10), 28);
    assert_eq!(day, 23); // -5 mod 28
  }

  #[test]
  fn phases_partition_a_full_cycle_without_gaps() {
    // One-indexed days 1-28 map onto the four phases, 7 days each.
    let mut counts = std::collections::HashMap::new();
    for day_one_indexed in 1u32..=28 {
      let phase = phase_for_day(day_one_indexed - 1);
      *counts.entry(phase).or_insert(0u32) += 1;
    }

    assert_eq!(counts.get(&Phase::Menstrual), Some(&7));
    assert_eq!(counts.get(&Phase::Follicular), Some(&7));
    assert_eq!(counts.get(&Phase::Ovulation), Some(&7));
    assert_eq!(counts.get(&Phase::Luteal), Some(&7));
  }

  #[test]
  fn phase_boundaries_do_not_scale_with_cycle_length() {
    // Day 30 of a 35-day cycle is still classified by the fixed 28-day table.
    let last = d(2025, 1, 1);
    let (day, phase) = day_and_phase(last, d(2025, 1, 31), 35);
    assert_eq!(day, 30);
    assert_eq!(phase, Phase::Luteal);
  }

  #[test]
  fn every_phase_has_theme_metadata() {
    for phase in Phase::ALL {
      let theme = theme_for(phase);
      assert_eq!(theme.phase, phase);
      assert!(theme.accent_color.starts_with('#'));
      assert!(!theme.blurb.is_empty());
    }
  }
}
