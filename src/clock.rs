//! Injectable clock
//!
//! All date math in the engine flows through an explicit `now` so phase and
//! scheduling calculations are deterministic under test. The facade holds a
//! `Clock` and passes its reading down; the computation modules never call
//! `Utc::now()` themselves.

use chrono::{DateTime, NaiveDate, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// Calendar date of the current instant.
  fn today(&self) -> NaiveDate {
    self.now().date_naive()
  }
}

/// Wall-clock time. The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// A clock pinned to a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn fixed_clock_reports_its_instant() {
    let instant = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let clock = FixedClock(instant);
    assert_eq!(clock.now(), instant);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
  }
}
