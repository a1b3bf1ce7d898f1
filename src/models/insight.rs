use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Insight
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
  Pattern,
  Prediction,
  Recommendation,
  Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
  Info,
  Warning,
  Positive,
}

impl InsightSeverity {
  /// Sort rank for the final ordering: warnings first, then info, then
  /// positive notes.
  pub fn rank(&self) -> u8 {
    match self {
      InsightSeverity::Warning => 3,
      InsightSeverity::Info => 2,
      InsightSeverity::Positive => 1,
    }
  }
}

/// A ranked, human-readable advisory message. Ephemeral value object;
/// regenerated on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
  pub id: String,
  pub kind: InsightKind,
  pub title: String,
  pub description: String,
  pub severity: InsightSeverity,
  /// Heuristic 0-100 score, not a statistical p-value.
  pub confidence: u32,
  pub actionable: bool,
  pub action_text: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn severity_ranks_order_warning_over_info_over_positive() {
    assert!(InsightSeverity::Warning.rank() > InsightSeverity::Info.rank());
    assert!(InsightSeverity::Info.rank() > InsightSeverity::Positive.rank());
  }
}
