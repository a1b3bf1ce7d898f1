//! Ranked advisory insights
//!
//! An ordered list of independent rules over the stored entries; each rule
//! appends zero or one insight (correlation rules may append several).
//! All rules are pure reads. The advisory path is best-effort: a store
//! failure degrades to an empty list instead of propagating.

use chrono::NaiveDate;

use crate::models::{CycleData, DailySymptomEntry, Insight, InsightKind, InsightSeverity, Phase};
use crate::patterns;
use crate::phase;
use crate::store::SymptomStore;

/// Entry counts below which the later rules stay quiet.
const MIN_ENTRIES_FOR_INSIGHTS: usize = 7;
const MIN_ENTRIES_FOR_PHASE_TRENDS: usize = 14;
const MIN_ENTRIES_FOR_CORRELATIONS: usize = 21;

/// ---------------------------------------------------------------------------
/// Generator
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InsightGenerator {
  store: SymptomStore,
}

impl InsightGenerator {
  pub fn new(store: SymptomStore) -> Self {
    Self { store }
  }

  /// Generate the ranked insight list for `today`. Never fails: advisory
  /// reads degrade to an empty result when the store is unavailable.
  pub async fn generate(&self, today: NaiveDate) -> Vec<Insight> {
    let cycle = match self.store.cycle_data().await {
      Ok(cycle) => cycle,
      Err(e) => {
        tracing::warn!(error = %e, "insight generation degraded: cycle data unavailable");
        return Vec::new();
      }
    };

    // Without a period start date nothing else can run.
    let cycle = match cycle {
      Some(cycle) => cycle,
      None => return vec![no_data_insight()],
    };

    let entries = match self.store.get_all().await {
      Ok(entries) => entries,
      Err(e) => {
        tracing::warn!(error = %e, "insight generation degraded: entries unavailable");
        return Vec::new();
      }
    };

    generate_from(&entries, &cycle, today)
  }
}

/// ---------------------------------------------------------------------------
/// Rules
/// ---------------------------------------------------------------------------

fn no_data_insight() -> Insight {
  Insight {
    id: "no-data".to_string(),
    kind: InsightKind::Recommendation,
    title: "Set up cycle tracking".to_string(),
    description: "Add the start date of your last period to unlock phase tracking, \
                  predictions, and personalized insights."
      .to_string(),
    severity: InsightSeverity::Info,
    confidence: 100,
    actionable: true,
    action_text: Some("Log your last period date".to_string()),
  }
}

/// Pure rule evaluation over an entry set. Exposed for deterministic tests.
pub fn generate_from(
  entries: &[DailySymptomEntry],
  cycle: &CycleData,
  today: NaiveDate,
) -> Vec<Insight> {
  let mut insights = Vec::new();

  // Rule: small history
  if entries.len() < MIN_ENTRIES_FOR_INSIGHTS {
    insights.push(Insight {
      id: "need-more-data".to_string(),
      kind: InsightKind::Recommendation,
      title: "Keep logging".to_string(),
      description: format!(
        "You have logged {} day(s) so far. Insights get sharper after a week of daily entries.",
        entries.len()
      ),
      severity: InsightSeverity::Info,
      confidence: 90,
      actionable: false,
      action_text: None,
    });
  }

  // Rule: strong symptom patterns
  for pattern in patterns::analyze(entries) {
    if pattern.frequency > 50 && pattern.average_severity > 5.0 {
      let severity = if pattern.average_severity > 7.0 {
        InsightSeverity::Warning
      } else {
        InsightSeverity::Info
      };
      insights.push(Insight {
        id: format!("pattern-{}-{}", pattern.symptom, pattern.phase),
        kind: InsightKind::Pattern,
        title: format!(
          "{} is common in your {} phase",
          humanize(&pattern.symptom),
          pattern.phase.display_name().to_lowercase()
        ),
        description: format!(
          "Logged on {}% of your {} days, at an average severity of {:.1}.",
          pattern.frequency,
          pattern.phase.display_name().to_lowercase(),
          pattern.average_severity
        ),
        severity,
        confidence: pattern.frequency.min(100),
        actionable: false,
        action_text: None,
      });
    }
  }

  // Rule: period prediction
  let current_day = phase::cycle_day(cycle.last_period_date, today, cycle.cycle_length);
  let days_until_period = cycle.cycle_length - current_day;
  if days_until_period <= 7 {
    let window_start = cycle.cycle_length.saturating_sub(4);
    let has_premenstrual_history = entries.iter().any(|e| {
      e.cycle_day >= window_start
        && e.cycle_day <= cycle.cycle_length
        && (e.severity("cramps") > 3
          || e.severity("bloating") > 3
          || e.severity("mood_swings") > 3
          || e.severity("fatigue") > 5)
    });

    if days_until_period <= 3 && has_premenstrual_history {
      insights.push(Insight {
        id: "period-prediction".to_string(),
        kind: InsightKind::Prediction,
        title: format!("Period expected in about {} day(s)", days_until_period),
        description: "Based on your cycle dates and past premenstrual symptoms, your period \
                      is likely to start soon. Symptoms like cramps or bloating may pick up."
          .to_string(),
        severity: InsightSeverity::Info,
        confidence: 85,
        actionable: true,
        action_text: Some("Plan a lighter schedule for the next few days".to_string()),
      });
    }
  }

  // Rule: energy by phase
  if entries.len() >= MIN_ENTRIES_FOR_PHASE_TRENDS {
    let means = phase_means(entries, |e| Some(e.energy_level as f64));
    if let (Some(&(high_phase, high)), Some(&(low_phase, low))) = (
      means.iter().max_by(|a, b| a.1.total_cmp(&b.1)),
      means.iter().min_by(|a, b| a.1.total_cmp(&b.1)),
    ) {
      if high - low > 2.0 {
        insights.push(Insight {
          id: "energy-pattern".to_string(),
          kind: InsightKind::Trend,
          title: "Your energy follows your cycle".to_string(),
          description: format!(
            "Energy peaks in your {} phase (around {}/10) and dips in your {} phase (around {}/10). \
             Scheduling demanding days around the peak can help.",
            high_phase.display_name().to_lowercase(),
            high.round() as i64,
            low_phase.display_name().to_lowercase(),
            low.round() as i64
          ),
          severity: InsightSeverity::Positive,
          confidence: 75,
          actionable: false,
          action_text: None,
        });
      }
    }
  }

  // Rule: sleep by phase
  if entries.len() >= MIN_ENTRIES_FOR_PHASE_TRENDS {
    let means = phase_means(entries, |e| Some(e.sleep_quality as f64));
    if let Some(&(low_phase, low)) = means.iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
      if low < 6.0 {
        insights.push(Insight {
          id: "sleep-pattern".to_string(),
          kind: InsightKind::Trend,
          title: format!(
            "Sleep dips in your {} phase",
            low_phase.display_name().to_lowercase()
          ),
          description: format!(
            "Your sleep quality averages {:.1}/10 during the {} phase. A consistent wind-down \
             routine in that week may help.",
            low,
            low_phase.display_name().to_lowercase()
          ),
          severity: InsightSeverity::Warning,
          confidence: 70,
          actionable: true,
          action_text: Some("Try an earlier wind-down during that week".to_string()),
        });
      }
    }
  }

  // Rule: mood by phase
  let mood_entries = entries.iter().filter(|e| e.mood.is_some()).count();
  if mood_entries >= MIN_ENTRIES_FOR_PHASE_TRENDS {
    let means = phase_means(entries, |e| e.mood.map(|m| m.score() as f64));
    if let Some(&(low_phase, low)) = means.iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
      if low < 1.8 {
        insights.push(Insight {
          id: "mood-pattern".to_string(),
          kind: InsightKind::Pattern,
          title: format!(
            "Mood tends to drop in your {} phase",
            low_phase.display_name().to_lowercase()
          ),
          description: format!(
            "Your logged moods run low during the {} phase. Knowing the timing can make the \
             dip easier to plan around.",
            low_phase.display_name().to_lowercase()
          ),
          severity: InsightSeverity::Warning,
          confidence: 70,
          actionable: true,
          action_text: Some("Plan downtime for that week".to_string()),
        });
      }
    }
  }

  // Rule: correlations
  if entries.len() >= MIN_ENTRIES_FOR_CORRELATIONS {
    // Fatigue vs. sleep, with the exact percentage in the text.
    let high_fatigue: Vec<&DailySymptomEntry> =
      entries.iter().filter(|e| e.severity("fatigue") > 5).collect();
    if !high_fatigue.is_empty() {
      let poor_sleep = high_fatigue.iter().filter(|e| e.sleep_quality < 5).count();
      let pct = (poor_sleep as f64 / high_fatigue.len() as f64) * 100.0;
      if pct > 60.0 {
        insights.push(Insight {
          id: "correlation-fatigue-sleep".to_string(),
          kind: InsightKind::Pattern,
          title: "Fatigue tracks your sleep".to_string(),
          description: format!(
            "{:.0}% of your high-fatigue days came with poor sleep quality.",
            pct
          ),
          severity: InsightSeverity::Info,
          confidence: 65,
          actionable: false,
          action_text: None,
        });
      }
    }

    // Mood swings vs. anxiety. No percentage in the text here; the
    // asymmetry with the rule above is deliberate.
    let mood_swing_days: Vec<&DailySymptomEntry> = entries
      .iter()
      .filter(|e| e.severity("mood_swings") > 5)
      .collect();
    if !mood_swing_days.is_empty() {
      let anxious = mood_swing_days
        .iter()
        .filter(|e| e.severity("anxiety") > 5)
        .count();
      if (anxious as f64 / mood_swing_days.len() as f64) * 100.0 > 50.0 {
        insights.push(Insight {
          id: "correlation-mood-anxiety".to_string(),
          kind: InsightKind::Pattern,
          title: "Mood swings and anxiety arrive together".to_string(),
          description: "Days with strong mood swings usually also carry elevated anxiety. \
                        Treating them as one signal may make both easier to manage."
            .to_string(),
          severity: InsightSeverity::Info,
          confidence: 60,
          actionable: false,
          action_text: None,
        });
      }
    }
  }

  // Final ordering: severity rank desc, then confidence desc. Stable, so
  // rule order breaks remaining ties.
  insights.sort_by(|a, b| {
    b.severity
      .rank()
      .cmp(&a.severity.rank())
      .then(b.confidence.cmp(&a.confidence))
  });

  insights
}

/// Per-phase mean of a sampled value, in fixed phase order; phases with no
/// samples are omitted.
fn phase_means<F>(entries: &[DailySymptomEntry], sample: F) -> Vec<(Phase, f64)>
where
  F: Fn(&DailySymptomEntry) -> Option<f64>,
{
  let mut means = Vec::new();
  for phase in Phase::ALL {
    let values: Vec<f64> = entries
      .iter()
      .filter(|e| e.phase == phase)
      .filter_map(&sample)
      .collect();
    if !values.is_empty() {
      means.push((phase, values.iter().sum::<f64>() / values.len() as f64));
    }
  }
  means
}

fn humanize(symptom: &str) -> String {
  let spaced = symptom.replace('_', " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => spaced,
  }
}
