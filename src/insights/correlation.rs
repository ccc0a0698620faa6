//! Correlation Engine
//!
//! Two-cohort mean-difference heuristic between a source and a target
//! tracker: days where the source habit occurred versus days it did not,
//! compared through the target's day aggregate at a configurable offset.
//! This is a product heuristic, not a validated statistical test.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Entry;
use crate::stats::daily_totals;

/// Tunable thresholds with documented defaults. These are product
/// decisions, not derived statistically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Absolute impact percentage above which a correlation is called out
    pub impact_threshold: i32,
    /// Minimum combined cohort samples before results are trusted
    pub min_samples: usize,
    /// Combined samples for the medium tier
    pub medium_samples: usize,
    /// Combined samples for the high tier
    pub high_samples: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            impact_threshold: 10,
            min_samples: 14,
            medium_samples: 21,
            high_samples: 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PositiveSynergy,
    DestructiveInterference,
    NeutralCorrelation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub source_tracker_id: u32,
    pub target_tracker_id: u32,
    pub offset_days: i64,
    /// `None` when the baseline average is zero or a cohort is empty,
    /// never `NaN`
    pub impact_percent: Option<i32>,
    pub insight: InsightKind,
    pub baseline_avg: f64,
    pub impacted_avg: f64,
    /// Cohort sizes count the days that contributed a target sample
    pub triggered_days: usize,
    pub baseline_days: usize,
    pub confidence: ConfidenceTier,
    pub data_quality: ConfidenceTier,
    pub has_sufficient_data: bool,
    pub recommended_actions: Vec<String>,
}

/// Partition the source tracker's observed day range into triggered days
/// (source day value > 0) and baseline days, then compare the target's day
/// aggregate at `day + offset_days` across the two cohorts. Days without a
/// target sample on the offset date are excluded, not treated as zero.
pub fn calculate_impact(
    source_tracker_id: u32,
    target_tracker_id: u32,
    source_entries: &[Entry],
    target_entries: &[Entry],
    offset_days: i64,
    config: &CorrelationConfig,
) -> CorrelationResult {
    let source_totals = daily_totals(source_entries);
    let target_totals = daily_totals(target_entries);

    let mut triggered = Vec::new();
    let mut baseline = Vec::new();

    if let (Some(first), Some(last)) = (
        source_totals.keys().next().copied(),
        source_totals.keys().next_back().copied(),
    ) {
        let mut day = first;
        loop {
            if let Some(sample) = target_sample(&target_totals, day, offset_days) {
                if source_totals.get(&day).copied().unwrap_or(0.0) > 0.0 {
                    triggered.push(sample);
                } else {
                    baseline.push(sample);
                }
            }
            if day >= last {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    let triggered_days = triggered.len();
    let baseline_days = baseline.len();
    let baseline_avg = mean(&baseline);
    let impacted_avg = mean(&triggered);

    let impact_percent = if triggered.is_empty() || baseline.is_empty() || baseline_avg == 0.0 {
        None
    } else {
        Some((((impacted_avg - baseline_avg) / baseline_avg) * 100.0).round() as i32)
    };

    let insight = match impact_percent {
        Some(i) if i > config.impact_threshold => InsightKind::PositiveSynergy,
        Some(i) if i < -config.impact_threshold => InsightKind::DestructiveInterference,
        _ => InsightKind::NeutralCorrelation,
    };

    let combined = triggered_days + baseline_days;
    let has_sufficient_data = combined >= config.min_samples;
    let recommended_actions = recommendations(insight, has_sufficient_data, impact_percent);

    CorrelationResult {
        source_tracker_id,
        target_tracker_id,
        offset_days,
        impact_percent,
        insight,
        baseline_avg,
        impacted_avg,
        triggered_days,
        baseline_days,
        confidence: tier(combined, config),
        data_quality: tier(source_entries.len() + target_entries.len(), config),
        has_sufficient_data,
        recommended_actions,
    }
}

fn target_sample(
    target_totals: &std::collections::BTreeMap<NaiveDate, f64>,
    day: NaiveDate,
    offset_days: i64,
) -> Option<f64> {
    let offset_day = day.checked_add_signed(Duration::days(offset_days))?;
    target_totals.get(&offset_day).copied()
}

fn tier(samples: usize, config: &CorrelationConfig) -> ConfidenceTier {
    if samples >= config.high_samples {
        ConfidenceTier::High
    } else if samples >= config.medium_samples {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

fn recommendations(
    insight: InsightKind,
    has_sufficient_data: bool,
    impact_percent: Option<i32>,
) -> Vec<String> {
    if !has_sufficient_data {
        return vec![
            "Keep tracking both habits; more days of data will sharpen this result.".to_string(),
        ];
    }
    match (insight, impact_percent) {
        (InsightKind::PositiveSynergy, Some(i)) => vec![format!(
            "These habits reinforce each other ({:+}%); consider pairing them.",
            i
        )],
        (InsightKind::DestructiveInterference, Some(i)) => vec![format!(
            "These habits appear to interfere ({:+}%); consider separating them.",
            i
        )],
        _ => Vec::new(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, tracker_id: u32, date: &str, value: f64) -> Entry {
        Entry {
            id,
            tracker_id,
            value: Some(value),
            note: None,
            metadata: None,
            timestamp: 0,
            date_str: date.to_string(),
        }
    }

    fn config() -> CorrelationConfig {
        CorrelationConfig::default()
    }

    #[test]
    fn test_positive_synergy_same_day() {
        // source on Jan 1-2, absent Jan 3-4; target doubles on source days
        let mut source = vec![
            entry(1, 1, "2024-01-01", 1.0),
            entry(2, 1, "2024-01-02", 1.0),
        ];
        // a zero-value entry widens the observed range so Jan 3-4 become
        // baseline days
        source.push(entry(7, 1, "2024-01-04", 0.0));
        let target = vec![
            entry(3, 2, "2024-01-01", 4.0),
            entry(4, 2, "2024-01-02", 4.0),
            entry(5, 2, "2024-01-03", 2.0),
            entry(6, 2, "2024-01-04", 2.0),
        ];

        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(result.triggered_days, 2);
        assert_eq!(result.baseline_days, 2);
        assert!((result.impacted_avg - 4.0).abs() < 1e-9);
        assert!((result.baseline_avg - 2.0).abs() < 1e-9);
        assert_eq!(result.impact_percent, Some(100));
        assert_eq!(result.insight, InsightKind::PositiveSynergy);
    }

    #[test]
    fn test_zero_baseline_is_unavailable_not_nan() {
        let source = vec![
            entry(1, 1, "2024-01-01", 1.0),
            entry(2, 1, "2024-01-03", 0.0),
        ];
        let target = vec![
            entry(3, 2, "2024-01-01", 5.0),
            entry(4, 2, "2024-01-02", 0.0),
            entry(5, 2, "2024-01-03", 0.0),
        ];
        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(result.baseline_avg, 0.0);
        assert!((result.impacted_avg - 5.0).abs() < 1e-9);
        assert_eq!(result.impact_percent, None);
        assert_eq!(result.insight, InsightKind::NeutralCorrelation);
    }

    #[test]
    fn test_offset_shifts_target_lookup() {
        // evening habit, next-morning effect
        let source = vec![
            entry(1, 1, "2024-01-01", 1.0),
            entry(2, 1, "2024-01-02", 0.0),
        ];
        let target = vec![
            entry(3, 2, "2024-01-02", 8.0),
            entry(4, 2, "2024-01-03", 4.0),
        ];
        let next_day = calculate_impact(1, 2, &source, &target, 1, &config());
        assert_eq!(next_day.triggered_days, 1);
        assert_eq!(next_day.baseline_days, 1);
        assert!((next_day.impacted_avg - 8.0).abs() < 1e-9);
        assert!((next_day.baseline_avg - 4.0).abs() < 1e-9);
        assert_eq!(next_day.impact_percent, Some(100));

        // with no offset the target has no sample on Jan 1
        let same_day = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(same_day.triggered_days, 0);
    }

    #[test]
    fn test_days_without_target_sample_are_excluded() {
        let source = vec![
            entry(1, 1, "2024-01-01", 1.0),
            entry(2, 1, "2024-01-05", 1.0),
        ];
        // target only on Jan 1; Jan 2-5 contribute no samples at all
        let target = vec![entry(3, 2, "2024-01-01", 3.0)];
        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(result.triggered_days, 1);
        assert_eq!(result.baseline_days, 0);
        assert_eq!(result.impact_percent, None);
    }

    #[test]
    fn test_neutral_within_threshold() {
        let source = vec![
            entry(1, 1, "2024-01-01", 1.0),
            entry(2, 1, "2024-01-02", 0.0),
        ];
        let target = vec![
            entry(3, 2, "2024-01-01", 10.5),
            entry(4, 2, "2024-01-02", 10.0),
        ];
        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(result.impact_percent, Some(5));
        assert_eq!(result.insight, InsightKind::NeutralCorrelation);
    }

    #[test]
    fn test_insufficient_data_gate() {
        let source = vec![entry(1, 1, "2024-01-01", 1.0)];
        let target = vec![entry(2, 2, "2024-01-01", 2.0)];
        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert!(!result.has_sufficient_data);
        assert_eq!(result.confidence, ConfidenceTier::Low);
        assert!(!result.recommended_actions.is_empty());
    }

    #[test]
    fn test_confidence_tiers_from_sample_count() {
        let mut source = Vec::new();
        let mut target = Vec::new();
        // 50 alternating days, target sampled every day
        for i in 0..50u32 {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_signed(Duration::days(i as i64))
                .unwrap()
                .format("%Y-%m-%d")
                .to_string();
            source.push(entry(i, 1, &date, if i % 2 == 0 { 1.0 } else { 0.0 }));
            target.push(entry(100 + i, 2, &date, 1.0 + (i % 2) as f64));
        }
        let result = calculate_impact(1, 2, &source, &target, 0, &config());
        assert_eq!(result.triggered_days + result.baseline_days, 50);
        assert_eq!(result.confidence, ConfidenceTier::High);
        assert!(result.has_sufficient_data);
    }

    #[test]
    fn test_empty_source_is_harmless() {
        let result = calculate_impact(1, 2, &[], &[], 0, &config());
        assert_eq!(result.triggered_days, 0);
        assert_eq!(result.baseline_days, 0);
        assert_eq!(result.impact_percent, None);
        assert!(!result.has_sufficient_data);
    }
}
