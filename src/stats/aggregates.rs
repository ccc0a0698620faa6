//! Aggregate Statistics
//!
//! Per-day descriptive statistics for one tracker, the dashboard summary,
//! and calendar-month buckets. All day bucketing compares `date_str` keys
//! (inclusive ranges), never raw timestamps.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::{Entry, Tracker};

use super::streaks::{self, parse_date, DEFAULT_DATE_LIMIT};

/// Relative difference below which the trend reads as stable
pub const TREND_DEAD_ZONE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Descriptive statistics for one tracker over a trailing window
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerStats {
    pub total_entries: usize,
    pub average_per_day: f64,
    pub std_deviation: f64,
    pub trend: Trend,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Sum of day values per distinct day
pub fn daily_totals(entries: &[Entry]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for e in entries {
        if let Some(date) = parse_date(&e.date_str) {
            *totals.entry(date).or_insert(0.0) += e.day_value();
        }
    }
    totals
}

/// Stats over the `range_days` ending at `today` (inclusive). Days without
/// entries count as zero in the per-day series.
pub fn tracker_stats(entries: &[Entry], today: NaiveDate, range_days: u32) -> TrackerStats {
    let range_days = range_days.max(1);
    let start = today
        .checked_sub_days(Days::new(u64::from(range_days - 1)))
        .unwrap_or(today);
    let start_key = start.format("%Y-%m-%d").to_string();
    let end_key = today.format("%Y-%m-%d").to_string();

    let in_range: Vec<Entry> = entries
        .iter()
        .filter(|e| e.date_str >= start_key && e.date_str <= end_key)
        .cloned()
        .collect();
    let totals = daily_totals(&in_range);

    let mut series = Vec::with_capacity(range_days as usize);
    let mut day = start;
    loop {
        series.push(totals.get(&day).copied().unwrap_or(0.0));
        if day >= today {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let average_per_day = mean(&series);
    let std_deviation = std_dev(&series, average_per_day);

    let dates = streaks::distinct_dates_desc(entries, DEFAULT_DATE_LIMIT);
    TrackerStats {
        total_entries: in_range.len(),
        average_per_day,
        std_deviation,
        trend: trend(&series),
        current_streak: streaks::current_streak(&dates, today),
        best_streak: streaks::best_streak(&dates),
    }
}

/// Compare the recent half-window mean to the prior half-window mean, with
/// a dead-zone so noise does not flip-flop the direction
pub fn trend(series: &[f64]) -> Trend {
    if series.len() < 2 {
        return Trend::Stable;
    }
    let mid = series.len() / 2;
    let prior = mean(&series[..mid]);
    let recent = mean(&series[mid..]);
    if prior == 0.0 {
        return if recent > 0.0 { Trend::Up } else { Trend::Stable };
    }
    let delta = (recent - prior) / prior.abs();
    if delta > TREND_DEAD_ZONE {
        Trend::Up
    } else if delta < -TREND_DEAD_ZONE {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Trailing-window mean for each point of a per-day series; the window is
/// clipped at the start of the series
pub fn rolling_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    series
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let from = (i + 1).saturating_sub(window);
            mean(&series[from..=i])
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Headline numbers for the dashboard page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Non-archived tracker count
    pub active_trackers: usize,
    /// Entries within the current calendar month
    pub entries_this_month: usize,
}

pub fn dashboard_summary(
    trackers: &[Tracker],
    entries: &[Entry],
    today: NaiveDate,
) -> DashboardSummary {
    let entries_this_month = match month_bounds(today.year(), today.month()) {
        Some((start, end)) => entries
            .iter()
            .filter(|e| e.date_str >= start && e.date_str <= end)
            .count(),
        None => 0,
    };
    DashboardSummary {
        active_trackers: trackers.iter().filter(|t| !t.archived).count(),
        entries_this_month,
    }
}

/// Entries of one month bucketed by day, plus the distinct day-of-month
/// integers that have at least one entry
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub by_date: BTreeMap<String, Vec<Entry>>,
    pub active_days: Vec<u32>,
}

pub fn calendar_month(entries: &[Entry], year: i32, month: u32) -> CalendarMonth {
    let Some((start, end)) = month_bounds(year, month) else {
        return CalendarMonth {
            by_date: BTreeMap::new(),
            active_days: Vec::new(),
        };
    };

    let mut by_date: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for e in entries {
        if e.date_str >= start && e.date_str <= end {
            by_date.entry(e.date_str.clone()).or_default().push(e.clone());
        }
    }

    let mut active_days: Vec<u32> = by_date
        .keys()
        .filter_map(|key| parse_date(key).map(|d| d.day()))
        .collect();
    active_days.sort_unstable();
    active_days.dedup();

    CalendarMonth {
        by_date,
        active_days,
    }
}

/// Inclusive `date_str` bounds of a calendar month
fn month_bounds(year: i32, month: u32) -> Option<(String, String)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let end = next_month.pred_opt()?;
    Some((
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    ))
}
