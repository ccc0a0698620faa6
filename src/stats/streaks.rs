//! Streak Computation
//!
//! Consecutive-day streaks over the distinct entry days of a tracker.

use chrono::NaiveDate;

use crate::domain::Entry;

/// Cap on distinct days considered, bounding streak computation
pub const DEFAULT_DATE_LIMIT: usize = 365;

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Distinct entry days, newest first, capped at `limit`.
/// Unparseable day keys are skipped.
pub fn distinct_dates_desc(entries: &[Entry], limit: usize) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = entries
        .iter()
        .filter_map(|e| parse_date(&e.date_str))
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates.truncate(limit);
    dates
}

/// Consecutive days ending today, walking backward through `dates_desc`
/// (distinct, descending). The walk halts at the first day that is not the
/// expected one. No grace day: an absent today means 0.
pub fn current_streak(dates_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut expected = today;
    for &date in dates_desc {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive days anywhere in the set
pub fn best_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for date in sorted {
        run = match prev {
            Some(p) if p.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn dates(strs: &[&str]) -> Vec<NaiveDate> {
        strs.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn test_current_streak_counts_back_from_today() {
        let d = dates(&["2024-01-03", "2024-01-02", "2024-01-01"]);
        assert_eq!(current_streak(&d, date("2024-01-03")), 3);
    }

    #[test]
    fn test_current_streak_zero_when_today_absent() {
        let d = dates(&["2024-01-03", "2024-01-02", "2024-01-01"]);
        // a 2-day gap before today: no grace period
        assert_eq!(current_streak(&d, date("2024-01-05")), 0);
    }

    #[test]
    fn test_current_streak_stops_at_gap() {
        let d = dates(&["2024-01-05", "2024-01-04", "2024-01-01"]);
        assert_eq!(current_streak(&d, date("2024-01-05")), 2);
    }

    #[test]
    fn test_best_streak_longest_run_wins() {
        let d = dates(&[
            "2024-01-01",
            "2024-01-02",
            "2024-01-04",
            "2024-01-05",
            "2024-01-06",
        ]);
        assert_eq!(best_streak(&d), 3);
    }

    #[test]
    fn test_best_streak_empty_and_single() {
        assert_eq!(best_streak(&[]), 0);
        assert_eq!(best_streak(&dates(&["2024-03-01"])), 1);
    }

    #[test]
    fn test_distinct_dates_desc_dedupes_and_caps() {
        let entries = vec![
            Entry {
                id: 1,
                tracker_id: 1,
                value: None,
                note: None,
                metadata: None,
                timestamp: 0,
                date_str: "2024-01-02".to_string(),
            },
            Entry {
                id: 2,
                tracker_id: 1,
                value: None,
                note: None,
                metadata: None,
                timestamp: 0,
                date_str: "2024-01-02".to_string(),
            },
            Entry {
                id: 3,
                tracker_id: 1,
                value: None,
                note: None,
                metadata: None,
                timestamp: 0,
                date_str: "2024-01-01".to_string(),
            },
            Entry {
                id: 4,
                tracker_id: 1,
                value: None,
                note: None,
                metadata: None,
                timestamp: 0,
                date_str: "not-a-date".to_string(),
            },
        ];
        let all = distinct_dates_desc(&entries, DEFAULT_DATE_LIMIT);
        assert_eq!(all, dates(&["2024-01-02", "2024-01-01"]));
        let capped = distinct_dates_desc(&entries, 1);
        assert_eq!(capped, dates(&["2024-01-02"]));
    }
}
