//! Streak & Aggregate Engine
//!
//! Pure computations over entry snapshots; callers fetch data and inject
//! "today" so everything here stays clock-free and unit-testable.

mod aggregates;
mod streaks;

pub use aggregates::{
    calendar_month, daily_totals, dashboard_summary, rolling_average, tracker_stats, trend,
    CalendarMonth, DashboardSummary, TrackerStats, Trend, TREND_DEAD_ZONE,
};
pub use streaks::{best_streak, current_streak, distinct_dates_desc, DEFAULT_DATE_LIMIT};
