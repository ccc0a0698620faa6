//! Correlation Engine
//!
//! Lagged-correlation "impact" scores between two trackers, plus the
//! supersession machinery that keeps late async results from overwriting
//! fresh ones.

mod correlation;
mod session;

pub use correlation::{
    calculate_impact, ConfidenceTier, CorrelationConfig, CorrelationResult, InsightKind,
};
pub use session::{ImpactSession, RequestToken};
