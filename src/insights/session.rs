//! Impact Calculation Sessions
//!
//! Cancellation-by-supersession for async correlation requests. Each UI
//! surface owns one session; beginning a request invalidates every earlier
//! token. There is no interruption of in-flight work; a stale token's
//! result is silently dropped so it can never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter for one UI surface. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ImpactSession {
    generation: Arc<AtomicU64>,
}

impl ImpactSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones
    pub fn begin(&self) -> RequestToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            generation,
            session: Arc::clone(&self.generation),
        }
    }
}

/// Handle identifying one calculation request
#[derive(Debug)]
pub struct RequestToken {
    generation: u64,
    session: Arc<AtomicU64>,
}

impl RequestToken {
    /// False once a newer request has begun on the same session
    pub fn is_current(&self) -> bool {
        self.session.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_supersedes_previous() {
        let session = ImpactSession::new();
        let first = session.begin();
        assert!(first.is_current());
        let second = session.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = ImpactSession::new();
        let b = ImpactSession::new();
        let token_a = a.begin();
        b.begin();
        assert!(token_a.is_current());
    }

    #[test]
    fn test_clones_share_generations() {
        let session = ImpactSession::new();
        let clone = session.clone();
        let token = session.begin();
        clone.begin();
        assert!(!token.is_current());
    }
}
