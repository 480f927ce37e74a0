//! A claim-checking session: the latest result plus a bounded history.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use loksahayak_core::config::FactCheckConfig;

use crate::checker::{FactCheckResult, FactChecker};
use crate::error::FactCheckError;

/// A checked claim as the user typed it, with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckRecord {
    pub claim: String,
    #[serde(flatten)]
    pub result: FactCheckResult,
}

#[derive(Debug, Default)]
struct SessionState {
    checking: bool,
    result: Option<FactCheckResult>,
    history: VecDeque<FactCheckRecord>,
}

pub struct FactCheckSession {
    checker: Arc<dyn FactChecker>,
    history_limit: usize,
    state: Mutex<SessionState>,
}

impl FactCheckSession {
    pub fn new(checker: Arc<dyn FactChecker>, config: &FactCheckConfig) -> Self {
        Self {
            checker,
            history_limit: config.history_limit,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check a claim. Blank claims are ignored and return `Ok(None)`.
    ///
    /// The previous result is cleared while checking. On success the result
    /// becomes current and is prepended to history.
    pub async fn check(&self, claim: &str) -> Result<Option<FactCheckResult>, FactCheckError> {
        if claim.trim().is_empty() {
            return Ok(None);
        }
        let _checking = CheckingGuard::acquire(&self.state)?;

        tracing::info!(chars = claim.trim().chars().count(), "Checking claim");
        let outcome = self.checker.check(claim).await;

        let mut state = self.lock();
        match outcome {
            Ok(result) => {
                tracing::info!(score = result.score, verdict = %result.verdict, "Claim checked");
                state.result = Some(result.clone());
                state.history.push_front(FactCheckRecord {
                    claim: claim.to_string(),
                    result: result.clone(),
                });
                state.history.truncate(self.history_limit);
                Ok(Some(result))
            }
            Err(e) => {
                tracing::error!(error = %e, "Fact check failed");
                Err(e)
            }
        }
    }

    pub fn is_checking(&self) -> bool {
        self.lock().checking
    }

    pub fn result(&self) -> Option<FactCheckResult> {
        self.lock().result.clone()
    }

    /// Newest first.
    pub fn history(&self) -> Vec<FactCheckRecord> {
        self.lock().history.iter().cloned().collect()
    }

    /// Forget the current result. History is kept.
    pub fn clear(&self) {
        self.lock().result = None;
    }
}

struct CheckingGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl<'a> CheckingGuard<'a> {
    fn acquire(state: &'a Mutex<SessionState>) -> Result<Self, FactCheckError> {
        let mut inner = state.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.checking {
            return Err(FactCheckError::Busy);
        }
        inner.checking = true;
        inner.result = None;
        Ok(Self { state })
    }
}

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .checking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::checker::{PlaceholderChecker, Verdict};

    struct Instant;

    #[async_trait]
    impl FactChecker for Instant {
        async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError> {
            Ok(PlaceholderChecker::evaluate(claim, Utc::now()))
        }
    }

    struct Failing(AtomicUsize);

    #[async_trait]
    impl FactChecker for Failing {
        async fn check(&self, _claim: &str) -> Result<FactCheckResult, FactCheckError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(FactCheckError::Backend("unreachable".into()))
        }
    }

    fn config(limit: usize) -> FactCheckConfig {
        FactCheckConfig {
            history_limit: limit,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_claim_is_ignored() {
        let session = FactCheckSession::new(Arc::new(Instant), &config(10));
        assert_eq!(session.check("   ").await.unwrap(), None);
        assert!(session.history().is_empty());
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_check_records_result_and_history() {
        let session = FactCheckSession::new(Arc::new(Instant), &config(10));

        let result = session.check("  The river is long  ").await.unwrap().unwrap();

        assert_eq!(session.result(), Some(result.clone()));
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].claim, "  The river is long  ");
        assert_eq!(history[0].result, result);
        assert!(!session.is_checking());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let session = FactCheckSession::new(Arc::new(Instant), &config(3));
        for i in 0..5 {
            session.check(&format!("claim {i}")).await.unwrap();
        }
        let claims: Vec<_> = session.history().into_iter().map(|r| r.claim).collect();
        assert_eq!(claims, vec!["claim 4", "claim 3", "claim 2"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_history_and_clears_flag() {
        let failing = Arc::new(Failing(AtomicUsize::new(0)));
        let session = FactCheckSession::new(failing.clone(), &config(10));

        let err = session.check("claim").await.unwrap_err();

        assert!(matches!(err, FactCheckError::Backend(_)));
        assert_eq!(failing.0.load(Ordering::SeqCst), 1);
        assert!(session.result().is_none());
        assert!(session.history().is_empty());
        assert!(!session.is_checking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_check_is_busy() {
        let checker = Arc::new(PlaceholderChecker::new(Duration::from_millis(800)));
        let session = Arc::new(FactCheckSession::new(checker, &config(10)));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.check("first claim").await }
        });
        while !session.is_checking() {
            tokio::task::yield_now().await;
        }

        assert_eq!(session.check("second").await.unwrap_err(), FactCheckError::Busy);

        let result = first.await.unwrap().unwrap().unwrap();
        assert_eq!(result.verdict, Verdict::from_score(result.score));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = FactCheckRecord {
            claim: "abc".into(),
            result: PlaceholderChecker::evaluate("abc", Utc::now()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["claim"], "abc");
        assert!(json["score"].is_number());
        assert!(json["checked_at"].is_string());
    }
}
