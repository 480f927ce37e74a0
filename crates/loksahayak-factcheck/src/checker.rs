//! The checker seam and the placeholder implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FactCheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyTrue,
    LikelyFalse,
    Unclear,
}

impl Verdict {
    /// Verdict for a 0-100 score.
    pub fn from_score(score: u8) -> Self {
        if score > 65 {
            Verdict::LikelyTrue
        } else if score < 35 {
            Verdict::LikelyFalse
        } else {
            Verdict::Unclear
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::LikelyTrue => write!(f, "Likely True"),
            Verdict::LikelyFalse => write!(f, "Likely False"),
            Verdict::Unclear => write!(f, "Unclear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Supports,
    Contradicts,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Supports => write!(f, "supports"),
            Stance::Contradicts => write!(f, "contradicts"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reliability {
    High,
    Medium,
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reliability::High => write!(f, "High"),
            Reliability::Medium => write!(f, "Medium"),
        }
    }
}

/// A reference cited for a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: u32,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub stance: Stance,
    pub reliability: Reliability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    /// 0-100.
    pub score: u8,
    pub verdict: Verdict,
    pub sources: Vec<Source>,
    pub checked_at: DateTime<Utc>,
}

/// Something that can judge a claim.
#[async_trait]
pub trait FactChecker: Send + Sync {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError>;
}

/// Length-based stand-in for a real fact checking backend.
///
/// Scores are `floor((n % 37) * 2.7)` where `n` is the UTF-16 length of the
/// trimmed claim. Nothing about a claim's truth goes into the score.
#[derive(Debug, Clone)]
pub struct PlaceholderChecker {
    latency: Duration,
}

impl Default for PlaceholderChecker {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

impl PlaceholderChecker {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn score(claim: &str) -> u8 {
        let len = claim.trim().encode_utf16().count();
        // Integer form of floor(x * 2.7); never exceeds 97.
        let score = (len % 37) * 27 / 10;
        score.min(100) as u8
    }

    pub fn evaluate(claim: &str, checked_at: DateTime<Utc>) -> FactCheckResult {
        let score = Self::score(claim);
        let stance = if score > 50 {
            Stance::Supports
        } else {
            Stance::Contradicts
        };
        let sources = vec![
            Source {
                id: 1,
                title: "Trusted News: example headline".to_string(),
                excerpt: "Short excerpt that either supports or questions the claim.".to_string(),
                url: "#".to_string(),
                stance,
                reliability: if score > 50 {
                    Reliability::High
                } else {
                    Reliability::Medium
                },
            },
            Source {
                id: 2,
                title: "Independent fact-check report".to_string(),
                excerpt: "Independent fact-check that analyzes the claim in detail.".to_string(),
                url: "#".to_string(),
                stance,
                reliability: Reliability::High,
            },
        ];

        FactCheckResult {
            score,
            verdict: Verdict::from_score(score),
            sources,
            checked_at,
        }
    }
}

#[async_trait]
impl FactChecker for PlaceholderChecker {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError> {
        tokio::time::sleep(self.latency).await;
        Ok(Self::evaluate(claim, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_of_len(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn test_score_table() {
        let table = [
            (1, 2),
            (10, 27),
            (12, 32),
            (13, 35),
            (18, 48),
            (19, 51),
            (24, 64),
            (25, 67),
            (36, 97),
            (37, 0),
            (38, 2),
        ];
        for (len, expected) in table {
            assert_eq!(
                PlaceholderChecker::score(&claim_of_len(len)),
                expected,
                "len {len}"
            );
        }
    }

    #[test]
    fn test_score_ignores_surrounding_whitespace() {
        assert_eq!(
            PlaceholderChecker::score("   abcdefghij \n"),
            PlaceholderChecker::score("abcdefghij")
        );
    }

    #[test]
    fn test_score_counts_utf16_units() {
        // Each of these is one UTF-16 unit; the emoji is two.
        assert_eq!(PlaceholderChecker::score("नमस्ते"), PlaceholderChecker::score("xxxxxx"));
        assert_eq!(PlaceholderChecker::score("\u{1F600}"), PlaceholderChecker::score("xx"));
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(66), Verdict::LikelyTrue);
        assert_eq!(Verdict::from_score(65), Verdict::Unclear);
        assert_eq!(Verdict::from_score(35), Verdict::Unclear);
        assert_eq!(Verdict::from_score(34), Verdict::LikelyFalse);
        assert_eq!(Verdict::LikelyTrue.to_string(), "Likely True");
    }

    #[test]
    fn test_sources_follow_score() {
        let now = Utc::now();

        let high = PlaceholderChecker::evaluate(&claim_of_len(19), now);
        assert_eq!(high.score, 51);
        assert!(high.sources.iter().all(|s| s.stance == Stance::Supports));
        assert_eq!(high.sources[0].reliability, Reliability::High);

        let low = PlaceholderChecker::evaluate(&claim_of_len(18), now);
        assert_eq!(low.verdict, Verdict::Unclear);
        assert!(low.sources.iter().all(|s| s.stance == Stance::Contradicts));
        assert_eq!(low.sources[0].reliability, Reliability::Medium);
        assert_eq!(low.sources[1].reliability, Reliability::High);
    }

    #[test]
    fn test_result_serializes() {
        let result = PlaceholderChecker::evaluate("abc", Utc::now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["verdict"], "likely_false");
        assert_eq!(json["sources"][0]["stance"], "contradicts");
        assert_eq!(json["sources"][1]["reliability"], "High");
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_waits_for_latency() {
        let checker = PlaceholderChecker::new(Duration::from_millis(800));
        let start = tokio::time::Instant::now();
        let result = checker.check("claim").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(800));
        assert_eq!(result.score, PlaceholderChecker::score("claim"));
    }
}
