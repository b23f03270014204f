//! Risk analysis for submitted diagnoses.
//!
//! No model runs here: `MockAnalyzer` produces a random score in
//! `[70, 99]` and a fixed summary. The trait is the seam a real
//! scorer would plug into.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::NewDiagnosis;

pub const MOCK_SCORE_MIN: i32 = 70;
pub const MOCK_SCORE_MAX: i32 = 99;

pub const MOCK_SUMMARY: &str = "AI analysis: minor heat degradation was detected around the outlet. \
Replacing the wiring is recommended.";

/// Outcome of analysing one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0..=100, higher means more urgent.
    pub score: i32,
    pub summary: String,
}

/// Scores a submission synchronously, before it is handed to experts.
pub trait RiskAnalyzer: Send + Sync {
    fn analyze(&self, diagnosis: &NewDiagnosis) -> RiskAssessment;
}

/// Randomised placeholder scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAnalyzer;

impl RiskAnalyzer for MockAnalyzer {
    fn analyze(&self, _diagnosis: &NewDiagnosis) -> RiskAssessment {
        RiskAssessment {
            score: rand::thread_rng().gen_range(MOCK_SCORE_MIN..=MOCK_SCORE_MAX),
            summary: MOCK_SUMMARY.to_string(),
        }
    }
}

/// Always returns the same assessment.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedAnalyzer(pub RiskAssessment);

#[cfg(test)]
impl RiskAnalyzer for FixedAnalyzer {
    fn analyze(&self, _diagnosis: &NewDiagnosis) -> RiskAssessment {
        self.0.clone()
    }
}
