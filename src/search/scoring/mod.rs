mod config;
mod demo;
mod factors;
mod rules;

pub use config::{DemoScoring, FitWeights};
pub use demo::DemoScorer;
pub use factors::{admission_factors, needs_action, AdmissionFactor, FactorIndicator, StudentBackground};

use serde::{Deserialize, Serialize};

use super::currency::RateTable;
use crate::catalog::University;

pub const MAX_REASONS: usize = 3;
pub const PROFILE_PROMPT: &str = "Complete your profile to see fit scores";

/// Student details the profile-aware scorer compares against a university.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub gpa: Option<f64>,
    /// Annual budget in the reference currency.
    pub budget: Option<f64>,
    pub intended_major: Option<String>,
    pub preferred_countries: Vec<String>,
    pub english_score: Option<f64>,
}

/// Factors contributing to a fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitFactor {
    Gpa,
    Budget,
    Field,
    Location,
    Language,
    Acceptance,
}

/// Points awarded for one factor, kept so a score can be explained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitComponent {
    pub factor: FitFactor,
    pub points: f64,
    pub reason: Option<String>,
}

impl FitComponent {
    pub(crate) fn awarded(factor: FitFactor, points: f64, reason: &str) -> Self {
        Self {
            factor,
            points,
            reason: Some(reason.to_string()),
        }
    }

    pub(crate) fn silent(factor: FitFactor, points: f64) -> Self {
        Self {
            factor,
            points,
            reason: None,
        }
    }
}

/// Score in `[0, 100]` plus up to three reasons, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub score: u8,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<FitComponent>,
}

/// Weighted heuristic comparing a user profile with a university.
#[derive(Debug, Clone, Default)]
pub struct FitScorer {
    weights: FitWeights,
    rates: RateTable,
}

impl FitScorer {
    pub fn new(weights: FitWeights, rates: RateTable) -> Self {
        Self { weights, rates }
    }

    pub fn weights(&self) -> &FitWeights {
        &self.weights
    }

    /// Without a profile the score is 0 with a prompt to complete one.
    pub fn score(&self, university: &University, profile: Option<&UserProfile>) -> FitScore {
        let Some(profile) = profile else {
            return FitScore {
                score: 0,
                reasons: vec![PROFILE_PROMPT.to_string()],
                components: Vec::new(),
            };
        };

        let (components, total) =
            rules::score_university(university, profile, &self.weights, &self.rates);

        let reasons = components
            .iter()
            .filter_map(|component| component.reason.clone())
            .take(MAX_REASONS)
            .collect();

        FitScore {
            score: total.round().clamp(0.0, 100.0) as u8,
            reasons,
            components,
        }
    }
}
