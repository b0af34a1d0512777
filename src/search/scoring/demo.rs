use rand::Rng;

use super::config::DemoScoring;
use super::FitScore;
use crate::catalog::University;

/// Profile-free scorer used while browsing the catalog.
///
/// Starts from a base score, adds bonuses for accessible admissions, available
/// scholarships, and a large international community, applies random jitter,
/// then clamps into `[floor, ceiling]`.
#[derive(Debug, Clone, Default)]
pub struct DemoScorer {
    config: DemoScoring,
}

impl DemoScorer {
    pub fn new(config: DemoScoring) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DemoScoring {
        &self.config
    }

    pub fn score<R: Rng + ?Sized>(&self, university: &University, rng: &mut R) -> FitScore {
        let jitter = if self.config.jitter > 0 {
            rng.gen_range(-self.config.jitter..self.config.jitter)
        } else {
            0
        };
        self.score_with_jitter(university, jitter)
    }

    /// Deterministic variant taking the jitter explicitly.
    pub fn score_with_jitter(&self, university: &University, jitter: i32) -> FitScore {
        let mut score = self.config.base;
        let mut reasons = Vec::new();

        if university.acceptance_rate > 20.0 {
            score += 10;
            reasons.push("Reasonable acceptance rate".to_string());
        } else if university.acceptance_rate > 10.0 {
            score += 5;
            reasons.push("Competitive but achievable".to_string());
        }

        if university.offers_scholarships() {
            score += 10;
            reasons.push("Scholarships available to help with costs".to_string());
        }

        if university.international_student_ratio > 25.0 {
            score += 5;
            reasons.push("Large international student community".to_string());
        }

        let score = score
            .saturating_add(jitter)
            .clamp(i32::from(self.config.floor), i32::from(self.config.ceiling));

        FitScore {
            score: u8::try_from(score).unwrap_or(self.config.ceiling),
            reasons,
            components: Vec::new(),
        }
    }
}
