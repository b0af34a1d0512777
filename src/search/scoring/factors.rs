use serde::{Deserialize, Serialize};

use crate::catalog::University;

const MAX_FACTORS: usize = 4;
const RESEARCH_RANKING_CUTOFF: u32 = 20;

/// Background details used to explain admission chances. Supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentBackground {
    pub gpa: f64,
    pub english_test: String,
    pub has_research: bool,
    pub has_internship: bool,
    pub strong_extracurriculars: bool,
}

impl Default for StudentBackground {
    fn default() -> Self {
        Self {
            gpa: 3.8,
            english_test: "IELTS 7.5".to_string(),
            has_research: false,
            has_internship: true,
            strong_extracurriculars: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorIndicator {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionFactor {
    pub indicator: FactorIndicator,
    pub name: String,
    pub value: String,
}

impl AdmissionFactor {
    fn new(indicator: FactorIndicator, name: impl Into<String>, value: &str) -> Self {
        Self {
            indicator,
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn needs_action(&self) -> bool {
        matches!(self.value.as_str(), "Consider" | "Action")
    }
}

/// Explains admission chances for `university`, at most four factors in a fixed order.
pub fn admission_factors(
    university: &University,
    background: &StudentBackground,
) -> Vec<AdmissionFactor> {
    let mut factors = Vec::new();

    if background.gpa >= university.required_gpa {
        factors.push(AdmissionFactor::new(
            FactorIndicator::Positive,
            format!(
                "Your GPA ({}) exceeds requirement ({})",
                background.gpa, university.required_gpa
            ),
            "Met",
        ));
    } else {
        factors.push(AdmissionFactor::new(
            FactorIndicator::Negative,
            format!(
                "Your GPA ({}) below requirement ({})",
                background.gpa, university.required_gpa
            ),
            "Below",
        ));
    }

    factors.push(AdmissionFactor::new(
        FactorIndicator::Positive,
        format!("{} meets English requirement", background.english_test),
        "Met",
    ));

    if background.has_internship {
        factors.push(AdmissionFactor::new(
            FactorIndicator::Positive,
            "Relevant internship experience",
            "Good",
        ));
    }

    if university.global_ranking <= RESEARCH_RANKING_CUTOFF {
        if background.has_research {
            factors.push(AdmissionFactor::new(
                FactorIndicator::Positive,
                "Research publications strengthen application",
                "Strong",
            ));
        } else {
            factors.push(AdmissionFactor::new(
                FactorIndicator::Neutral,
                "No research experience (recommended for top schools)",
                "Consider",
            ));
        }
    }

    if background.strong_extracurriculars {
        factors.push(AdmissionFactor::new(
            FactorIndicator::Positive,
            "Strong leadership & extracurricular activities",
            "Good",
        ));
    }

    factors.push(AdmissionFactor::new(
        FactorIndicator::Neutral,
        "Scholarship applications recommended",
        "Action",
    ));

    factors.truncate(MAX_FACTORS);
    factors
}

pub fn needs_action(factors: &[AdmissionFactor]) -> bool {
    factors.iter().any(AdmissionFactor::needs_action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::university;

    #[test]
    fn top_ranked_school_flags_missing_research() {
        let uni = university("mit", "USA", 1, 1.0, "USD");
        let factors = admission_factors(&uni, &StudentBackground::default());

        assert_eq!(factors.len(), 4);
        assert_eq!(factors[0].indicator, FactorIndicator::Positive);
        assert_eq!(factors[3].value, "Consider");
        assert!(needs_action(&factors));
    }

    #[test]
    fn lower_ranked_school_skips_research_factor() {
        let mut uni = university("regional", "USA", 150, 1.0, "USD");
        uni.required_gpa = 3.9;
        let background = StudentBackground {
            strong_extracurriculars: false,
            has_internship: false,
            ..StudentBackground::default()
        };
        let factors = admission_factors(&uni, &background);

        assert_eq!(factors.len(), 3);
        assert_eq!(factors[0].indicator, FactorIndicator::Negative);
        assert!(factors[0].name.contains("below requirement"));
        assert_eq!(factors[2].value, "Action");
    }

    #[test]
    fn no_action_needed_when_truncated_before_advice() {
        let uni = university("regional", "USA", 150, 1.0, "USD");
        let factors = admission_factors(&uni, &StudentBackground::default());
        // gpa, english, internship, extracurriculars
        assert_eq!(factors.len(), 4);
        assert!(!needs_action(&factors));
    }
}
