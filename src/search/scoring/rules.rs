use super::super::currency::RateTable;
use super::config::FitWeights;
use super::{FitComponent, FitFactor, UserProfile};
use crate::catalog::University;

// Absorbs representation error so that e.g. 3.9 - 3.7 still counts as a 0.2 surplus.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Zero, negative, and NaN entries count as not filled in.
fn supplied(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value > 0.0)
}

pub(crate) fn score_university(
    university: &University,
    profile: &UserProfile,
    weights: &FitWeights,
    rates: &RateTable,
) -> (Vec<FitComponent>, f64) {
    let mut components = Vec::new();

    if let Some(gpa) = supplied(profile.gpa) {
        let surplus = gpa - university.required_gpa + THRESHOLD_EPSILON;
        let award = if surplus >= 0.2 {
            Some((1.0, "Your GPA exceeds requirements"))
        } else if surplus >= 0.0 {
            Some((0.8, "Your GPA meets requirements"))
        } else if surplus >= -0.2 {
            Some((0.5, "Your GPA is slightly below requirements"))
        } else {
            None
        };
        if let Some((share, reason)) = award {
            components.push(FitComponent::awarded(FitFactor::Gpa, weights.gpa * share, reason));
        }
    }

    if let Some(budget) = supplied(profile.budget) {
        let tuition = rates.max_tuition(&university.tuition_range);
        let award = if budget >= tuition * 1.5 {
            Some((1.0, "Tuition is well within your budget"))
        } else if budget >= tuition {
            Some((0.7, "Tuition fits your budget"))
        } else if university.offers_scholarships() {
            Some((0.5, "Scholarships available to help with costs"))
        } else {
            None
        };
        if let Some((share, reason)) = award {
            components.push(FitComponent::awarded(
                FitFactor::Budget,
                weights.budget * share,
                reason,
            ));
        }
    }

    if let Some(major) = profile
        .intended_major
        .as_deref()
        .map(str::trim)
        .filter(|major| !major.is_empty())
    {
        let major = major.to_lowercase();
        let matches_field = university.main_fields.iter().any(|field| {
            let field = field.to_lowercase();
            field.contains(&major) || major.contains(&field)
        });
        if matches_field {
            components.push(FitComponent::awarded(
                FitFactor::Field,
                weights.field,
                "Strong programs in your field of interest",
            ));
        }
    }

    if profile.preferred_countries.is_empty() {
        components.push(FitComponent::silent(FitFactor::Location, weights.location * 0.5));
    } else if profile
        .preferred_countries
        .iter()
        .any(|country| country.eq_ignore_ascii_case(&university.country))
    {
        components.push(FitComponent::awarded(
            FitFactor::Location,
            weights.location,
            "Located in your preferred country",
        ));
    }

    if supplied(profile.english_score).is_some() {
        components.push(FitComponent::awarded(
            FitFactor::Language,
            weights.language,
            "You meet language requirements",
        ));
    }

    let (share, reason) = if university.acceptance_rate > 20.0 {
        (1.0, "Reasonable acceptance rate")
    } else if university.acceptance_rate > 10.0 {
        (0.7, "Competitive but achievable")
    } else {
        (0.4, "Highly selective")
    };
    components.push(FitComponent::awarded(
        FitFactor::Acceptance,
        weights.acceptance * share,
        reason,
    ));

    let total = components.iter().map(|component| component.points).sum();
    (components, total)
}
