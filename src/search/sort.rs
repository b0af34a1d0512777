use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::currency::RateTable;
use super::Listing;

/// Ordering applied to a list of universities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Highest fit score first.
    #[default]
    Fit,
    /// Best (lowest) global ranking first.
    Ranking,
    /// Cheapest minimum tuition first, after currency normalization.
    TuitionLow,
    /// Most expensive maximum tuition first, after currency normalization.
    TuitionHigh,
    /// Highest acceptance rate first.
    Acceptance,
    Name,
    Country,
}

impl SortKey {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Fit,
            Self::Ranking,
            Self::TuitionLow,
            Self::TuitionHigh,
            Self::Acceptance,
            Self::Name,
            Self::Country,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Ranking => "ranking",
            Self::TuitionLow => "tuition-low",
            Self::TuitionHigh => "tuition-high",
            Self::Acceptance => "acceptance",
            Self::Name => "name",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|key| key.label() == value)
            .ok_or(UnknownSortKey(value))
    }
}

/// Returns the listings ordered by `key`. Listings that compare equal keep their input order.
pub fn sort_universities<T: Listing>(mut listings: Vec<T>, key: SortKey, rates: &RateTable) -> Vec<T> {
    // `sort_by` is a stable merge sort; equal fit scores are common, so stability matters here.
    listings.sort_by(|a, b| compare(a, b, key, rates));
    listings
}

fn compare<T: Listing>(a: &T, b: &T, key: SortKey, rates: &RateTable) -> Ordering {
    let (ua, ub) = (a.university(), b.university());
    match key {
        SortKey::Fit => b.fit_score().cmp(&a.fit_score()),
        SortKey::Ranking => ua.global_ranking.cmp(&ub.global_ranking),
        SortKey::TuitionLow => rates
            .min_tuition(&ua.tuition_range)
            .total_cmp(&rates.min_tuition(&ub.tuition_range)),
        SortKey::TuitionHigh => rates
            .max_tuition(&ub.tuition_range)
            .total_cmp(&rates.max_tuition(&ua.tuition_range)),
        SortKey::Acceptance => ub.acceptance_rate.total_cmp(&ua.acceptance_rate),
        SortKey::Name => ua.name.to_lowercase().cmp(&ub.name.to_lowercase()),
        SortKey::Country => ua.country.to_lowercase().cmp(&ub.country.to_lowercase()),
    }
}
