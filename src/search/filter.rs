use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::currency::RateTable;
use super::Listing;
use crate::catalog::{Scholarship, University};

/// Named global-ranking ranges. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankingBand {
    #[serde(rename = "1-10")]
    Top10,
    #[serde(rename = "11-50")]
    Top50,
    #[serde(rename = "51-100")]
    Top100,
}

impl RankingBand {
    pub const fn ordered() -> [Self; 3] {
        [Self::Top10, Self::Top50, Self::Top100]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top10 => "1-10",
            Self::Top50 => "11-50",
            Self::Top100 => "51-100",
        }
    }

    pub const fn contains(self, ranking: u32) -> bool {
        match self {
            Self::Top10 => ranking <= 10,
            Self::Top50 => ranking >= 11 && ranking <= 50,
            Self::Top100 => ranking >= 51 && ranking <= 100,
        }
    }
}

/// Named annual-tuition ranges in the reference currency. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TuitionBand {
    #[serde(rename = "0-10000")]
    Under10k,
    #[serde(rename = "10000-30000")]
    From10kTo30k,
    #[serde(rename = "30000-50000")]
    From30kTo50k,
    #[serde(rename = "50000+")]
    Over50k,
}

impl TuitionBand {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Under10k,
            Self::From10kTo30k,
            Self::From30kTo50k,
            Self::Over50k,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under10k => "0-10000",
            Self::From10kTo30k => "10000-30000",
            Self::From30kTo50k => "30000-50000",
            Self::Over50k => "50000+",
        }
    }

    pub fn contains(self, amount: f64) -> bool {
        match self {
            Self::Under10k => amount < 10_000.0,
            Self::From10kTo30k => (10_000.0..30_000.0).contains(&amount),
            Self::From30kTo50k => (30_000.0..50_000.0).contains(&amount),
            Self::Over50k => amount >= 50_000.0,
        }
    }
}

/// Raised when a band label does not name a known range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} band '{value}'")]
pub struct UnknownBand {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for RankingBand {
    type Err = UnknownBand;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|band| band.label() == value.trim())
            .ok_or_else(|| UnknownBand {
                kind: "ranking",
                value: value.to_string(),
            })
    }
}

impl FromStr for TuitionBand {
    type Err = UnknownBand;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|band| band.label() == value.trim())
            .ok_or_else(|| UnknownBand {
                kind: "tuition",
                value: value.to_string(),
            })
    }
}

impl fmt::Display for RankingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TuitionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// University filters. Categories combine with AND, values within a category with OR.
/// An empty category imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniversityCriteria {
    pub search: String,
    pub countries: BTreeSet<String>,
    pub ranking_bands: BTreeSet<RankingBand>,
    pub tuition_bands: BTreeSet<TuitionBand>,
    pub fields: BTreeSet<String>,
    pub scholarship_only: bool,
}

impl UniversityCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.countries.is_empty()
            && self.ranking_bands.is_empty()
            && self.tuition_bands.is_empty()
            && self.fields.is_empty()
            && !self.scholarship_only
    }

    pub fn matches(&self, university: &University, rates: &RateTable) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() {
            let hit = university.name.to_lowercase().contains(&search)
                || university.country.to_lowercase().contains(&search)
                || university
                    .main_fields
                    .iter()
                    .any(|field| field.to_lowercase().contains(&search));
            if !hit {
                return false;
            }
        }

        if !self.countries.is_empty() && !self.countries.contains(&university.country) {
            return false;
        }

        if !self.ranking_bands.is_empty()
            && !self
                .ranking_bands
                .iter()
                .any(|band| band.contains(university.global_ranking))
        {
            return false;
        }

        if !self.tuition_bands.is_empty() {
            let tuition = rates.min_tuition(&university.tuition_range);
            if !self.tuition_bands.iter().any(|band| band.contains(tuition)) {
                return false;
            }
        }

        if !self.fields.is_empty() {
            let has_field = self.fields.iter().any(|wanted| {
                let wanted = wanted.to_lowercase();
                university
                    .main_fields
                    .iter()
                    .any(|field| field.to_lowercase().contains(&wanted))
            });
            if !has_field {
                return false;
            }
        }

        !self.scholarship_only || university.offers_scholarships()
    }
}

/// Scholarship filters, combined the same way as [`UniversityCriteria`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarshipCriteria {
    pub search: String,
    pub funding_types: BTreeSet<String>,
    pub degree_levels: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub deadline_after: Option<NaiveDate>,
}

impl ScholarshipCriteria {
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() {
            let hit = scholarship.name.to_lowercase().contains(&search)
                || scholarship.provider.to_lowercase().contains(&search)
                || scholarship.country.to_lowercase().contains(&search);
            if !hit {
                return false;
            }
        }

        if !self.funding_types.is_empty() && !self.funding_types.contains(&scholarship.amount.kind)
        {
            return false;
        }

        if !self.degree_levels.is_empty()
            && !scholarship
                .degree_levels
                .iter()
                .any(|level| self.degree_levels.contains(level))
        {
            return false;
        }

        if !self.countries.is_empty() && !self.countries.contains(&scholarship.country) {
            return false;
        }

        match (self.deadline_after, scholarship.deadline) {
            (Some(after), Some(deadline)) => deadline >= after,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Keeps the listings that satisfy every active criterion, in their original order.
pub fn filter_universities<'a, T: Listing>(
    listings: &'a [T],
    criteria: &UniversityCriteria,
    rates: &RateTable,
) -> Vec<&'a T> {
    listings
        .iter()
        .filter(|listing| criteria.matches(listing.university(), rates))
        .collect()
}

pub fn filter_scholarships<'a>(
    scholarships: &'a [Scholarship],
    criteria: &ScholarshipCriteria,
) -> Vec<&'a Scholarship> {
    scholarships
        .iter()
        .filter(|scholarship| criteria.matches(scholarship))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::{scholarship, university};

    #[test]
    fn empty_criteria_keeps_everything_in_order() {
        let catalog = vec![
            university("a", "Canada", 40, 28_000.0, "USD"),
            university("b", "Japan", 5, 9_000.0, "USD"),
            university("c", "Germany", 70, 0.0, "EUR"),
        ];
        let criteria = UniversityCriteria::default();
        assert!(criteria.is_empty());

        let kept = filter_universities(&catalog, &criteria, &RateTable::standard());
        let ids: Vec<_> = kept.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn tuition_band_uses_minimum_tuition() {
        let catalog = vec![university("mid", "USA", 30, 28_000.0, "USD")];
        let rates = RateTable::standard();

        let mut criteria = UniversityCriteria::default();
        criteria.tuition_bands.insert(TuitionBand::From10kTo30k);
        assert_eq!(filter_universities(&catalog, &criteria, &rates).len(), 1);

        criteria.tuition_bands.clear();
        criteria.tuition_bands.insert(TuitionBand::From30kTo50k);
        assert!(filter_universities(&catalog, &criteria, &rates).is_empty());
    }

    #[test]
    fn tuition_band_normalizes_currency() {
        // 25,000 GBP is 31,750 USD.
        let catalog = vec![university("ucl", "United Kingdom", 9, 25_000.0, "GBP")];
        let mut criteria = UniversityCriteria::default();
        criteria.tuition_bands.insert(TuitionBand::From30kTo50k);
        assert_eq!(
            filter_universities(&catalog, &criteria, &RateTable::standard()).len(),
            1
        );
    }

    #[test]
    fn or_within_category_and_across_categories() {
        let catalog = vec![
            university("a", "Canada", 8, 20_000.0, "USD"),
            university("b", "Japan", 45, 20_000.0, "USD"),
            university("c", "Japan", 90, 20_000.0, "USD"),
        ];
        let mut criteria = UniversityCriteria::default();
        criteria.ranking_bands.insert(RankingBand::Top10);
        criteria.ranking_bands.insert(RankingBand::Top50);
        let ids: Vec<_> = filter_universities(&catalog, &criteria, &RateTable::standard())
            .iter()
            .map(|u| u.id.clone())
            .collect();
        assert_eq!(ids, ["a", "b"]);

        criteria.countries.insert("Japan".to_string());
        let ids: Vec<_> = filter_universities(&catalog, &criteria, &RateTable::standard())
            .iter()
            .map(|u| u.id.clone())
            .collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn search_matches_name_country_and_fields_case_insensitively() {
        let mut with_field = university("f", "Chile", 60, 5_000.0, "USD");
        with_field.main_fields = vec!["Marine Biology".to_string()];
        let catalog = vec![university("a", "Canada", 8, 20_000.0, "USD"), with_field];

        let mut criteria = UniversityCriteria {
            search: "BIOLOGY".to_string(),
            ..Default::default()
        };
        let kept = filter_universities(&catalog, &criteria, &RateTable::standard());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "f");

        criteria.search = "canada".to_string();
        let kept = filter_universities(&catalog, &criteria, &RateTable::standard());
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn field_and_scholarship_filters() {
        let mut engineering = university("eng", "USA", 3, 55_000.0, "USD");
        engineering.main_fields = vec!["Electrical Engineering".to_string()];
        engineering.scholarships = vec!["Merit".to_string()];
        let mut arts = university("arts", "USA", 40, 40_000.0, "USD");
        arts.main_fields = vec!["Fine Arts".to_string()];
        let catalog = vec![engineering, arts];

        let mut criteria = UniversityCriteria::default();
        criteria.fields.insert("engineering".to_string());
        criteria.fields.insert("History".to_string());
        let kept = filter_universities(&catalog, &criteria, &RateTable::standard());
        assert_eq!(kept.len(), 1);

        let criteria = UniversityCriteria {
            scholarship_only: true,
            ..Default::default()
        };
        let kept = filter_universities(&catalog, &criteria, &RateTable::standard());
        assert_eq!(kept[0].id, "eng");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn band_labels_parse() {
        assert_eq!("11-50".parse::<RankingBand>(), Ok(RankingBand::Top50));
        assert_eq!("50000+".parse::<TuitionBand>(), Ok(TuitionBand::Over50k));
        assert!("1-5".parse::<RankingBand>().is_err());
        assert!(RankingBand::Top100.contains(100));
        assert!(!RankingBand::Top100.contains(101));
    }

    #[test]
    fn scholarship_filters_combine() {
        let full = scholarship("full", "Full", "United Kingdom", Some((2025, 11, 5)));
        let partial = scholarship("partial", "Partial", "Japan", Some((2025, 3, 1)));
        let open = scholarship("open", "Full", "Japan", None);
        let catalog = vec![full, partial, open];

        let mut criteria = ScholarshipCriteria::default();
        criteria.funding_types.insert("Full".to_string());
        let ids: Vec<_> = filter_scholarships(&catalog, &criteria)
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, ["full", "open"]);

        criteria.deadline_after = NaiveDate::from_ymd_opt(2025, 6, 1);
        let ids: Vec<_> = filter_scholarships(&catalog, &criteria)
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, ["full"]);

        let criteria = ScholarshipCriteria {
            search: "japan".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_scholarships(&catalog, &criteria).len(), 2);
    }
}
