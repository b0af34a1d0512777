//! Filtering, fit scoring, and sorting over the loaded catalog.

pub mod currency;
pub mod filter;
pub mod scoring;
pub mod sort;

pub use currency::{RateTable, REFERENCE_CURRENCY};
pub use filter::{
    filter_scholarships, filter_universities, RankingBand, ScholarshipCriteria, TuitionBand,
    UniversityCriteria, UnknownBand,
};
pub use scoring::{
    AdmissionFactor, DemoScorer, FactorIndicator, FitScore, FitScorer, FitWeights,
    StudentBackground, UserProfile,
};
pub use sort::{sort_universities, SortKey, UnknownSortKey};

use rand::Rng;
use serde::Serialize;

use crate::catalog::{CatalogStore, Scholarship, University};

/// Anything that can be filtered and sorted as a university listing.
pub trait Listing {
    fn university(&self) -> &University;

    /// Precomputed fit score, when one exists.
    fn fit_score(&self) -> u8 {
        0
    }
}

impl Listing for University {
    fn university(&self) -> &University {
        self
    }
}

impl<T: Listing + ?Sized> Listing for &T {
    fn university(&self) -> &University {
        (**self).university()
    }

    fn fit_score(&self) -> u8 {
        (**self).fit_score()
    }
}

/// A catalog entry paired with the fit score computed for it while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredUniversity<'a> {
    pub university: &'a University,
    pub fit_score: u8,
}

impl<'a> ScoredUniversity<'a> {
    pub fn new(university: &'a University, fit_score: u8) -> Self {
        Self {
            university,
            fit_score,
        }
    }
}

impl Listing for ScoredUniversity<'_> {
    fn university(&self) -> &University {
        self.university
    }

    fn fit_score(&self) -> u8 {
        self.fit_score
    }
}

/// Browsing pipeline: score every catalog entry once, then filter and sort on demand.
pub struct SearchEngine<'a> {
    listings: Vec<ScoredUniversity<'a>>,
    scholarships: &'a [Scholarship],
    rates: RateTable,
}

impl<'a> SearchEngine<'a> {
    /// Scores the catalog with the demo scorer. An empty catalog yields an empty engine.
    pub fn new<R: Rng + ?Sized>(
        catalog: &'a CatalogStore,
        scorer: &DemoScorer,
        rates: RateTable,
        rng: &mut R,
    ) -> Self {
        let listings = catalog
            .universities()
            .iter()
            .map(|university| {
                ScoredUniversity::new(university, scorer.score(university, rng).score)
            })
            .collect();

        Self {
            listings,
            scholarships: catalog.scholarships(),
            rates,
        }
    }

    pub fn listings(&self) -> &[ScoredUniversity<'a>] {
        &self.listings
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Precomputed fit score for a catalog id.
    pub fn fit_score(&self, university_id: &str) -> Option<u8> {
        self.listings
            .iter()
            .find(|listing| listing.university.id == university_id)
            .map(|listing| listing.fit_score)
    }

    pub fn universities(
        &self,
        criteria: &UniversityCriteria,
        key: SortKey,
    ) -> Vec<ScoredUniversity<'a>> {
        let kept: Vec<ScoredUniversity<'a>> = filter_universities(&self.listings, criteria, &self.rates)
            .into_iter()
            .copied()
            .collect();
        sort_universities(kept, key, &self.rates)
    }

    pub fn scholarships(&self, criteria: &ScholarshipCriteria) -> Vec<&'a Scholarship> {
        filter_scholarships(self.scholarships, criteria)
    }
}
