use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error, info};

use super::domain::{
    CatalogStatistics, Scholarship, ScholarshipsDocument, UniversitiesDocument, University,
};
use super::source::{CatalogSource, DataFile, SourceError};

pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Failure while loading the catalog documents.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to load {file}: {source}")]
    Source {
        file: DataFile,
        #[source]
        source: SourceError,
    },
    #[error("{file} is not valid catalog JSON: {source}")]
    Malformed {
        file: DataFile,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory universities and scholarships, loaded once and read many times.
#[derive(Debug, Default)]
pub struct CatalogStore {
    universities: Vec<University>,
    scholarships: Vec<Scholarship>,
    loaded: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an already-loaded store from records held in memory.
    pub fn from_records(universities: Vec<University>, scholarships: Vec<Scholarship>) -> Self {
        Self {
            universities,
            scholarships,
            loaded: true,
        }
    }

    /// Loads both documents concurrently. Calling again after a successful load is a no-op.
    ///
    /// On failure the store is left empty and unloaded so that readers see no results.
    pub async fn init<S: CatalogSource>(&mut self, source: &S) -> Result<(), CatalogError> {
        if self.loaded {
            debug!("catalog already loaded");
            return Ok(());
        }

        let loaded = tokio::try_join!(
            load_universities(source),
            load_scholarships(source)
        );

        match loaded {
            Ok((universities, scholarships)) => {
                info!(
                    universities = universities.len(),
                    scholarships = scholarships.len(),
                    "catalog loaded"
                );
                self.universities = universities;
                self.scholarships = scholarships;
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "catalog failed to load");
                self.universities.clear();
                self.scholarships.clear();
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn scholarships(&self) -> &[Scholarship] {
        &self.scholarships
    }

    pub fn university(&self, id: &str) -> Option<&University> {
        self.universities.iter().find(|university| university.id == id)
    }

    pub fn scholarship(&self, id: &str) -> Option<&Scholarship> {
        self.scholarships.iter().find(|scholarship| scholarship.id == id)
    }

    pub fn featured_universities(&self, limit: usize) -> Vec<&University> {
        self.universities
            .iter()
            .filter(|university| university.featured)
            .take(limit)
            .collect()
    }

    pub fn featured_scholarships(&self, limit: usize) -> Vec<&Scholarship> {
        self.scholarships
            .iter()
            .filter(|scholarship| scholarship.featured)
            .take(limit)
            .collect()
    }

    pub fn random_universities<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&University> {
        self.universities.choose_multiple(rng, count).collect()
    }

    pub fn statistics(&self) -> CatalogStatistics {
        let countries: BTreeSet<&str> = self
            .universities
            .iter()
            .map(|university| university.country.as_str())
            .collect();
        // A missing region counts as one region of its own.
        let regions: BTreeSet<Option<&str>> = self
            .universities
            .iter()
            .map(|university| university.region.as_deref())
            .collect();

        let average_acceptance_rate = if self.universities.is_empty() {
            0.0
        } else {
            let total: f64 = self
                .universities
                .iter()
                .map(|university| university.acceptance_rate)
                .sum();
            let mean = total / self.universities.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        CatalogStatistics {
            total_universities: self.universities.len(),
            total_scholarships: self.scholarships.len(),
            countries: countries.len(),
            regions: regions.len(),
            average_acceptance_rate,
        }
    }
}

async fn load_universities<S: CatalogSource>(source: &S) -> Result<Vec<University>, CatalogError> {
    let file = DataFile::Universities;
    let body = source
        .fetch(file)
        .await
        .map_err(|source| CatalogError::Source { file, source })?;
    let document: UniversitiesDocument = serde_json::from_str(&body)
        .map_err(|source| CatalogError::Malformed { file, source })?;
    Ok(document.universities)
}

async fn load_scholarships<S: CatalogSource>(source: &S) -> Result<Vec<Scholarship>, CatalogError> {
    let file = DataFile::Scholarships;
    let body = source
        .fetch(file)
        .await
        .map_err(|source| CatalogError::Source { file, source })?;
    let document: ScholarshipsDocument = serde_json::from_str(&body)
        .map_err(|source| CatalogError::Malformed { file, source })?;
    Ok(document.scholarships)
}
