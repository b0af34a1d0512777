use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::checklist::RequirementChecklist;
use super::domain::{ApplicationRecord, StoredApplication};
use crate::catalog::CatalogStore;
use crate::storage::{load_or_default, StateStore, APPLICATIONS_KEY};

/// Where the initial application list comes from, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedKind {
    #[default]
    Stored,
    Mock,
    Catalog,
}

impl SeedKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Mock => "mock",
            Self::Catalog => "catalog",
        }
    }
}

impl FromStr for SeedKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stored" => Ok(Self::Stored),
            "mock" => Ok(Self::Mock),
            "catalog" => Ok(Self::Catalog),
            other => Err(other.to_string()),
        }
    }
}

/// Seeding strategy handed to the tracker builder.
#[derive(Debug, Clone, Copy, Default)]
pub enum SeedSource<'a> {
    /// Whatever was last persisted under the applications key.
    #[default]
    Stored,
    /// Five fixed demo applications.
    Mock,
    /// Universities flagged `onTrack` in the loaded catalog.
    Catalog(&'a CatalogStore),
}

impl SeedSource<'_> {
    pub fn kind(&self) -> SeedKind {
        match self {
            Self::Stored => SeedKind::Stored,
            Self::Mock => SeedKind::Mock,
            Self::Catalog(_) => SeedKind::Catalog,
        }
    }
}

pub(crate) fn seed_records<S>(
    source: SeedSource<'_>,
    store: &S,
    now: DateTime<Utc>,
) -> Vec<ApplicationRecord>
where
    S: StateStore + ?Sized,
{
    let stored = match source {
        SeedSource::Stored => load_or_default::<Vec<StoredApplication>, _>(store, APPLICATIONS_KEY),
        SeedSource::Mock => mock_applications(),
        SeedSource::Catalog(catalog) => catalog_applications(catalog),
    };

    stored
        .into_iter()
        .map(|application| application.into_record(now))
        .collect()
}

struct MockApplication {
    university_id: &'static str,
    status: &'static str,
    fit_score: u8,
    completed: &'static [&'static str],
    notes: &'static str,
    added_date: &'static str,
}

const MOCK_APPLICATIONS: [MockApplication; 5] = [
    MockApplication {
        university_id: "nus",
        status: "in-progress",
        fit_score: 85,
        completed: &["gpa", "transcripts", "language", "essays", "recommendations"],
        notes: "Strong match for Computer Science program",
        added_date: "2024-10-15T10:00:00Z",
    },
    MockApplication {
        university_id: "mit",
        status: "researching",
        fit_score: 72,
        completed: &["gpa", "language"],
        notes: "Dream school - highly competitive",
        added_date: "2024-10-20T14:30:00Z",
    },
    MockApplication {
        university_id: "stanford",
        status: "preparing",
        fit_score: 78,
        completed: &["gpa", "transcripts", "language"],
        notes: "Great for entrepreneurship focus",
        added_date: "2024-10-18T09:15:00Z",
    },
    MockApplication {
        university_id: "toronto",
        status: "submitted",
        fit_score: 88,
        completed: &[
            "gpa",
            "transcripts",
            "language",
            "sat",
            "essays",
            "recommendations",
            "cv",
            "financial",
            "fee",
        ],
        notes: "Application completed and submitted",
        added_date: "2024-09-05T11:00:00Z",
    },
    MockApplication {
        university_id: "melbourne",
        status: "not-started",
        fit_score: 81,
        completed: &[],
        notes: "Good backup option",
        added_date: "2024-11-01T16:45:00Z",
    },
];

fn mock_applications() -> Vec<StoredApplication> {
    MOCK_APPLICATIONS
        .iter()
        .map(|mock| {
            let requirements = RequirementChecklist::standard_with_completed(mock.completed);

            StoredApplication {
                university_id: mock.university_id.to_string(),
                status: mock.status.to_string(),
                progress: requirements.progress(),
                fit_score: mock.fit_score,
                requirements,
                notes: mock.notes.to_string(),
                added_date: Some(mock.added_date.to_string()),
                deadline: None,
            }
        })
        .collect()
}

fn catalog_applications(catalog: &CatalogStore) -> Vec<StoredApplication> {
    catalog
        .universities()
        .iter()
        .filter(|university| university.on_track)
        .map(|university| {
            let tracking = university.application_tracking.clone().unwrap_or_default();
            let requirements = if tracking.requirements.is_empty() {
                RequirementChecklist::standard()
            } else {
                tracking.requirements
            };

            StoredApplication {
                university_id: university.id.clone(),
                status: tracking.status.unwrap_or_default(),
                progress: tracking.progress.unwrap_or(0),
                fit_score: tracking.fit_score.unwrap_or(0),
                requirements,
                notes: String::new(),
                added_date: None,
                deadline: tracking.deadline,
            }
        })
        .collect()
}
