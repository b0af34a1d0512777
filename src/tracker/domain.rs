use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::checklist::RequirementChecklist;
use super::deadline;
use super::status::{ApplicationStatus, StatusVocabulary};
use crate::catalog::University;

/// Fit score assigned when none is supplied on add.
pub const DEFAULT_FIT_SCORE: u8 = 70;

/// Upper bound for fit scores; larger values are clamped.
pub const MAX_FIT_SCORE: u8 = 100;

const GENERAL_STUDIES: &str = "General Studies";

/// One tracked university application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRecord {
    pub university_id: String,
    pub status: ApplicationStatus,
    /// Derived from `requirements`; refreshed on every checklist change.
    pub progress: u8,
    pub fit_score: u8,
    pub requirements: RequirementChecklist,
    pub notes: String,
    pub added_date: DateTime<Utc>,
    pub deadline: Option<NaiveDate>,
}

impl ApplicationRecord {
    pub fn new(university_id: impl Into<String>, fit_score: u8, added_date: DateTime<Utc>) -> Self {
        let university_id = university_id.into();
        let requirements = RequirementChecklist::standard();
        Self {
            fit_score: bounded_fit_score(&university_id, fit_score),
            university_id,
            status: ApplicationStatus::NotStarted,
            progress: requirements.progress(),
            requirements,
            notes: String::new(),
            added_date,
            deadline: None,
        }
    }

    pub fn refresh_progress(&mut self) {
        self.progress = self.requirements.progress();
    }

    pub fn days_until_deadline(&self, today: NaiveDate) -> i64 {
        deadline::days_until(self.deadline, today)
    }
}

/// Persisted shape of an [`ApplicationRecord`].
///
/// The status is kept as text so either vocabulary can be written and read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredApplication {
    pub university_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub fit_score: u8,
    #[serde(default)]
    pub requirements: RequirementChecklist,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub added_date: Option<String>,
    #[serde(default, with = "deadline::lenient_date")]
    pub deadline: Option<NaiveDate>,
}

impl StoredApplication {
    pub fn from_record(record: &ApplicationRecord, vocabulary: StatusVocabulary) -> Self {
        Self {
            university_id: record.university_id.clone(),
            status: record.status.label(vocabulary).to_string(),
            progress: record.progress,
            fit_score: record.fit_score,
            requirements: record.requirements.clone(),
            notes: record.notes.clone(),
            added_date: Some(record.added_date.to_rfc3339()),
            deadline: record.deadline,
        }
    }

    /// Migrates a stored entry, mapping an unknown status to not-started and
    /// recomputing progress from the checklist.
    pub fn into_record(self, now: DateTime<Utc>) -> ApplicationRecord {
        let status = if self.status.trim().is_empty() {
            ApplicationStatus::NotStarted
        } else {
            ApplicationStatus::parse(&self.status).unwrap_or_else(|err| {
                warn!(university_id = %self.university_id, error = %err, "treating status as not started");
                ApplicationStatus::NotStarted
            })
        };

        let added_date = self
            .added_date
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .unwrap_or(now);

        let mut record = ApplicationRecord {
            fit_score: bounded_fit_score(&self.university_id, self.fit_score),
            university_id: self.university_id,
            status,
            progress: self.progress,
            requirements: self.requirements,
            notes: self.notes,
            added_date,
            deadline: self.deadline,
        };
        record.refresh_progress();
        record
    }
}

fn bounded_fit_score(university_id: &str, fit_score: u8) -> u8 {
    if fit_score > MAX_FIT_SCORE {
        warn!(university_id, fit_score, "fit score above the maximum; clamping");
        MAX_FIT_SCORE
    } else {
        fit_score
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub total: usize,
    pub in_progress: usize,
    pub submitted: usize,
}

/// A tracked application paired with its catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct TrackedUniversity<'a> {
    pub record: &'a ApplicationRecord,
    pub university: &'a University,
}

impl TrackedUniversity<'_> {
    pub fn field_of_study(&self) -> &str {
        field_of_study(self.university)
    }
}

/// First notable field, else first main field, else a generic label.
pub fn field_of_study(university: &University) -> &str {
    university
        .notable_fields
        .first()
        .or_else(|| university.main_fields.first())
        .map(String::as_str)
        .unwrap_or(GENERAL_STUDIES)
}
