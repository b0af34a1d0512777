//! Application tracking: lifecycle status, requirement checklists, deadlines,
//! bookmarks, and saved scholarships backed by a [`StateStore`](crate::storage::StateStore).

pub mod bookmarks;
pub mod checklist;
pub mod deadline;
pub mod domain;
pub mod seed;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use bookmarks::{BookmarkSet, SaveOutcome, SavedScholarships};
pub use checklist::{
    ActionKind, Requirement, RequirementCategory, RequirementChecklist, RequirementKey,
    RequirementStatus, UnknownRequirement,
};
pub use deadline::{days_until, DEFAULT_DEADLINE_DAYS};
pub use domain::{
    field_of_study, ApplicationRecord, StoredApplication, TrackedUniversity, TrackerStats,
    DEFAULT_FIT_SCORE, MAX_FIT_SCORE,
};
pub use seed::{SeedKind, SeedSource};
pub use service::{AddOutcome, ApplicationTracker, Clock, TrackerBuilder, TrackerError};
pub use status::{ApplicationStatus, StatusVocabulary, StepInfo, UnknownStatus, TOTAL_STEPS};
