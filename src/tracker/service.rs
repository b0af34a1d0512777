use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, warn};

use super::bookmarks::{BookmarkSet, SaveOutcome, SavedScholarships};
use super::checklist::{Requirement, RequirementCategory, RequirementKey, UnknownRequirement};
use super::domain::{
    ApplicationRecord, StoredApplication, TrackedUniversity, TrackerStats, DEFAULT_FIT_SCORE,
};
use super::seed::{seed_records, SeedSource};
use super::status::{ApplicationStatus, StatusVocabulary, UnknownStatus};
use crate::catalog::CatalogStore;
use crate::search::SearchEngine;
use crate::storage::{
    load_or_default, save_json, StateStore, StoreError, APPLICATIONS_KEY, BOOKMARKS_KEY,
    SAVED_SCHOLARSHIPS_KEY,
};

/// Source of the current instant, injectable for tests.
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyTracked,
}

/// Assembles an [`ApplicationTracker`] from a store and a seeding strategy.
pub struct TrackerBuilder<'a, S> {
    store: Arc<S>,
    seed: SeedSource<'a>,
    vocabulary: StatusVocabulary,
    clock: Clock,
}

impl<'a, S: StateStore> TrackerBuilder<'a, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            seed: SeedSource::Stored,
            vocabulary: StatusVocabulary::default(),
            clock: Utc::now,
        }
    }

    pub fn seed(mut self, seed: SeedSource<'a>) -> Self {
        self.seed = seed;
        self
    }

    pub fn vocabulary(mut self, vocabulary: StatusVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds the application list and loads bookmarks and saved scholarships.
    /// Nothing is written until the first mutation.
    pub fn build(self) -> ApplicationTracker<S> {
        let now = (self.clock)();
        let kind = self.seed.kind();
        let seeded = seed_records(self.seed, self.store.as_ref(), now);

        let mut seen = HashSet::new();
        let mut applications = Vec::with_capacity(seeded.len());
        for record in seeded {
            if seen.insert(record.university_id.clone()) {
                applications.push(record);
            } else {
                warn!(university_id = %record.university_id, "dropping duplicate tracked application");
            }
        }

        let bookmarks: BookmarkSet = load_or_default(self.store.as_ref(), BOOKMARKS_KEY);
        let saved_scholarships: SavedScholarships =
            load_or_default(self.store.as_ref(), SAVED_SCHOLARSHIPS_KEY);

        info!(
            seed = kind.label(),
            applications = applications.len(),
            bookmarks = bookmarks.len(),
            "application tracker ready"
        );

        ApplicationTracker {
            store: self.store,
            vocabulary: self.vocabulary,
            clock: self.clock,
            applications,
            bookmarks,
            saved_scholarships,
        }
    }
}

/// Owns the tracked applications, bookmarks, and saved scholarships, writing
/// each collection back to the store whenever it changes.
///
/// A failed write restores the in-memory state and returns the error.
pub struct ApplicationTracker<S> {
    store: Arc<S>,
    vocabulary: StatusVocabulary,
    clock: Clock,
    applications: Vec<ApplicationRecord>,
    bookmarks: BookmarkSet,
    saved_scholarships: SavedScholarships,
}

impl<S: StateStore> ApplicationTracker<S> {
    pub fn builder<'a>(store: Arc<S>) -> TrackerBuilder<'a, S> {
        TrackerBuilder::new(store)
    }

    pub fn vocabulary(&self) -> StatusVocabulary {
        self.vocabulary
    }

    pub fn applications(&self) -> &[ApplicationRecord] {
        &self.applications
    }

    pub fn get(&self, university_id: &str) -> Option<&ApplicationRecord> {
        self.applications
            .iter()
            .find(|record| record.university_id == university_id)
    }

    pub fn is_tracked(&self, university_id: &str) -> bool {
        self.get(university_id).is_some()
    }

    /// Starts tracking `university_id` and bookmarks it. Already-tracked ids
    /// are left untouched.
    pub fn add(
        &mut self,
        university_id: &str,
        fit_score: Option<u8>,
    ) -> Result<AddOutcome, TrackerError> {
        if self.is_tracked(university_id) {
            info!(university_id, "university is already tracked");
            return Ok(AddOutcome::AlreadyTracked);
        }

        let record = ApplicationRecord::new(
            university_id,
            fit_score.unwrap_or(DEFAULT_FIT_SCORE),
            (self.clock)(),
        );
        let previous_bookmarks = self.bookmarks.clone();
        self.applications.push(record);
        self.bookmarks.insert(university_id);

        if let Err(err) = self.persist_applications_and_bookmarks() {
            self.applications.pop();
            self.bookmarks = previous_bookmarks;
            self.restore_persisted();
            return Err(err);
        }

        info!(university_id, "tracking new application");
        Ok(AddOutcome::Added)
    }

    /// Adds `university_id` carrying the fit score it was browsed with.
    /// Ids the engine never scored fall back to the default score.
    pub fn add_listed(
        &mut self,
        university_id: &str,
        engine: &SearchEngine<'_>,
    ) -> Result<AddOutcome, TrackerError> {
        self.add(university_id, engine.fit_score(university_id))
    }

    /// Drops the application and its bookmark. Returns whether a record existed.
    pub fn remove(&mut self, university_id: &str) -> Result<bool, TrackerError> {
        let Some(index) = self.position(university_id) else {
            return Ok(false);
        };

        let previous_bookmarks = self.bookmarks.clone();
        let removed = self.applications.remove(index);
        self.bookmarks.remove(university_id);

        if let Err(err) = self.persist_applications_and_bookmarks() {
            self.applications.insert(index, removed);
            self.bookmarks = previous_bookmarks;
            self.restore_persisted();
            return Err(err);
        }

        info!(university_id, "stopped tracking application");
        Ok(true)
    }

    /// Flips one requirement and returns its new completion state.
    pub fn toggle_requirement(
        &mut self,
        university_id: &str,
        key: &RequirementKey,
    ) -> Result<bool, TrackerError> {
        self.update(university_id, |record| Ok(record.requirements.toggle(key)?))
    }

    pub fn set_requirement(
        &mut self,
        university_id: &str,
        key: &RequirementKey,
        completed: bool,
    ) -> Result<(), TrackerError> {
        self.update(university_id, |record| Ok(record.requirements.set(key, completed)?))
    }

    pub fn update_status(
        &mut self,
        university_id: &str,
        status: ApplicationStatus,
    ) -> Result<(), TrackerError> {
        self.update(university_id, |record| {
            record.status = status;
            Ok(())
        })
    }

    pub fn update_notes(
        &mut self,
        university_id: &str,
        notes: impl Into<String>,
    ) -> Result<(), TrackerError> {
        let notes = notes.into();
        self.update(university_id, move |record| {
            record.notes = notes;
            Ok(())
        })
    }

    pub fn set_deadline(
        &mut self,
        university_id: &str,
        deadline: Option<NaiveDate>,
    ) -> Result<(), TrackerError> {
        self.update(university_id, |record| {
            record.deadline = deadline;
            Ok(())
        })
    }

    pub fn pending_requirements(
        &self,
        university_id: &str,
    ) -> Result<Vec<(RequirementCategory, &Requirement)>, TrackerError> {
        Ok(self.require(university_id)?.requirements.pending_items())
    }

    pub fn completed_requirements(
        &self,
        university_id: &str,
    ) -> Result<Vec<(RequirementCategory, &Requirement)>, TrackerError> {
        Ok(self.require(university_id)?.requirements.completed_items())
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)().date_naive()
    }

    pub fn days_until_deadline(&self, university_id: &str) -> Result<i64, TrackerError> {
        Ok(self.require(university_id)?.days_until_deadline(self.today()))
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            total: self.applications.len(),
            in_progress: self
                .applications
                .iter()
                .filter(|record| record.status.is_active())
                .count(),
            submitted: self
                .applications
                .iter()
                .filter(|record| record.status.is_submitted())
                .count(),
        }
    }

    /// Pairs each application with its catalog entry, skipping ids the catalog lacks.
    pub fn resolve<'a>(&'a self, catalog: &'a CatalogStore) -> Vec<TrackedUniversity<'a>> {
        self.applications
            .iter()
            .filter_map(|record| match catalog.university(&record.university_id) {
                Some(university) => Some(TrackedUniversity { record, university }),
                None => {
                    warn!(university_id = %record.university_id, "tracked university missing from catalog");
                    None
                }
            })
            .collect()
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, university_id: &str) -> bool {
        self.bookmarks.contains(university_id)
    }

    /// Returns whether the id is bookmarked after the toggle.
    pub fn toggle_bookmark(&mut self, university_id: &str) -> Result<bool, TrackerError> {
        let bookmarked = self.bookmarks.toggle(university_id);
        if let Err(err) = save_json(self.store.as_ref(), BOOKMARKS_KEY, &self.bookmarks) {
            self.bookmarks.toggle(university_id);
            return Err(err.into());
        }
        Ok(bookmarked)
    }

    pub fn saved_scholarships(&self) -> &SavedScholarships {
        &self.saved_scholarships
    }

    pub fn save_scholarship(&mut self, scholarship_id: &str) -> Result<SaveOutcome, TrackerError> {
        let outcome = self.saved_scholarships.save(scholarship_id);
        if outcome == SaveOutcome::AlreadySaved {
            info!(scholarship_id, "scholarship already saved");
            return Ok(outcome);
        }

        if let Err(err) = save_json(
            self.store.as_ref(),
            SAVED_SCHOLARSHIPS_KEY,
            &self.saved_scholarships,
        ) {
            self.saved_scholarships.remove(scholarship_id);
            return Err(err.into());
        }
        Ok(outcome)
    }

    fn position(&self, university_id: &str) -> Option<usize> {
        self.applications
            .iter()
            .position(|record| record.university_id == university_id)
    }

    fn require(&self, university_id: &str) -> Result<&ApplicationRecord, TrackerError> {
        self.get(university_id)
            .ok_or_else(|| TrackerError::NotTracked(university_id.to_string()))
    }

    /// Applies `change` to a copy of the record, swaps it in, and persists.
    fn update<T>(
        &mut self,
        university_id: &str,
        change: impl FnOnce(&mut ApplicationRecord) -> Result<T, TrackerError>,
    ) -> Result<T, TrackerError> {
        let index = self
            .position(university_id)
            .ok_or_else(|| TrackerError::NotTracked(university_id.to_string()))?;

        let mut updated = self.applications[index].clone();
        let value = change(&mut updated)?;
        updated.refresh_progress();

        let previous = std::mem::replace(&mut self.applications[index], updated);
        if let Err(err) = self.persist_applications() {
            self.applications[index] = previous;
            return Err(err);
        }
        Ok(value)
    }

    fn persist_applications(&self) -> Result<(), TrackerError> {
        let stored: Vec<StoredApplication> = self
            .applications
            .iter()
            .map(|record| StoredApplication::from_record(record, self.vocabulary))
            .collect();
        save_json(self.store.as_ref(), APPLICATIONS_KEY, &stored)?;
        Ok(())
    }

    fn persist_applications_and_bookmarks(&self) -> Result<(), TrackerError> {
        self.persist_applications()?;
        save_json(self.store.as_ref(), BOOKMARKS_KEY, &self.bookmarks)?;
        Ok(())
    }

    /// Best-effort rewrite of the restored state after a partial save.
    fn restore_persisted(&self) {
        if let Err(err) = self.persist_applications_and_bookmarks() {
            error!(error = %err, "could not restore persisted tracker state");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("university '{0}' is not tracked")]
    NotTracked(String),
    #[error(transparent)]
    UnknownRequirement(#[from] UnknownRequirement),
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
    #[error("failed to persist tracker state: {0}")]
    Store(#[from] StoreError),
}
