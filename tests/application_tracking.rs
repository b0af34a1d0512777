//! Tracker scenarios persisted through the JSON state file.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use leaply::catalog::{CatalogStore, DirectorySource};
use leaply::search::{DemoScorer, RateTable, SearchEngine};
use leaply::storage::{JsonFileStore, StateStore, APPLICATIONS_KEY};
use leaply::tracker::{
    AddOutcome, ApplicationStatus, ApplicationTracker, RequirementKey, SeedSource,
    StatusVocabulary,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0)
        .single()
        .expect("valid instant")
}

async fn bundled_catalog() -> CatalogStore {
    let mut catalog = CatalogStore::new();
    catalog
        .init(&DirectorySource::new(
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
        ))
        .await
        .expect("bundled catalog loads");
    catalog
}

#[tokio::test]
async fn catalog_seeded_tracker_survives_a_restart() {
    let catalog = bundled_catalog().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let state_path = dir.path().join("state.json");

    let mut tracker = ApplicationTracker::builder(Arc::new(JsonFileStore::new(&state_path)))
        .seed(SeedSource::Catalog(&catalog))
        .clock(fixed_now)
        .build();

    let seeded: Vec<_> = tracker
        .applications()
        .iter()
        .map(|record| record.university_id.as_str())
        .collect();
    assert_eq!(seeded, ["nus", "toronto"]);
    assert!(!state_path.exists(), "seeding does not write");

    let nus = tracker.get("nus").expect("nus seeded");
    assert_eq!(nus.status, ApplicationStatus::GatheringDocuments);
    assert_eq!(nus.progress, 33);
    assert_eq!(tracker.days_until_deadline("nus").expect("days"), 20);

    // Unparseable deadline on toronto falls back to the default window.
    assert_eq!(tracker.days_until_deadline("toronto").expect("days"), 60);
    assert_eq!(
        tracker.get("toronto").map(|record| record.status),
        Some(ApplicationStatus::Submitted)
    );

    let language = RequirementKey::legacy("language").expect("legacy key");
    assert!(tracker.toggle_requirement("nus", &language).expect("toggle"));
    assert_eq!(tracker.get("nus").map(|record| record.progress), Some(50));

    let mut rng = StdRng::seed_from_u64(3);
    let engine = SearchEngine::new(&catalog, &DemoScorer::default(), RateTable::standard(), &mut rng);
    let expected_fit = engine.fit_score("melbourne");
    assert!(expected_fit.is_some());
    assert_eq!(
        tracker
            .add("melbourne", expected_fit)
            .expect("add melbourne"),
        AddOutcome::Added
    );
    assert_eq!(
        tracker.add("melbourne", Some(1)).expect("duplicate"),
        AddOutcome::AlreadyTracked
    );

    let reopened = ApplicationTracker::builder(Arc::new(JsonFileStore::new(&state_path)))
        .clock(fixed_now)
        .build();
    assert_eq!(reopened.applications(), tracker.applications());
    assert!(reopened.is_bookmarked("melbourne"));
    assert_eq!(
        reopened.get("melbourne").map(|record| record.fit_score),
        expected_fit
    );

    let names: Vec<_> = reopened
        .resolve(&catalog)
        .into_iter()
        .map(|tracked| tracked.university.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "National University of Singapore",
            "University of Toronto",
            "University of Melbourne"
        ]
    );
}

#[tokio::test]
async fn simple_vocabulary_round_trips_through_the_state_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("state.json")));

    let mut tracker = ApplicationTracker::builder(Arc::clone(&store))
        .seed(SeedSource::Mock)
        .vocabulary(StatusVocabulary::Simple)
        .clock(fixed_now)
        .build();
    tracker
        .update_status("melbourne", ApplicationStatus::InterviewScheduled)
        .expect("status");
    assert!(tracker.remove("mit").expect("remove"));

    let raw = store
        .get(APPLICATIONS_KEY)
        .expect("read state")
        .expect("applications written");
    let stored: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let statuses: Vec<_> = stored
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| (entry["universityId"].as_str(), entry["status"].as_str()))
        .collect();
    assert_eq!(
        statuses,
        [
            (Some("nus"), Some("in-progress")),
            (Some("stanford"), Some("preparing")),
            (Some("toronto"), Some("submitted")),
            (Some("melbourne"), Some("interview")),
        ]
    );

    let detailed = ApplicationTracker::builder(store)
        .vocabulary(StatusVocabulary::Detailed)
        .clock(fixed_now)
        .build();
    assert_eq!(detailed.stats().total, 4);
    assert_eq!(
        detailed.get("melbourne").map(|record| record.status),
        Some(ApplicationStatus::InterviewScheduled)
    );
    assert_eq!(detailed.stats().in_progress, 3);
    assert_eq!(detailed.stats().submitted, 1);
}
