use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::common::{fixed_now, mock_tracker, stored_applications, tracker, FlakyStore};
use crate::catalog::CatalogStore;
use crate::search::tests::university;
use crate::search::{DemoScorer, RateTable, SearchEngine};
use crate::storage::{
    MemoryStore, StateStore, APPLICATIONS_KEY, BOOKMARKS_KEY, SAVED_SCHOLARSHIPS_KEY,
};
use crate::tracker::{
    AddOutcome, ApplicationStatus, ApplicationTracker, RequirementKey, SaveOutcome,
    StatusVocabulary, TrackerError, DEFAULT_DEADLINE_DAYS, DEFAULT_FIT_SCORE, MAX_FIT_SCORE,
};

fn key(raw: &str) -> RequirementKey {
    raw.parse().expect("requirement key")
}

#[test]
fn add_tracks_with_pending_checklist_and_bookmarks() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker(Arc::clone(&store));

    assert_eq!(tracker.add("nus", Some(85)).expect("add"), AddOutcome::Added);

    let record = tracker.get("nus").expect("tracked");
    assert_eq!(record.status, ApplicationStatus::NotStarted);
    assert_eq!(record.progress, 0);
    assert_eq!(record.fit_score, 85);
    assert_eq!(record.requirements.total(), 9);
    assert_eq!(record.requirements.completed(), 0);
    assert_eq!(record.added_date, fixed_now());
    assert!(tracker.is_bookmarked("nus"));

    let persisted = store.snapshot();
    assert!(persisted.contains_key(APPLICATIONS_KEY));
    assert_eq!(persisted.get(BOOKMARKS_KEY).map(String::as_str), Some(r#"["nus"]"#));
}

#[test]
fn add_without_catalog_score_defaults_to_seventy() {
    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    tracker.add("mit", None).expect("add");
    assert_eq!(tracker.get("mit").map(|record| record.fit_score), Some(70));
}

#[test]
fn fit_scores_are_clamped_to_one_hundred() {
    let stored = r#"[{"universityId": "kth", "status": "researching", "fitScore": 180,
                      "requirements": {}, "notes": ""}]"#;
    let store = MemoryStore::new().with_entry(APPLICATIONS_KEY, stored);
    let mut tracker = tracker(Arc::new(store));
    assert_eq!(
        tracker.get("kth").map(|record| record.fit_score),
        Some(MAX_FIT_SCORE)
    );

    tracker.add("mit", Some(250)).expect("add");
    assert_eq!(tracker.get("mit").map(|record| record.fit_score), Some(100));
    tracker.add("nus", Some(100)).expect("add");
    assert_eq!(tracker.get("nus").map(|record| record.fit_score), Some(100));
}

#[test]
fn listed_add_copies_the_browse_score() {
    let catalog = CatalogStore::from_records(
        vec![university("nus", "Singapore", 8, 17_550.0, "SGD")],
        Vec::new(),
    );
    let mut rng = StdRng::seed_from_u64(11);
    let engine = SearchEngine::new(&catalog, &DemoScorer::default(), RateTable::standard(), &mut rng);
    let browsed = engine.fit_score("nus").expect("nus scored");

    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    tracker.add_listed("nus", &engine).expect("add nus");
    tracker.add_listed("kth", &engine).expect("add kth");

    assert_eq!(tracker.get("nus").map(|record| record.fit_score), Some(browsed));
    assert_eq!(
        tracker.get("kth").map(|record| record.fit_score),
        Some(DEFAULT_FIT_SCORE)
    );
}

#[test]
fn duplicate_add_leaves_state_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker(Arc::clone(&store));
    tracker.add("nus", Some(85)).expect("add");
    tracker
        .update_notes("nus", "Strong CS match")
        .expect("notes");
    tracker.toggle_requirement("nus", &key("gpa")).expect("toggle");

    let before = tracker.applications().to_vec();
    let persisted_before = store.snapshot();

    assert_eq!(
        tracker.add("nus", Some(10)).expect("duplicate add"),
        AddOutcome::AlreadyTracked
    );
    assert_eq!(tracker.applications(), before.as_slice());
    assert_eq!(store.snapshot(), persisted_before);
}

#[test]
fn toggling_twice_restores_checklist_and_progress() {
    let mut tracker = mock_tracker(Arc::new(MemoryStore::new()));
    let before = tracker.get("nus").cloned().expect("nus seeded");
    assert_eq!(before.progress, 56);

    assert!(tracker.toggle_requirement("nus", &key("cv")).expect("toggle on"));
    assert_eq!(tracker.get("nus").map(|record| record.progress), Some(67));

    assert!(!tracker.toggle_requirement("nus", &key("cv")).expect("toggle off"));
    assert_eq!(tracker.get("nus"), Some(&before));
}

#[test]
fn progress_rounds_completed_share() {
    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    tracker.add("ubc", None).expect("add");
    for item in ["gpa", "transcripts", "language", "essays", "recommendations"] {
        tracker
            .set_requirement("ubc", &key(item), true)
            .expect("complete requirement");
    }

    let record = tracker.get("ubc").expect("tracked");
    assert_eq!(record.requirements.completed(), 5);
    assert_eq!(record.progress, 56);
    assert_eq!(tracker.pending_requirements("ubc").expect("pending").len(), 4);
    assert_eq!(tracker.completed_requirements("ubc").expect("done").len(), 5);
}

#[test]
fn remove_drops_record_and_bookmark_only() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = mock_tracker(Arc::clone(&store));
    tracker.toggle_bookmark("mit").expect("bookmark mit");
    tracker.toggle_bookmark("nus").expect("bookmark nus");
    tracker.update_notes("toronto", "Waiting on decision").expect("persist");

    let others_before: Vec<_> = stored_applications(store.as_ref())
        .into_iter()
        .filter(|application| application.university_id != "mit")
        .collect();

    assert!(tracker.remove("mit").expect("remove"));

    assert!(!tracker.is_tracked("mit"));
    assert!(!tracker.is_bookmarked("mit"));
    assert!(tracker.is_bookmarked("nus"));
    assert_eq!(stored_applications(store.as_ref()), others_before);
    assert_eq!(
        store.snapshot().get(BOOKMARKS_KEY).map(String::as_str),
        Some(r#"["nus"]"#)
    );
}

#[test]
fn removing_an_untracked_id_is_a_no_op() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker(Arc::clone(&store));
    assert!(!tracker.remove("ghost").expect("remove"));
    assert!(store.snapshot().is_empty());
}

#[test]
fn malformed_persisted_state_loads_as_empty() {
    let store = MemoryStore::new()
        .with_entry(APPLICATIONS_KEY, "{\"universityId\": ")
        .with_entry(BOOKMARKS_KEY, "not json")
        .with_entry(SAVED_SCHOLARSHIPS_KEY, "[1, 2]");
    let tracker = tracker(Arc::new(store));

    assert!(tracker.applications().is_empty());
    assert!(tracker.bookmarks().is_empty());
    assert!(tracker.saved_scholarships().ids().is_empty());
}

#[test]
fn failed_write_rolls_back_every_mutation() {
    let store = Arc::new(FlakyStore::default());
    let mut tracker = tracker(Arc::clone(&store));
    tracker.add("nus", Some(85)).expect("add");
    let before = tracker.applications().to_vec();

    store.fail_writes(true);

    assert!(matches!(
        tracker.toggle_requirement("nus", &key("essays")),
        Err(TrackerError::Store(_))
    ));
    assert!(matches!(
        tracker.update_status("nus", ApplicationStatus::Submitted),
        Err(TrackerError::Store(_))
    ));
    assert!(matches!(tracker.add("mit", None), Err(TrackerError::Store(_))));
    assert!(matches!(tracker.remove("nus"), Err(TrackerError::Store(_))));
    assert!(matches!(tracker.toggle_bookmark("nus"), Err(TrackerError::Store(_))));

    assert_eq!(tracker.applications(), before.as_slice());
    assert!(!tracker.is_tracked("mit"));
    assert!(!tracker.is_bookmarked("mit"));
    assert!(tracker.is_bookmarked("nus"));

    store.fail_writes(false);
    assert!(tracker.toggle_requirement("nus", &key("essays")).expect("toggle"));
}

#[test]
fn status_is_written_in_the_configured_vocabulary() {
    let store = Arc::new(MemoryStore::new());
    let mut simple = ApplicationTracker::builder(Arc::clone(&store))
        .vocabulary(StatusVocabulary::Simple)
        .clock(fixed_now)
        .build();
    simple.add("nus", None).expect("add");
    simple
        .update_status("nus", ApplicationStatus::Submitting)
        .expect("status");

    assert_eq!(stored_applications(store.as_ref())[0].status, "in-progress");

    let detailed = ApplicationTracker::builder(Arc::clone(&store))
        .vocabulary(StatusVocabulary::Detailed)
        .build();
    assert_eq!(
        detailed.get("nus").map(|record| record.status),
        Some(ApplicationStatus::Submitting)
    );
}

#[test]
fn operations_on_untracked_ids_are_rejected() {
    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    assert!(matches!(
        tracker.toggle_requirement("ghost", &key("gpa")),
        Err(TrackerError::NotTracked(id)) if id == "ghost"
    ));
    assert!(matches!(
        tracker.days_until_deadline("ghost"),
        Err(TrackerError::NotTracked(_))
    ));
}

#[test]
fn unknown_requirement_is_reported() {
    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    tracker.add("nus", None).expect("add");
    let missing = RequirementKey::new(crate::tracker::RequirementCategory::Financial, "Visa Fee");
    assert!(matches!(
        tracker.toggle_requirement("nus", &missing),
        Err(TrackerError::UnknownRequirement(_))
    ));
}

#[test]
fn deadline_counts_from_clock_day() {
    let mut tracker = tracker(Arc::new(MemoryStore::new()));
    tracker.add("nus", None).expect("add");
    assert_eq!(
        tracker.days_until_deadline("nus").expect("days"),
        DEFAULT_DEADLINE_DAYS
    );

    tracker
        .set_deadline("nus", NaiveDate::from_ymd_opt(2025, 1, 20))
        .expect("deadline");
    assert_eq!(tracker.days_until_deadline("nus").expect("days"), 10);

    tracker
        .set_deadline("nus", NaiveDate::from_ymd_opt(2025, 1, 7))
        .expect("deadline");
    assert_eq!(tracker.days_until_deadline("nus").expect("days"), -3);
}

#[test]
fn stats_count_active_and_submitted() {
    let tracker = mock_tracker(Arc::new(MemoryStore::new()));
    let stats = tracker.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.in_progress, 3);
    assert_eq!(stats.submitted, 1);
}

#[test]
fn resolve_skips_universities_missing_from_catalog() {
    let tracker = mock_tracker(Arc::new(MemoryStore::new()));
    let mut nus = university("nus", "Singapore", 8, 17_550.0, "SGD");
    nus.notable_fields = vec!["Engineering".to_string()];
    let catalog = CatalogStore::from_records(
        vec![nus, university("mit", "USA", 1, 57_986.0, "USD")],
        Vec::new(),
    );

    let resolved = tracker.resolve(&catalog);
    let ids: Vec<_> = resolved
        .iter()
        .map(|tracked| tracked.record.university_id.as_str())
        .collect();
    assert_eq!(ids, ["nus", "mit"]);
    assert_eq!(resolved[0].field_of_study(), "Engineering");
    assert_eq!(resolved[1].field_of_study(), "Computer Science");
}

#[test]
fn saved_scholarships_persist_once() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker(Arc::clone(&store));

    assert_eq!(
        tracker.save_scholarship("chevening").expect("save"),
        SaveOutcome::Saved
    );
    assert_eq!(
        tracker.save_scholarship("chevening").expect("save again"),
        SaveOutcome::AlreadySaved
    );
    assert_eq!(
        store
            .get(SAVED_SCHOLARSHIPS_KEY)
            .expect("read")
            .as_deref(),
        Some(r#"["chevening"]"#)
    );

    let reloaded = super::common::tracker(store);
    assert!(reloaded.saved_scholarships().contains("chevening"));
}
