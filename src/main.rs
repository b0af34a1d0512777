use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use leaply::catalog::{CatalogStore, DirectorySource, DEFAULT_FEATURED_LIMIT};
use leaply::config::AppConfig;
use leaply::error::AppError;
use leaply::search::{
    scoring::admission_factors, DemoScorer, FitScorer, RankingBand, RateTable,
    ScholarshipCriteria, SearchEngine, SortKey, StudentBackground, TuitionBand,
    UniversityCriteria, UserProfile,
};
use leaply::storage::JsonFileStore;
use leaply::telemetry;
use leaply::tracker::{
    AddOutcome, ApplicationStatus, ApplicationTracker, RequirementKey, SaveOutcome, SeedKind,
    SeedSource, TOTAL_STEPS,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "leaply",
    about = "Browse universities and scholarships and track application progress",
    version
)]
struct Cli {
    /// Override the directory holding universities.json and scholarships.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Override the tracker state file
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and sort the university catalog
    Universities(UniversityArgs),
    /// Filter the scholarship catalog
    Scholarships(ScholarshipArgs),
    /// List featured universities and scholarships
    Featured,
    /// Score one university against a student profile
    Score(ScoreArgs),
    /// Catalog and tracker statistics
    Stats,
    /// Manage tracked applications, bookmarks, and saved scholarships
    Applications {
        #[command(subcommand)]
        command: ApplicationCommand,
    },
}

#[derive(Args, Debug)]
struct UniversityArgs {
    /// Case-insensitive match on name, country, or field of study
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long = "country")]
    countries: Vec<String>,
    /// Ranking band: 1-10, 11-50, 51-100
    #[arg(long = "ranking")]
    ranking_bands: Vec<RankingBand>,
    /// Tuition band in USD: 0-10000, 10000-30000, 30000-50000, 50000+
    #[arg(long = "tuition")]
    tuition_bands: Vec<TuitionBand>,
    #[arg(long = "field")]
    fields: Vec<String>,
    #[arg(long)]
    scholarship_only: bool,
    /// fit, ranking, tuition-low, tuition-high, acceptance, name, country
    #[arg(long, default_value_t = SortKey::Fit)]
    sort: SortKey,
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct ScholarshipArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// Funding type such as Full or Partial
    #[arg(long = "funding")]
    funding_types: Vec<String>,
    #[arg(long = "degree")]
    degree_levels: Vec<String>,
    #[arg(long = "country")]
    countries: Vec<String>,
    /// Only scholarships with a deadline on or after this date (YYYY-MM-DD)
    #[arg(long)]
    deadline_after: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    university_id: String,
    #[arg(long)]
    gpa: Option<f64>,
    /// Annual budget in USD
    #[arg(long)]
    budget: Option<f64>,
    #[arg(long)]
    major: Option<String>,
    #[arg(long = "prefer")]
    preferred_countries: Vec<String>,
    #[arg(long)]
    english: Option<f64>,
}

impl ScoreArgs {
    fn profile(&self) -> Option<UserProfile> {
        let profile = UserProfile {
            gpa: self.gpa,
            budget: self.budget,
            intended_major: self.major.clone(),
            preferred_countries: self.preferred_countries.clone(),
            english_score: self.english,
        };
        (profile != UserProfile::default()).then_some(profile)
    }
}

#[derive(Subcommand, Debug)]
enum ApplicationCommand {
    /// Show tracked applications
    List,
    /// Start tracking a university
    Add { university_id: String },
    /// Stop tracking a university and drop its bookmark
    Remove { university_id: String },
    /// Flip a requirement, e.g. `essays` or `personal/Personal Statement`
    Toggle {
        university_id: String,
        requirement: RequirementKey,
    },
    /// Set the lifecycle status using either vocabulary
    Status {
        university_id: String,
        status: ApplicationStatus,
    },
    /// Show pending and completed requirements
    Requirements { university_id: String },
    /// Add or remove a bookmark
    Bookmark { university_id: String },
    /// Save a scholarship for later
    SaveScholarship { scholarship_id: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    if let Some(state) = cli.state {
        config.data.state_path = state;
    }
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Universities(args) => {
            let catalog = load_catalog(&config).await;
            list_universities(&catalog, args);
            Ok(())
        }
        Command::Scholarships(args) => {
            let catalog = load_catalog(&config).await;
            list_scholarships(&catalog, args);
            Ok(())
        }
        Command::Featured => {
            let catalog = load_catalog(&config).await;
            show_featured(&catalog);
            Ok(())
        }
        Command::Score(args) => {
            let catalog = load_catalog_strict(&config).await?;
            score_university(&config, &catalog, &args)
        }
        Command::Stats => {
            let catalog = load_catalog(&config).await;
            show_stats(&config, &catalog);
            Ok(())
        }
        Command::Applications { command } => {
            let catalog = load_catalog(&config).await;
            run_applications(&config, &catalog, command)
        }
    }
}

async fn load_catalog_strict(config: &AppConfig) -> Result<CatalogStore, AppError> {
    let mut catalog = CatalogStore::new();
    catalog
        .init(&DirectorySource::new(&config.data.data_dir))
        .await?;
    info!(
        universities = catalog.universities().len(),
        scholarships = catalog.scholarships().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// A failed load is already logged; browsing continues over an empty catalog.
async fn load_catalog(config: &AppConfig) -> CatalogStore {
    match load_catalog_strict(config).await {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(error = %err, "continuing with an empty catalog");
            CatalogStore::new()
        }
    }
}

fn list_universities(catalog: &CatalogStore, args: UniversityArgs) {
    let criteria = UniversityCriteria {
        search: args.search,
        countries: args.countries.into_iter().collect(),
        ranking_bands: args.ranking_bands.into_iter().collect(),
        tuition_bands: args.tuition_bands.into_iter().collect(),
        fields: args.fields.into_iter().collect(),
        scholarship_only: args.scholarship_only,
    };

    let mut rng = rand::thread_rng();
    let engine = SearchEngine::new(catalog, &DemoScorer::default(), RateTable::standard(), &mut rng);
    let results = engine.universities(&criteria, args.sort);

    if results.is_empty() {
        println!("No universities match the current filters.");
        return;
    }

    println!("{} universities (sorted by {})", results.len(), args.sort);
    for listing in results.iter().take(args.limit.unwrap_or(usize::MAX)) {
        let university = listing.university;
        let range = &university.tuition_range;
        println!(
            "- [{:>3}] #{:<4} {} ({}, {}) | acceptance {}% | tuition {} {}-{} | {}",
            listing.fit_score,
            university.global_ranking,
            university.name,
            university.city,
            university.country,
            university.acceptance_rate,
            range.currency,
            range.min,
            range.max,
            university.id
        );
    }
}

fn list_scholarships(catalog: &CatalogStore, args: ScholarshipArgs) {
    let criteria = ScholarshipCriteria {
        search: args.search,
        funding_types: args.funding_types.into_iter().collect(),
        degree_levels: args.degree_levels.into_iter().collect(),
        countries: args.countries.into_iter().collect(),
        deadline_after: args.deadline_after,
    };

    let matches = leaply::search::filter_scholarships(catalog.scholarships(), &criteria);
    if matches.is_empty() {
        println!("No scholarships match the current filters.");
        return;
    }

    println!("{} scholarships", matches.len());
    for scholarship in matches {
        let deadline = scholarship
            .deadline
            .map(|date| date.to_string())
            .unwrap_or_else(|| "rolling".to_string());
        println!(
            "- {} by {} ({}) | {}: {} | deadline {} | {}",
            scholarship.name,
            scholarship.provider,
            scholarship.country,
            scholarship.amount.kind,
            scholarship.amount.value,
            deadline,
            scholarship.id
        );
    }
}

fn show_featured(catalog: &CatalogStore) {
    println!("Featured universities");
    for university in catalog.featured_universities(DEFAULT_FEATURED_LIMIT) {
        println!("- {} ({})", university.name, university.country);
    }

    println!("\nFeatured scholarships");
    for scholarship in catalog.featured_scholarships(DEFAULT_FEATURED_LIMIT) {
        println!("- {} by {}", scholarship.name, scholarship.provider);
    }
}

fn score_university(
    config: &AppConfig,
    catalog: &CatalogStore,
    args: &ScoreArgs,
) -> Result<(), AppError> {
    let university = catalog.university(&args.university_id).ok_or_else(|| {
        AppError::Usage(format!("no university with id '{}'", args.university_id))
    })?;

    let scorer = FitScorer::new(config.scoring, RateTable::standard());
    let profile = args.profile();
    let outcome = scorer.score(university, profile.as_ref());

    println!("{}: fit score {}", university.name, outcome.score);
    for reason in &outcome.reasons {
        println!("- {reason}");
    }

    let background = StudentBackground {
        gpa: args.gpa.unwrap_or(StudentBackground::default().gpa),
        ..StudentBackground::default()
    };
    println!("\nAdmission factors");
    for factor in admission_factors(university, &background) {
        println!("- [{}] {}", factor.value, factor.name);
    }

    Ok(())
}

fn build_tracker(
    config: &AppConfig,
    catalog: &CatalogStore,
) -> ApplicationTracker<JsonFileStore> {
    let seed = match config.tracker.seed {
        SeedKind::Stored => SeedSource::Stored,
        SeedKind::Mock => SeedSource::Mock,
        SeedKind::Catalog => SeedSource::Catalog(catalog),
    };

    ApplicationTracker::builder(Arc::new(JsonFileStore::new(&config.data.state_path)))
        .seed(seed)
        .vocabulary(config.tracker.vocabulary)
        .build()
}

fn show_stats(config: &AppConfig, catalog: &CatalogStore) {
    let catalog_stats = catalog.statistics();
    println!("Catalog");
    println!("- universities: {}", catalog_stats.total_universities);
    println!("- scholarships: {}", catalog_stats.total_scholarships);
    println!("- countries: {}", catalog_stats.countries);
    println!("- regions: {}", catalog_stats.regions);
    println!(
        "- average acceptance rate: {}%",
        catalog_stats.average_acceptance_rate
    );

    let tracker = build_tracker(config, catalog);
    let stats = tracker.stats();
    println!("\nApplications");
    println!("- tracked: {}", stats.total);
    println!("- in progress: {}", stats.in_progress);
    println!("- submitted: {}", stats.submitted);
    println!("- bookmarked: {}", tracker.bookmarks().len());
    println!(
        "- saved scholarships: {}",
        tracker.saved_scholarships().ids().len()
    );
}

fn run_applications(
    config: &AppConfig,
    catalog: &CatalogStore,
    command: ApplicationCommand,
) -> Result<(), AppError> {
    let mut tracker = build_tracker(config, catalog);
    let vocabulary = tracker.vocabulary();

    match command {
        ApplicationCommand::List => {
            let resolved = tracker.resolve(catalog);
            if resolved.is_empty() {
                println!("No universities added yet.");
                return Ok(());
            }

            let today = tracker.today();
            for tracked in resolved {
                let record = tracked.record;
                let step = record.status.step_info();
                let days = record.days_until_deadline(today);
                let deadline = if days < 0 {
                    format!("overdue {} days", days.abs())
                } else {
                    format!("{days} days left")
                };
                println!(
                    "- {} [{}] {} | step {}/{}: {} | progress {}% | fit {} | {} | {}",
                    tracked.university.name,
                    record.university_id,
                    tracked.field_of_study(),
                    step.step,
                    TOTAL_STEPS,
                    record.status.display_name(vocabulary),
                    record.progress,
                    record.fit_score,
                    deadline,
                    if tracker.is_bookmarked(&record.university_id) {
                        "bookmarked"
                    } else {
                        "not bookmarked"
                    }
                );
            }
        }
        ApplicationCommand::Add { university_id } => {
            if catalog.university(&university_id).is_none() {
                warn!(university_id = %university_id, "adding a university that is not in the catalog");
            }
            let mut rng = rand::thread_rng();
            let engine = SearchEngine::new(catalog, &DemoScorer::default(), RateTable::standard(), &mut rng);
            match tracker.add_listed(&university_id, &engine)? {
                AddOutcome::Added => println!("Now tracking {university_id}."),
                AddOutcome::AlreadyTracked => {
                    println!("{university_id} is already in your applications.")
                }
            }
        }
        ApplicationCommand::Remove { university_id } => {
            if tracker.remove(&university_id)? {
                println!("Removed {university_id}.");
            } else {
                println!("{university_id} was not tracked.");
            }
        }
        ApplicationCommand::Toggle {
            university_id,
            requirement,
        } => {
            let completed = tracker.toggle_requirement(&university_id, &requirement)?;
            let progress = tracker
                .get(&university_id)
                .map(|record| record.progress)
                .unwrap_or_default();
            println!(
                "{requirement} is now {} ({progress}% complete).",
                if completed { "completed" } else { "pending" }
            );
        }
        ApplicationCommand::Status {
            university_id,
            status,
        } => {
            tracker.update_status(&university_id, status)?;
            println!(
                "{university_id} is now '{}'.",
                status.display_name(vocabulary)
            );
        }
        ApplicationCommand::Requirements { university_id } => {
            println!("To do");
            for (category, requirement) in tracker.pending_requirements(&university_id)? {
                println!(
                    "- [{}] {} ({}): {}",
                    requirement.action_kind().label(),
                    requirement.name,
                    category.display_name(),
                    requirement.detail.as_deref().unwrap_or("Pending")
                );
            }
            println!("\nDone");
            for (category, requirement) in tracker.completed_requirements(&university_id)? {
                println!(
                    "- [{}] {} ({}): {}",
                    requirement.action_kind().label(),
                    requirement.name,
                    category.display_name(),
                    requirement.detail.as_deref().unwrap_or("Completed")
                );
            }
        }
        ApplicationCommand::Bookmark { university_id } => {
            if tracker.toggle_bookmark(&university_id)? {
                println!("Bookmarked {university_id}.");
            } else {
                println!("Removed bookmark for {university_id}.");
            }
        }
        ApplicationCommand::SaveScholarship { scholarship_id } => {
            if catalog.scholarship(&scholarship_id).is_none() {
                warn!(scholarship_id = %scholarship_id, "saving a scholarship that is not in the catalog");
            }
            match tracker.save_scholarship(&scholarship_id)? {
                SaveOutcome::Saved => println!("Saved {scholarship_id}."),
                SaveOutcome::AlreadySaved => println!("{scholarship_id} is already saved."),
            }
        }
    }

    Ok(())
}
