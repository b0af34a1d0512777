use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracker::RequirementChecklist;

/// Annual tuition bounds in the university's local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuitionRange {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A university as published in the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(alias = "city_or_state", default)]
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub description: String,
    pub global_ranking: u32,
    pub acceptance_rate: f64,
    pub tuition_range: TuitionRange,
    pub required_gpa: f64,
    #[serde(default)]
    pub main_fields: Vec<String>,
    #[serde(default)]
    pub notable_fields: Vec<String>,
    #[serde(default)]
    pub degree_levels: Vec<String>,
    #[serde(default)]
    pub scholarships: Vec<String>,
    #[serde(default)]
    pub international_student_ratio: f64,
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, rename = "onTrack", alias = "on_track")]
    pub on_track: bool,
    #[serde(default)]
    pub application_tracking: Option<ApplicationTracking>,
}

impl University {
    pub fn offers_scholarships(&self) -> bool {
        !self.scholarships.is_empty()
    }
}

/// Tracking snapshot embedded in catalog entries flagged as on track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationTracking {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default, rename = "fitScore", alias = "fit_score")]
    pub fit_score: Option<u8>,
    #[serde(default, with = "crate::tracker::deadline::lenient_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub requirements: RequirementChecklist,
}

/// Funding offered by a scholarship, e.g. `{"type": "Full", "value": "Tuition + stipend"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipAmount {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub country: String,
    pub amount: ScholarshipAmount,
    #[serde(default)]
    pub degree_levels: Vec<String>,
    #[serde(default)]
    pub field_of_study: Vec<String>,
    #[serde(default, with = "crate::tracker::deadline::lenient_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub featured: bool,
}

/// Top-level document shape of `universities.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct UniversitiesDocument {
    pub universities: Vec<University>,
}

/// Top-level document shape of `scholarships.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct ScholarshipsDocument {
    pub scholarships: Vec<Scholarship>,
}

/// Aggregate figures describing the loaded catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatistics {
    pub total_universities: usize,
    pub total_scholarships: usize,
    pub countries: usize,
    pub regions: usize,
    pub average_acceptance_rate: f64,
}
