use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Academic,
    TestScores,
    Personal,
    Financial,
}

impl RequirementCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Academic, Self::TestScores, Self::Personal, Self::Financial]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::TestScores => "test_scores",
            Self::Personal => "personal",
            Self::Financial => "financial",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::TestScores => "Test Scores",
            Self::Personal => "Personal",
            Self::Financial => "Financial",
        }
    }
}

impl fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequirementCategory {
    type Err = UnknownRequirement;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|category| category.label() == normalized)
            .ok_or_else(|| UnknownRequirement(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    #[default]
    Pending,
    Completed,
}

/// Kind of follow-up a requirement offers, derived from its action text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    View,
    Edit,
    Upload,
    Pay,
}

impl ActionKind {
    pub fn classify(action: Option<&str>) -> Self {
        let Some(action) = action else {
            return Self::View;
        };
        let action = action.to_ascii_lowercase();
        if action.contains("edit") {
            Self::Edit
        } else if action.contains("upload") {
            Self::Upload
        } else if action.contains("pay") {
            Self::Pay
        } else {
            Self::View
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Upload => "upload",
            Self::Pay => "pay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    #[serde(default)]
    pub status: RequirementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Requirement {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: RequirementStatus::Pending,
            detail: None,
            action: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RequirementStatus::Completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.status = if completed {
            RequirementStatus::Completed
        } else {
            RequirementStatus::Pending
        };
    }

    pub fn action_kind(&self) -> ActionKind {
        ActionKind::classify(self.action.as_deref())
    }
}

/// Keys of the older flat checklist and the categorized entry each one became.
const LEGACY_KEYS: [(&str, RequirementCategory, &str); 9] = [
    ("gpa", RequirementCategory::Academic, "GPA Requirements"),
    ("transcripts", RequirementCategory::Academic, "Official Transcripts"),
    ("language", RequirementCategory::TestScores, "Language Test"),
    ("sat", RequirementCategory::TestScores, "SAT/ACT Scores"),
    ("essays", RequirementCategory::Personal, "Personal Statement"),
    ("recommendations", RequirementCategory::Personal, "Recommendation Letters"),
    ("cv", RequirementCategory::Personal, "CV/Resume"),
    ("financial", RequirementCategory::Financial, "Financial Documents"),
    ("fee", RequirementCategory::Financial, "Application Fee"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown requirement '{0}'")]
pub struct UnknownRequirement(pub String);

/// Addresses one checklist entry by category and name.
///
/// Parses either a legacy flat key (`essays`) or `category/name`
/// (`personal/Personal Statement`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementKey {
    pub category: RequirementCategory,
    pub name: String,
}

impl RequirementKey {
    pub fn new(category: RequirementCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    pub fn legacy(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        LEGACY_KEYS
            .iter()
            .find(|(legacy, _, _)| *legacy == key)
            .map(|(_, category, name)| Self::new(*category, *name))
    }

    fn matches(&self, requirement: &Requirement) -> bool {
        requirement.name.eq_ignore_ascii_case(self.name.trim())
    }
}

impl FromStr for RequirementKey {
    type Err = UnknownRequirement;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(key) = Self::legacy(value) {
            return Ok(key);
        }

        let (category, name) = value
            .split_once('/')
            .ok_or_else(|| UnknownRequirement(value.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(UnknownRequirement(value.to_string()));
        }

        Ok(Self::new(category.parse()?, name))
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// Per-category requirement lists for one application.
///
/// Deserializes from the categorized shape or from the legacy flat map of
/// booleans, which is migrated on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ChecklistRepr")]
pub struct RequirementChecklist {
    pub academic: Vec<Requirement>,
    pub test_scores: Vec<Requirement>,
    pub personal: Vec<Requirement>,
    pub financial: Vec<Requirement>,
}

impl RequirementChecklist {
    /// The nine standard requirements, all pending.
    pub fn standard() -> Self {
        Self::standard_with_completed(&[])
    }

    /// The standard requirements with the named legacy keys already completed.
    /// Keys outside the standard set are ignored.
    pub fn standard_with_completed(completed: &[&str]) -> Self {
        let mut checklist = Self::default();
        for (key, category, name) in LEGACY_KEYS {
            let mut requirement = Requirement::pending(name);
            requirement.set_completed(completed.contains(&key));
            checklist.category_mut(category).push(requirement);
        }
        checklist
    }

    pub fn category(&self, category: RequirementCategory) -> &[Requirement] {
        match category {
            RequirementCategory::Academic => &self.academic,
            RequirementCategory::TestScores => &self.test_scores,
            RequirementCategory::Personal => &self.personal,
            RequirementCategory::Financial => &self.financial,
        }
    }

    fn category_mut(&mut self, category: RequirementCategory) -> &mut Vec<Requirement> {
        match category {
            RequirementCategory::Academic => &mut self.academic,
            RequirementCategory::TestScores => &mut self.test_scores,
            RequirementCategory::Personal => &mut self.personal,
            RequirementCategory::Financial => &mut self.financial,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RequirementCategory, &Requirement)> + '_ {
        RequirementCategory::ordered().into_iter().flat_map(move |category| {
            self.category(category)
                .iter()
                .map(move |requirement| (category, requirement))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        RequirementCategory::ordered()
            .into_iter()
            .map(|category| self.category(category).len())
            .sum()
    }

    pub fn completed(&self) -> usize {
        self.iter()
            .filter(|(_, requirement)| requirement.is_completed())
            .count()
    }

    /// `round(100 * completed / total)`, or 0 for an empty checklist.
    pub fn progress(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let ratio = self.completed() as f64 * 100.0 / total as f64;
        ratio.round().clamp(0.0, 100.0) as u8
    }

    pub fn get(&self, key: &RequirementKey) -> Option<&Requirement> {
        self.category(key.category)
            .iter()
            .find(|requirement| key.matches(requirement))
    }

    fn get_mut(&mut self, key: &RequirementKey) -> Option<&mut Requirement> {
        self.category_mut(key.category)
            .iter_mut()
            .find(|requirement| key.matches(requirement))
    }

    /// Flips completion and returns the new state.
    pub fn toggle(&mut self, key: &RequirementKey) -> Result<bool, UnknownRequirement> {
        let requirement = self
            .get_mut(key)
            .ok_or_else(|| UnknownRequirement(key.to_string()))?;
        let completed = !requirement.is_completed();
        requirement.set_completed(completed);
        Ok(completed)
    }

    pub fn set(&mut self, key: &RequirementKey, completed: bool) -> Result<(), UnknownRequirement> {
        self.get_mut(key)
            .ok_or_else(|| UnknownRequirement(key.to_string()))?
            .set_completed(completed);
        Ok(())
    }

    pub fn pending_items(&self) -> Vec<(RequirementCategory, &Requirement)> {
        self.iter()
            .filter(|(_, requirement)| !requirement.is_completed())
            .collect()
    }

    pub fn completed_items(&self) -> Vec<(RequirementCategory, &Requirement)> {
        self.iter()
            .filter(|(_, requirement)| requirement.is_completed())
            .collect()
    }

    fn from_legacy(flags: BTreeMap<String, bool>) -> Self {
        let mut checklist = Self::default();
        for (key, category, name) in LEGACY_KEYS {
            if let Some(&completed) = flags.get(key) {
                let mut requirement = Requirement::pending(name);
                requirement.set_completed(completed);
                checklist.category_mut(category).push(requirement);
            }
        }

        for key in flags.keys() {
            if RequirementKey::legacy(key).is_none() {
                warn!(key = %key, "dropping unrecognized legacy requirement");
            }
        }

        checklist
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChecklistRepr {
    Categorized(CategorizedChecklist),
    Flat(BTreeMap<String, bool>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CategorizedChecklist {
    #[serde(default)]
    academic: Vec<Requirement>,
    #[serde(default)]
    test_scores: Vec<Requirement>,
    #[serde(default)]
    personal: Vec<Requirement>,
    #[serde(default)]
    financial: Vec<Requirement>,
}

impl From<ChecklistRepr> for RequirementChecklist {
    fn from(repr: ChecklistRepr) -> Self {
        match repr {
            ChecklistRepr::Categorized(lists) => Self {
                academic: lists.academic,
                test_scores: lists.test_scores,
                personal: lists.personal,
                financial: lists.financial,
            },
            ChecklistRepr::Flat(flags) => Self::from_legacy(flags),
        }
    }
}
