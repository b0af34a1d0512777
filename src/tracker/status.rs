use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which label set to use when storing or displaying a status.
///
/// Both vocabularies name the same lifecycle; the `simple` set only has its own
/// words for the stages it originally covered and borrows the detailed label
/// for the rest, so every status stays distinguishable in either vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVocabulary {
    Simple,
    #[default]
    Detailed,
}

impl FromStr for StatusVocabulary {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "detailed" => Ok(Self::Detailed),
            other => Err(other.to_string()),
        }
    }
}

/// Position of an application in its lifecycle, ordered from first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ApplicationStatus {
    #[default]
    NotStarted,
    Planning,
    Exploring,
    GatheringDocuments,
    Submitting,
    Submitted,
    InterviewScheduled,
    OfferReceived,
    NotAccepted,
}

struct StatusLabels {
    status: ApplicationStatus,
    simple: &'static str,
    detailed: &'static str,
    simple_name: &'static str,
    detailed_name: &'static str,
}

const STATUS_TABLE: [StatusLabels; 9] = [
    StatusLabels {
        status: ApplicationStatus::NotStarted,
        simple: "not-started",
        detailed: "not-started",
        simple_name: "Not Started",
        detailed_name: "Not Started",
    },
    StatusLabels {
        status: ApplicationStatus::Planning,
        simple: "researching",
        detailed: "planning-phase",
        simple_name: "Researching",
        detailed_name: "Planning Phase",
    },
    StatusLabels {
        status: ApplicationStatus::Exploring,
        simple: "preparing",
        detailed: "exploring-programs",
        simple_name: "Preparing",
        detailed_name: "Exploring Programs",
    },
    StatusLabels {
        status: ApplicationStatus::GatheringDocuments,
        simple: "gathering-documents",
        detailed: "gathering-documents",
        simple_name: "Gathering Documents",
        detailed_name: "Gathering Documents",
    },
    StatusLabels {
        status: ApplicationStatus::Submitting,
        simple: "in-progress",
        detailed: "submitting-application",
        simple_name: "In Progress",
        detailed_name: "Submitting Application",
    },
    StatusLabels {
        status: ApplicationStatus::Submitted,
        simple: "submitted",
        detailed: "application-submitted",
        simple_name: "Submitted",
        detailed_name: "Application Submitted",
    },
    StatusLabels {
        status: ApplicationStatus::InterviewScheduled,
        simple: "interview",
        detailed: "interview-scheduled",
        simple_name: "Interview",
        detailed_name: "Interview Scheduled",
    },
    StatusLabels {
        status: ApplicationStatus::OfferReceived,
        simple: "offer-received",
        detailed: "offer-received",
        simple_name: "Offer Received",
        detailed_name: "Offer Received",
    },
    StatusLabels {
        status: ApplicationStatus::NotAccepted,
        simple: "not-accepted",
        detailed: "not-accepted",
        simple_name: "Not Accepted",
        detailed_name: "Not Accepted",
    },
];

/// Number of steps shown in the detailed progress tracker.
pub const TOTAL_STEPS: u8 = 8;

/// Step number and display name for the progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub step: u8,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::NotStarted,
            Self::Planning,
            Self::Exploring,
            Self::GatheringDocuments,
            Self::Submitting,
            Self::Submitted,
            Self::InterviewScheduled,
            Self::OfferReceived,
            Self::NotAccepted,
        ]
    }

    fn labels(self) -> &'static StatusLabels {
        // The table is declared in `ordered()` order.
        &STATUS_TABLE[self as usize]
    }

    pub fn label(self, vocabulary: StatusVocabulary) -> &'static str {
        match vocabulary {
            StatusVocabulary::Simple => self.labels().simple,
            StatusVocabulary::Detailed => self.labels().detailed,
        }
    }

    pub fn display_name(self, vocabulary: StatusVocabulary) -> &'static str {
        match vocabulary {
            StatusVocabulary::Simple => self.labels().simple_name,
            StatusVocabulary::Detailed => self.labels().detailed_name,
        }
    }

    /// Accepts a label from either vocabulary.
    pub fn parse(value: &str) -> Result<Self, UnknownStatus> {
        let value = value.trim().to_ascii_lowercase();
        STATUS_TABLE
            .iter()
            .find(|entry| entry.simple == value || entry.detailed == value)
            .map(|entry| entry.status)
            .ok_or(UnknownStatus(value))
    }

    /// Step in the detailed eight-step tracker. Not-started reports as step one.
    pub fn step_info(self) -> StepInfo {
        let status = match self {
            Self::NotStarted => Self::Planning,
            other => other,
        };
        StepInfo {
            step: status as u8,
            name: status.labels().detailed_name,
        }
    }

    /// Statuses counted as actively in progress on the dashboard.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Planning
                | Self::Exploring
                | Self::GatheringDocuments
                | Self::Submitting
                | Self::InterviewScheduled
        )
    }

    pub const fn is_submitted(self) -> bool {
        matches!(self, Self::Submitted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::OfferReceived | Self::NotAccepted)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(StatusVocabulary::Detailed))
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label(StatusVocabulary::Detailed))
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
