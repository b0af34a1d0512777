use serde::{Deserialize, Serialize};

/// Points available per fit factor. The defaults sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitWeights {
    pub gpa: f64,
    pub budget: f64,
    pub field: f64,
    pub location: f64,
    pub language: f64,
    pub acceptance: f64,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            gpa: 25.0,
            budget: 20.0,
            field: 20.0,
            location: 15.0,
            language: 10.0,
            acceptance: 10.0,
        }
    }
}

impl FitWeights {
    pub fn total(&self) -> f64 {
        self.gpa + self.budget + self.field + self.location + self.language + self.acceptance
    }
}

/// Parameters of the browsing scorer used when no profile exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoScoring {
    pub base: i32,
    /// Jitter is drawn uniformly from `-jitter..jitter`.
    pub jitter: i32,
    pub floor: u8,
    pub ceiling: u8,
}

impl Default for DemoScoring {
    fn default() -> Self {
        Self {
            base: 70,
            jitter: 5,
            floor: 50,
            ceiling: 100,
        }
    }
}
