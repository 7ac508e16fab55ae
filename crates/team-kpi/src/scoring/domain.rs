use serde::{Deserialize, Serialize};

/// Whether a larger fact counts for or against the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// Higher fact is better (completed tasks, reviews).
    Positive,
    /// Lower fact is better (defects, returned tasks).
    Negative,
}

impl MetricDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Higher is better",
            Self::Negative => "Lower is better",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Speed,
    Quality,
    Management,
}

impl MetricCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Speed, Self::Quality, Self::Management]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Speed => "Delivery Speed",
            Self::Quality => "Delivery Quality",
            Self::Management => "Team Management",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Developer,
    Teamlead,
}

impl EmployeeRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Developer => "Developer",
            Self::Teamlead => "Team Lead",
        }
    }
}

/// One measurement against one configured metric.
///
/// `weight` is this metric's share of the employee's total KPI, a fraction in
/// `[0, 1]`. `threshold` is only meaningful for negative-direction metrics:
/// the maximum tolerated fact-as-percent-of-goal before the score starts
/// degrading; `None` behaves as `0` (any defect degrades the score).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricInput {
    pub fact: f64,
    pub goal: f64,
    pub direction: MetricDirection,
    pub weight: f64,
    pub threshold: Option<f64>,
}

/// Scored measurement, with percent and weighted contribution rounded to two
/// decimals for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub fact: f64,
    pub goal: f64,
    pub percent: f64,
    pub weighted_score: f64,
}

/// Raised when a measurement falls outside the documented input domain.
///
/// Documented edge cases (fact=0, goal=0, threshold at 0 or ≥100) are not
/// errors; they have defined results and never raise.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidMetricInput {
    #[error("fact must be a finite number >= 0, got {0}")]
    Fact(f64),
    #[error("goal must be a finite number >= 0, got {0}")]
    Goal(f64),
    #[error("weight must be within [0, 1], got {0}")]
    Weight(f64),
    #[error("threshold must be within [0, 100], got {0}")]
    Threshold(f64),
}

pub fn validate_weight(weight: f64) -> Result<(), InvalidMetricInput> {
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(InvalidMetricInput::Weight(weight));
    }
    Ok(())
}

pub fn validate_threshold(threshold: Option<f64>) -> Result<(), InvalidMetricInput> {
    if let Some(value) = threshold {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(InvalidMetricInput::Threshold(value));
        }
    }
    Ok(())
}
