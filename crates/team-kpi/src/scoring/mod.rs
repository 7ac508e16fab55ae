//! The KPI scoring core: pure, stateless numeric transforms.
//!
//! Raw measurements flow one direction: `(fact, goal, direction, weight,
//! threshold)` → per-metric percent and weighted contribution → per-employee
//! period total → multi-period mean and monetary equivalent. Every function
//! here is deterministic and side-effect-free, so callers may recompute or
//! cache results freely.

pub mod aggregate;
pub mod domain;
pub mod engine;

#[cfg(test)]
mod tests;

pub use aggregate::{
    aggregate_period, aggregate_weighted, rollup_periods, to_money, MultiPeriodKpi, PeriodScore,
    PeriodTotal,
};
pub use domain::{
    EmployeeRole, InvalidMetricInput, MetricCategory, MetricDirection, MetricInput, MetricScore,
};
pub use engine::{score_metric, score_percent, weighted_score};
