//! Weighted KPI scoring and reporting for a small engineering team.
//!
//! The [`scoring`] module is the deterministic core: it turns fact/goal
//! measurements into percentages, weighted contributions, period totals, and
//! monetary equivalents. The [`reporting`] module is the plumbing around it:
//! employees, metric configurations, weekly reports, monthly summaries, and
//! the HTTP router exposing them.

pub mod config;
pub mod error;
pub mod reporting;
pub mod scoring;
pub mod telemetry;
