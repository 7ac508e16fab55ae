use chrono::NaiveDate;

use super::domain::{Employee, EmployeeId, MetricConfig, MetricConfigId, ReportId, WeeklyReport};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for employees and their metric configurations, so the
/// service module can be exercised in isolation.
pub trait EmployeeRepository: Send + Sync {
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    /// Replaces the employee's scalar fields, leaving metrics untouched.
    fn update(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn remove(&self, id: &EmployeeId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    /// All employees ordered by their display order.
    fn list(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn replace_metrics(
        &self,
        id: &EmployeeId,
        metrics: Vec<MetricConfig>,
    ) -> Result<(), RepositoryError>;
}

/// Storage abstraction for weekly reports.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: WeeklyReport) -> Result<WeeklyReport, RepositoryError>;
    fn update(&self, report: WeeklyReport) -> Result<(), RepositoryError>;
    fn remove(&self, id: &ReportId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<WeeklyReport>, RepositoryError>;
    /// All reports, newest period first.
    fn list(&self) -> Result<Vec<WeeklyReport>, RepositoryError>;
    /// The report covering exactly this period, if one exists.
    fn find_by_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Option<WeeklyReport>, RepositoryError>;
    /// Reports whose inclusive period intersects the given range, oldest
    /// period first.
    fn overlapping(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<WeeklyReport>, RepositoryError>;
    /// Number of persisted entries referencing a metric configuration; guards
    /// metric deletion.
    fn entries_for_metric(&self, id: &MetricConfigId) -> Result<usize, RepositoryError>;
}
