//! Plumbing around the scoring core: employees, metric configurations, weekly
//! reports, monthly summaries, and the HTTP surface exposing them. Storage is
//! abstracted behind repository traits so the service can run against any
//! backend.

pub mod dates;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

pub use dates::{week_range, MonthKey};
pub use domain::{
    Employee, EmployeeId, EmployeeMonthlySummary, EmployeePeriodKpi, EmployeeUpdate, EntryDraft,
    MetricConfig, MetricConfigId, MetricDraft, MonthlySummary, NewEmployee, ReportEntry, ReportId,
    ReportView, WeeklyKpi, WeeklyReport,
};
pub use repository::{EmployeeRepository, ReportRepository, RepositoryError};
pub use router::report_router;
pub use service::{KpiReportService, ServiceError};
