use crate::scoring::{EmployeeRole, MetricCategory, MetricDirection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::MonthKey;

/// Identifier wrapper for employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Identifier wrapper for configured metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricConfigId(pub String);

/// Identifier wrapper for weekly reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// A configured metric for one employee. The weight is this metric's share of
/// the employee's total KPI; weights across an employee's active metrics are
/// expected to sum to 1.0, but that is a configuration-time concern; the
/// scoring math treats weight purely as a multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub id: MetricConfigId,
    pub employee_id: EmployeeId,
    pub name: String,
    pub category: MetricCategory,
    pub direction: MetricDirection,
    pub weight: f64,
    pub threshold: Option<f64>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: EmployeeRole,
    pub kpi_budget: Option<f64>,
    pub order: u32,
    pub metrics: Vec<MetricConfig>,
}

/// Payload for creating an employee.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub role: EmployeeRole,
    #[serde(default)]
    pub kpi_budget: Option<f64>,
    #[serde(default)]
    pub order: Option<u32>,
}

/// Full-replace payload for updating an employee's scalar fields. Metric
/// configurations are managed separately via [`MetricDraft`] replacement.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmployeeUpdate {
    pub name: String,
    pub role: EmployeeRole,
    #[serde(default)]
    pub kpi_budget: Option<f64>,
    pub order: u32,
}

/// Incoming metric configuration; `id` is present when editing an existing
/// metric and absent for a new one.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricDraft {
    #[serde(default)]
    pub id: Option<MetricConfigId>,
    pub name: String,
    pub category: MetricCategory,
    pub direction: MetricDirection,
    pub weight: f64,
    #[serde(default)]
    pub threshold: Option<f64>,
    pub order: u32,
}

/// Raw fact/goal measurement submitted for one employee and metric.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryDraft {
    pub employee_id: EmployeeId,
    pub metric_config_id: MetricConfigId,
    pub fact: f64,
    pub goal: f64,
}

/// A scored measurement as persisted inside a weekly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub employee_id: EmployeeId,
    pub metric_config_id: MetricConfigId,
    pub fact: f64,
    pub goal: f64,
    pub percent: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub id: ReportId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub entries: Vec<ReportEntry>,
}

/// Per-employee KPI for one report, with the no-data flag callers use to
/// render a dash instead of a zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePeriodKpi {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub total_percent: f64,
    pub has_data: bool,
}

/// A weekly report joined with per-employee totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub report: WeeklyReport,
    pub totals: Vec<EmployeePeriodKpi>,
}

/// One week's KPI inside a monthly summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyKpi {
    pub report_id: ReportId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kpi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeMonthlySummary {
    pub employee: Employee,
    pub weekly: Vec<WeeklyKpi>,
    pub monthly_kpi: f64,
    pub money_kpi: Option<i64>,
    pub weeks_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub reports_count: usize,
    pub summary: Vec<EmployeeMonthlySummary>,
}
