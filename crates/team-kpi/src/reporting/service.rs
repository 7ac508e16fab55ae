use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use tracing::warn;

use super::dates::MonthKey;
use super::domain::{
    Employee, EmployeeId, EmployeeMonthlySummary, EmployeePeriodKpi, EmployeeUpdate, EntryDraft,
    MetricConfig, MetricConfigId, MetricDraft, MonthlySummary, NewEmployee, ReportEntry, ReportId,
    ReportView, WeeklyKpi, WeeklyReport,
};
use super::export::{self, ExportError};
use super::repository::{EmployeeRepository, ReportRepository, RepositoryError};
use crate::scoring::domain::{validate_threshold, validate_weight};
use crate::scoring::{
    aggregate_weighted, rollup_periods, score_metric, to_money, InvalidMetricInput, MetricInput,
    PeriodScore,
};

/// Service composing the employee/report repositories with the scoring core.
pub struct KpiReportService<E, R> {
    employees: Arc<E>,
    reports: Arc<R>,
}

static EMPLOYEE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static METRIC_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_employee_id() -> EmployeeId {
    let id = EMPLOYEE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EmployeeId(format!("emp-{id:04}"))
}

fn next_metric_id() -> MetricConfigId {
    let id = METRIC_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MetricConfigId(format!("metric-{id:06}"))
}

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("report-{id:06}"))
}

impl<E, R> KpiReportService<E, R>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    pub fn new(employees: Arc<E>, reports: Arc<R>) -> Self {
        Self { employees, reports }
    }

    pub fn create_employee(&self, new: NewEmployee) -> Result<Employee, ServiceError> {
        let employee = Employee {
            id: next_employee_id(),
            name: new.name,
            role: new.role,
            kpi_budget: new.kpi_budget,
            order: new.order.unwrap_or(0),
            metrics: Vec::new(),
        };
        Ok(self.employees.insert(employee)?)
    }

    pub fn list_employees(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.employees.list()?)
    }

    pub fn employee(&self, id: &EmployeeId) -> Result<Employee, ServiceError> {
        self.employees
            .fetch(id)?
            .ok_or_else(|| ServiceError::UnknownEmployee(id.0.clone()))
    }

    pub fn update_employee(
        &self,
        id: &EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, ServiceError> {
        let current = self.employee(id)?;
        let employee = Employee {
            id: current.id,
            name: update.name,
            role: update.role,
            kpi_budget: update.kpi_budget,
            order: update.order,
            metrics: current.metrics,
        };
        Ok(self.employees.update(employee)?)
    }

    pub fn remove_employee(&self, id: &EmployeeId) -> Result<(), ServiceError> {
        match self.employees.remove(id) {
            Err(RepositoryError::NotFound) => Err(ServiceError::UnknownEmployee(id.0.clone())),
            other => Ok(other?),
        }
    }

    pub fn employee_metrics(&self, id: &EmployeeId) -> Result<Vec<MetricConfig>, ServiceError> {
        Ok(self.employee(id)?.metrics)
    }

    /// Replaces an employee's metric configuration with the incoming drafts.
    ///
    /// Existing metrics missing from the drafts are deleted unless historical
    /// report entries still reference them, in which case they stay on the
    /// books. Returns the incoming configurations with ids assigned.
    pub fn replace_metrics(
        &self,
        id: &EmployeeId,
        drafts: Vec<MetricDraft>,
    ) -> Result<Vec<MetricConfig>, ServiceError> {
        let employee = self.employee(id)?;

        for draft in &drafts {
            validate_weight(draft.weight)?;
            validate_threshold(draft.threshold)?;
        }

        // Weights summing to 1.0 is a configuration convention, not a rule the
        // scoring math relies on; surface drift without rejecting it.
        if !drafts.is_empty() {
            let weight_sum: f64 = drafts.iter().map(|draft| draft.weight).sum();
            if (weight_sum - 1.0).abs() > 1e-9 {
                warn!(employee = %id.0, weight_sum, "metric weights do not sum to 1.0");
            }
        }

        let existing: HashMap<MetricConfigId, MetricConfig> = employee
            .metrics
            .into_iter()
            .map(|metric| (metric.id.clone(), metric))
            .collect();
        let incoming_ids: HashSet<MetricConfigId> =
            drafts.iter().filter_map(|draft| draft.id.clone()).collect();

        let mut result = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let config_id = match draft.id {
                Some(ref draft_id) if existing.contains_key(draft_id) => draft_id.clone(),
                _ => next_metric_id(),
            };
            result.push(MetricConfig {
                id: config_id,
                employee_id: id.clone(),
                name: draft.name,
                category: draft.category,
                direction: draft.direction,
                weight: draft.weight,
                threshold: draft.threshold,
                order: draft.order,
            });
        }

        let mut stored = result.clone();
        for (config_id, config) in existing {
            if !incoming_ids.contains(&config_id) && self.reports.entries_for_metric(&config_id)? > 0
            {
                stored.push(config);
            }
        }

        self.employees.replace_metrics(id, stored)?;
        Ok(result)
    }

    /// Scores the submitted measurements and persists them as a new weekly
    /// report. Exactly one report may exist per period.
    pub fn create_report(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
        entries: Vec<EntryDraft>,
    ) -> Result<ReportView, ServiceError> {
        if period_start > period_end {
            return Err(ServiceError::InvertedPeriod {
                start: period_start,
                end: period_end,
            });
        }
        if self
            .reports
            .find_by_period(period_start, period_end)?
            .is_some()
        {
            return Err(ServiceError::DuplicatePeriod {
                start: period_start,
                end: period_end,
            });
        }

        let employees = self.employees.list()?;
        let scored = self.score_entries(&employees, entries)?;
        let report = self.reports.insert(WeeklyReport {
            id: next_report_id(),
            period_start,
            period_end,
            entries: scored,
        })?;

        Ok(build_view(report, &employees))
    }

    /// Re-scores and replaces a report's entries, keeping its period.
    pub fn update_report(
        &self,
        id: &ReportId,
        entries: Vec<EntryDraft>,
    ) -> Result<ReportView, ServiceError> {
        let mut report = self
            .reports
            .fetch(id)?
            .ok_or_else(|| ServiceError::UnknownReport(id.0.clone()))?;

        let employees = self.employees.list()?;
        report.entries = self.score_entries(&employees, entries)?;
        self.reports.update(report.clone())?;

        Ok(build_view(report, &employees))
    }

    pub fn report(&self, id: &ReportId) -> Result<ReportView, ServiceError> {
        let report = self
            .reports
            .fetch(id)?
            .ok_or_else(|| ServiceError::UnknownReport(id.0.clone()))?;
        let employees = self.employees.list()?;
        Ok(build_view(report, &employees))
    }

    pub fn list_reports(&self) -> Result<Vec<WeeklyReport>, ServiceError> {
        Ok(self.reports.list()?)
    }

    pub fn remove_report(&self, id: &ReportId) -> Result<(), ServiceError> {
        match self.reports.remove(id) {
            Err(RepositoryError::NotFound) => Err(ServiceError::UnknownReport(id.0.clone())),
            other => Ok(other?),
        }
    }

    /// Monthly rollup: weekly KPIs per employee for reports intersecting the
    /// month, their unweighted mean, and the monetary equivalent against the
    /// employee's budget. Weeks without entries for an employee are excluded
    /// from both numerator and denominator.
    pub fn monthly_summary(&self, month: MonthKey) -> Result<MonthlySummary, ServiceError> {
        let (month_start, month_end) = month.range();
        let reports = self.reports.overlapping(month_start, month_end)?;
        let employees = self.employees.list()?;

        let summary = employees
            .into_iter()
            .map(|employee| {
                let weekly: Vec<WeeklyKpi> = reports
                    .iter()
                    .filter_map(|report| {
                        let total = aggregate_weighted(
                            report
                                .entries
                                .iter()
                                .filter(|entry| entry.employee_id == employee.id)
                                .map(|entry| entry.weighted_score),
                        );
                        total.has_data.then(|| WeeklyKpi {
                            report_id: report.id.clone(),
                            period_start: report.period_start,
                            period_end: report.period_end,
                            kpi: total.total_percent,
                        })
                    })
                    .collect();

                let period_scores: Vec<PeriodScore> = weekly
                    .iter()
                    .map(|week| PeriodScore {
                        period_start: week.period_start,
                        period_end: week.period_end,
                        total_percent: week.kpi,
                    })
                    .collect();
                let rollup = rollup_periods(&period_scores, month_start, month_end);
                let money_kpi = to_money(rollup.mean_percent, employee.kpi_budget);

                EmployeeMonthlySummary {
                    employee,
                    weekly,
                    monthly_kpi: rollup.mean_percent,
                    money_kpi,
                    weeks_count: rollup.periods_count,
                }
            })
            .collect();

        Ok(MonthlySummary {
            month,
            reports_count: reports.len(),
            summary,
        })
    }

    pub fn monthly_summary_csv(&self, month: MonthKey) -> Result<String, ServiceError> {
        let summary = self.monthly_summary(month)?;
        Ok(export::monthly_csv_string(&summary)?)
    }

    fn score_entries(
        &self,
        employees: &[Employee],
        drafts: Vec<EntryDraft>,
    ) -> Result<Vec<ReportEntry>, ServiceError> {
        let metric_map: HashMap<&MetricConfigId, &MetricConfig> = employees
            .iter()
            .flat_map(|employee| employee.metrics.iter())
            .map(|metric| (&metric.id, metric))
            .collect();

        let mut scored = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let Some(config) = metric_map.get(&draft.metric_config_id) else {
                warn!(
                    metric = %draft.metric_config_id.0,
                    "dropping entry for unknown metric configuration"
                );
                continue;
            };

            let score = score_metric(&MetricInput {
                fact: draft.fact,
                goal: draft.goal,
                direction: config.direction,
                weight: config.weight,
                threshold: config.threshold,
            })?;

            scored.push(ReportEntry {
                employee_id: draft.employee_id,
                metric_config_id: draft.metric_config_id,
                fact: score.fact,
                goal: score.goal,
                percent: score.percent,
                weighted_score: score.weighted_score,
            });
        }

        Ok(scored)
    }
}

fn build_view(report: WeeklyReport, employees: &[Employee]) -> ReportView {
    let totals = employees
        .iter()
        .map(|employee| {
            let total = aggregate_weighted(
                report
                    .entries
                    .iter()
                    .filter(|entry| entry.employee_id == employee.id)
                    .map(|entry| entry.weighted_score),
            );
            EmployeePeriodKpi {
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                total_percent: total.total_percent,
                has_data: total.has_data,
            }
        })
        .collect();

    ReportView { report, totals }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    InvalidMetric(#[from] InvalidMetricInput),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("employee {0} not found")]
    UnknownEmployee(String),
    #[error("report {0} not found")]
    UnknownReport(String),
    #[error("a report already exists for {start}..{end}")]
    DuplicatePeriod { start: NaiveDate, end: NaiveDate },
    #[error("period start {start} is after period end {end}")]
    InvertedPeriod { start: NaiveDate, end: NaiveDate },
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidMetric(_) | ServiceError::InvertedPeriod { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::UnknownEmployee(_) | ServiceError::UnknownReport(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::DuplicatePeriod { .. } => StatusCode::CONFLICT,
            ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ServiceError::Repository(RepositoryError::Unavailable(_))
            | ServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
