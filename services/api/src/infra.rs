use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use team_kpi::reporting::repository::{EmployeeRepository, ReportRepository, RepositoryError};
use team_kpi::reporting::{
    Employee, EmployeeId, KpiReportService, MetricConfig, MetricConfigId, MetricDraft, MonthKey,
    NewEmployee, ReportId, ServiceError, WeeklyReport,
};
use team_kpi::scoring::{EmployeeRole, MetricCategory, MetricDirection};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeRepository {
    records: Arc<Mutex<HashMap<EmployeeId, Employee>>>,
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = self.records.lock().expect("employee mutex poisoned");
        if guard.contains_key(&employee.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn update(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = self.records.lock().expect("employee mutex poisoned");
        match guard.get_mut(&employee.id) {
            Some(existing) => {
                let metrics = existing.metrics.clone();
                *existing = Employee { metrics, ..employee };
                Ok(existing.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("employee mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.records.lock().expect("employee mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.records.lock().expect("employee mutex poisoned");
        let mut employees: Vec<Employee> = guard.values().cloned().collect();
        employees.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(employees)
    }

    fn replace_metrics(
        &self,
        id: &EmployeeId,
        metrics: Vec<MetricConfig>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("employee mutex poisoned");
        match guard.get_mut(id) {
            Some(employee) => {
                employee.metrics = metrics;
                employee.metrics.sort_by_key(|metric| metric.order);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, WeeklyReport>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: WeeklyReport) -> Result<WeeklyReport, RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: WeeklyReport) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        if guard.contains_key(&report.id) {
            guard.insert(report.id.clone(), report);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn remove(&self, id: &ReportId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<WeeklyReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<WeeklyReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        let mut reports: Vec<WeeklyReport> = guard.values().cloned().collect();
        reports.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        Ok(reports)
    }

    fn find_by_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Option<WeeklyReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard
            .values()
            .find(|report| report.period_start == period_start && report.period_end == period_end)
            .cloned())
    }

    fn overlapping(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<WeeklyReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        let mut reports: Vec<WeeklyReport> = guard
            .values()
            .filter(|report| report.period_start <= range_end && report.period_end >= range_start)
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.period_start.cmp(&b.period_start));
        Ok(reports)
    }

    fn entries_for_metric(&self, id: &MetricConfigId) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard
            .values()
            .flat_map(|report| report.entries.iter())
            .filter(|entry| &entry.metric_config_id == id)
            .count())
    }
}

pub(crate) type InMemoryService =
    KpiReportService<InMemoryEmployeeRepository, InMemoryReportRepository>;

pub(crate) fn in_memory_service() -> InMemoryService {
    KpiReportService::new(
        Arc::new(InMemoryEmployeeRepository::default()),
        Arc::new(InMemoryReportRepository::default()),
    )
}

fn draft(
    name: &str,
    category: MetricCategory,
    direction: MetricDirection,
    weight: f64,
    threshold: Option<f64>,
    order: u32,
) -> MetricDraft {
    MetricDraft {
        id: None,
        name: name.to_string(),
        category,
        direction,
        weight,
        threshold,
        order,
    }
}

fn developer_metrics() -> Vec<MetricDraft> {
    vec![
        draft(
            "Completed tasks",
            MetricCategory::Speed,
            MetricDirection::Positive,
            0.5,
            None,
            0,
        ),
        draft(
            "Returned tasks",
            MetricCategory::Quality,
            MetricDirection::Negative,
            0.2,
            Some(10.0),
            1,
        ),
        draft(
            "Critical bugs",
            MetricCategory::Quality,
            MetricDirection::Negative,
            0.2,
            Some(5.0),
            2,
        ),
        draft(
            "Minor bugs",
            MetricCategory::Quality,
            MetricDirection::Negative,
            0.1,
            Some(15.0),
            3,
        ),
    ]
}

fn teamlead_metrics() -> Vec<MetricDraft> {
    vec![
        draft(
            "Reviews completed",
            MetricCategory::Management,
            MetricDirection::Positive,
            0.35,
            None,
            0,
        ),
        draft(
            "Completed tasks",
            MetricCategory::Management,
            MetricDirection::Positive,
            0.35,
            None,
            1,
        ),
        draft(
            "Critical production bugs",
            MetricCategory::Management,
            MetricDirection::Negative,
            0.3,
            Some(5.0),
            2,
        ),
    ]
}

/// Seeds the demo team: one team lead and three developers, each with the
/// standard metric set and a KPI budget.
pub(crate) fn seed_demo_team(service: &InMemoryService) -> Result<Vec<Employee>, ServiceError> {
    let roster = [
        ("Eugene", EmployeeRole::Teamlead, 70_000.0, 0),
        ("Sergey", EmployeeRole::Developer, 50_000.0, 1),
        ("Kirill", EmployeeRole::Developer, 50_000.0, 2),
        ("Arseniy", EmployeeRole::Developer, 50_000.0, 3),
    ];

    let mut team = Vec::with_capacity(roster.len());
    for (name, role, budget, order) in roster {
        let employee = service.create_employee(NewEmployee {
            name: name.to_string(),
            role,
            kpi_budget: Some(budget),
            order: Some(order),
        })?;
        let metrics = match role {
            EmployeeRole::Teamlead => teamlead_metrics(),
            EmployeeRole::Developer => developer_metrics(),
        };
        service.replace_metrics(&employee.id, metrics)?;
        team.push(service.employee(&employee.id)?);
    }

    Ok(team)
}

pub(crate) fn parse_month(raw: &str) -> Result<MonthKey, String> {
    raw.trim().parse().map_err(|err| format!("{err}"))
}
