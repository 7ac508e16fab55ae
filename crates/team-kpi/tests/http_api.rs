//! HTTP surface tests: the axum router exercised end-to-end with
//! `tower::ServiceExt::oneshot` against in-memory repositories.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use axum::Router;
    use chrono::NaiveDate;
    use serde_json::Value;

    use team_kpi::reporting::repository::{
        EmployeeRepository, ReportRepository, RepositoryError,
    };
    use team_kpi::reporting::{
        report_router, Employee, EmployeeId, KpiReportService, MetricConfig, MetricConfigId,
        ReportId, WeeklyReport,
    };

    #[derive(Default)]
    pub(crate) struct MemoryEmployees {
        records: Mutex<HashMap<EmployeeId, Employee>>,
    }

    impl EmployeeRepository for MemoryEmployees {
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

    #[derive(Default)]
    pub(crate) struct MemoryReports {
        records: Mutex<HashMap<ReportId, WeeklyReport>>,
    }

    impl ReportRepository for MemoryReports {
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
                .find(|report| {
                    report.period_start == period_start && report.period_end == period_end
                })
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
                .filter(|report| {
                    report.period_start <= range_end && report.period_end >= range_start
                })
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

    pub(crate) fn router() -> Router {
        let service = KpiReportService::new(
            Arc::new(MemoryEmployees::default()),
            Arc::new(MemoryReports::default()),
        );
        report_router(Arc::new(service))
    }

    pub(crate) fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    pub(crate) fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    pub(crate) async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    pub(crate) async fn read_text_body(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        String::from_utf8(body.to_vec()).expect("utf8 payload")
    }
}

use axum::http::{header, StatusCode};
use axum::Router;
use common::*;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn seeded_router() -> (Router, String, Vec<String>) {
    let router = router();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/employees",
            json!({ "name": "Alice", "role": "developer", "kpi_budget": 50000.0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let employee = read_json_body(response).await;
    let employee_id = employee["id"].as_str().expect("employee id").to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/employees/{employee_id}/metrics"),
            json!({
                "metrics": [
                    {
                        "name": "Completed tasks",
                        "category": "speed",
                        "direction": "positive",
                        "weight": 0.5,
                        "order": 0
                    },
                    {
                        "name": "Returned tasks",
                        "category": "quality",
                        "direction": "negative",
                        "weight": 0.2,
                        "threshold": 10.0,
                        "order": 1
                    }
                ]
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = read_json_body(response).await;
    let metric_ids = metrics
        .as_array()
        .expect("metric array")
        .iter()
        .map(|metric| metric["id"].as_str().expect("metric id").to_string())
        .collect();

    (router, employee_id, metric_ids)
}

fn report_payload(employee_id: &str, metric_ids: &[String]) -> Value {
    json!({
        "period_start": "2026-02-02",
        "period_end": "2026-02-08",
        "entries": [
            {
                "employee_id": employee_id,
                "metric_config_id": metric_ids[0],
                "fact": 8.0,
                "goal": 10.0
            },
            {
                "employee_id": employee_id,
                "metric_config_id": metric_ids[1],
                "fact": 3.0,
                "goal": 20.0
            }
        ]
    })
}

#[tokio::test]
async fn create_report_scores_entries_over_http() {
    let (router, employee_id, metric_ids) = seeded_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            report_payload(&employee_id, &metric_ids),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let view = read_json_body(response).await;
    let entries = view["report"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["percent"], json!(80.0));
    assert_eq!(entries[1]["percent"], json!(94.44));

    let totals = view["totals"].as_array().expect("totals");
    let alice = totals
        .iter()
        .find(|total| total["employee_id"] == json!(employee_id))
        .expect("alice total");
    assert_eq!(alice["total_percent"], json!(58.89));
    assert_eq!(alice["has_data"], json!(true));
}

#[tokio::test]
async fn duplicate_report_period_returns_conflict() {
    let (router, employee_id, metric_ids) = seeded_router().await;
    let payload = report_payload(&employee_id, &metric_ids);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/reports", payload.clone()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/reports", payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("error message").contains("already exists"));
}

#[tokio::test]
async fn invalid_measurement_returns_bad_request() {
    let (router, employee_id, metric_ids) = seeded_router().await;

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            json!({
                "period_start": "2026-02-02",
                "period_end": "2026-02-08",
                "entries": [{
                    "employee_id": employee_id,
                    "metric_config_id": metric_ids[0],
                    "fact": -1.0,
                    "goal": 10.0
                }]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_employee_returns_not_found() {
    let router = router();

    let response = router
        .oneshot(get_request("/api/v1/employees/emp-none"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn monthly_summary_aggregates_over_http() {
    let (router, employee_id, metric_ids) = seeded_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            report_payload(&employee_id, &metric_ids),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(get_request("/api/v1/reports/monthly?month=2026-02"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let summary = read_json_body(response).await;
    assert_eq!(summary["month"], json!("2026-02"));
    assert_eq!(summary["reports_count"], json!(1));
    let row = &summary["summary"][0];
    assert_eq!(row["weeks_count"], json!(1));
    assert_eq!(row["monthly_kpi"], json!(58.89));
    assert_eq!(row["money_kpi"], json!(29445));
}

#[tokio::test]
async fn malformed_month_parameter_is_rejected() {
    let router = router();

    let response = router
        .oneshot(get_request("/api/v1/reports/monthly?month=February"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn monthly_export_serves_csv() {
    let (router, employee_id, metric_ids) = seeded_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            report_payload(&employee_id, &metric_ids),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(get_request("/api/v1/reports/monthly/export?month=2026-02"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type"),
        "text/csv"
    );
    let body = read_text_body(response).await;
    assert!(body.starts_with("month,employee,role,weeks,monthly_kpi,money_kpi"));
    assert!(body.contains("Alice"));
}
