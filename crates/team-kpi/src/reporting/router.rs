use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::dates::MonthKey;
use super::domain::{EmployeeId, EmployeeUpdate, EntryDraft, MetricDraft, NewEmployee, ReportId};
use super::repository::{EmployeeRepository, ReportRepository};
use super::service::{KpiReportService, ServiceError};

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateReportRequest {
    pub(crate) period_start: NaiveDate,
    pub(crate) period_end: NaiveDate,
    pub(crate) entries: Vec<EntryDraft>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateReportRequest {
    pub(crate) entries: Vec<EntryDraft>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplaceMetricsRequest {
    pub(crate) metrics: Vec<MetricDraft>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthQuery {
    pub(crate) month: MonthKey,
}

/// Router builder exposing the employee and report endpoints.
pub fn report_router<E, R>(service: Arc<KpiReportService<E, R>>) -> Router
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_employees_handler::<E, R>).post(create_employee_handler::<E, R>),
        )
        .route(
            "/api/v1/employees/:employee_id",
            get(employee_handler::<E, R>)
                .put(update_employee_handler::<E, R>)
                .delete(remove_employee_handler::<E, R>),
        )
        .route(
            "/api/v1/employees/:employee_id/metrics",
            get(employee_metrics_handler::<E, R>).put(replace_metrics_handler::<E, R>),
        )
        .route(
            "/api/v1/reports",
            get(list_reports_handler::<E, R>).post(create_report_handler::<E, R>),
        )
        .route(
            "/api/v1/reports/monthly",
            get(monthly_summary_handler::<E, R>),
        )
        .route(
            "/api/v1/reports/monthly/export",
            get(monthly_export_handler::<E, R>),
        )
        .route(
            "/api/v1/reports/:report_id",
            get(report_handler::<E, R>)
                .put(update_report_handler::<E, R>)
                .delete(remove_report_handler::<E, R>),
        )
        .with_state(service)
}

async fn list_employees_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.list_employees()?))
}

async fn create_employee_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Json(payload): Json<NewEmployee>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    let employee = service.create_employee(payload)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn employee_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(employee_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.employee(&EmployeeId(employee_id))?))
}

async fn update_employee_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(employee_id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(
        service.update_employee(&EmployeeId(employee_id), payload)?,
    ))
}

async fn remove_employee_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(employee_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    service.remove_employee(&EmployeeId(employee_id))?;
    Ok(Json(json!({ "ok": true })))
}

async fn employee_metrics_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(employee_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.employee_metrics(&EmployeeId(employee_id))?))
}

async fn replace_metrics_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(employee_id): Path<String>,
    Json(payload): Json<ReplaceMetricsRequest>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.replace_metrics(
        &EmployeeId(employee_id),
        payload.metrics,
    )?))
}

async fn list_reports_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.list_reports()?))
}

async fn create_report_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    let view = service.create_report(payload.period_start, payload.period_end, payload.entries)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn report_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.report(&ReportId(report_id))?))
}

async fn update_report_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(report_id): Path<String>,
    Json(payload): Json<UpdateReportRequest>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(
        service.update_report(&ReportId(report_id), payload.entries)?,
    ))
}

async fn remove_report_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    service.remove_report(&ReportId(report_id))?;
    Ok(Json(json!({ "ok": true })))
}

async fn monthly_summary_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    Ok(Json(service.monthly_summary(query.month)?))
}

async fn monthly_export_handler<E, R>(
    State(service): State<Arc<KpiReportService<E, R>>>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: EmployeeRepository + 'static,
    R: ReportRepository + 'static,
{
    let body = service.monthly_summary_csv(query.month)?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], body))
}
