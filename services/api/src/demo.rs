use crate::infra::{in_memory_service, parse_month, seed_demo_team, InMemoryService};
use chrono::{Duration, Local};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use team_kpi::error::AppError;
use team_kpi::reporting::export::write_monthly_csv;
use team_kpi::reporting::{
    week_range, Employee, EntryDraft, MonthKey, MonthlySummary, ReportView, ServiceError,
};
use team_kpi::scoring::{EmployeeRole, MetricCategory};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Month to generate the demo data in (YYYY-MM). Defaults to the current month.
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<MonthKey>,
    /// Write the monthly summary as CSV to this path.
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MonthlyArgs {
    /// Month to summarize (YYYY-MM). Defaults to the current month.
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<MonthKey>,
    /// Write the monthly summary as CSV to this path.
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

/// Per-metric demo measurements, aligned with the seeded metric order:
/// `(goal, week-one fact, week-two fact)`.
const DEVELOPER_FACTS: [(f64, f64, f64); 4] = [
    (10.0, 8.0, 9.0), // completed tasks
    (20.0, 3.0, 1.0), // returned tasks
    (5.0, 0.0, 1.0),  // critical bugs
    (15.0, 2.0, 2.0), // minor bugs
];

const TEAMLEAD_FACTS: [(f64, f64, f64); 3] = [
    (10.0, 12.0, 14.0), // reviews completed
    (6.0, 5.0, 6.0),    // completed tasks
    (5.0, 0.0, 1.0),    // critical production bugs
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let month = args
        .month
        .unwrap_or_else(|| MonthKey::from_date(Local::now().date_naive()));

    let service = in_memory_service();
    let team = seed_demo_team(&service)?;
    print_metric_legend(&team);
    let views = score_demo_weeks(&service, &team, month)?;

    for view in &views {
        println!(
            "Week {} to {}",
            view.report.period_start, view.report.period_end
        );
        for total in &view.totals {
            if total.has_data {
                println!("  {:<10} {:>8.2}%", total.employee_name, total.total_percent);
            } else {
                println!("  {:<10} {:>9}", total.employee_name, "no data");
            }
        }
        println!();
    }

    let summary = service.monthly_summary(month)?;
    print_monthly(&summary);
    maybe_export(&summary, args.export)
}

pub(crate) fn run_monthly(args: MonthlyArgs) -> Result<(), AppError> {
    let month = args
        .month
        .unwrap_or_else(|| MonthKey::from_date(Local::now().date_naive()));

    let service = in_memory_service();
    let team = seed_demo_team(&service)?;
    score_demo_weeks(&service, &team, month)?;

    let summary = service.monthly_summary(month)?;
    print_monthly(&summary);
    maybe_export(&summary, args.export)
}

/// Creates two weekly reports fully inside the month, with deterministic
/// facts per role.
fn score_demo_weeks(
    service: &InMemoryService,
    team: &[Employee],
    month: MonthKey,
) -> Result<Vec<ReportView>, ServiceError> {
    let (month_start, _) = month.range();

    let mut views = Vec::with_capacity(2);
    for (week_index, anchor_day) in [7i64, 14].into_iter().enumerate() {
        let (week_start, week_end) = week_range(month_start + Duration::days(anchor_day));

        let mut entries = Vec::new();
        for employee in team {
            let facts: &[(f64, f64, f64)] = match employee.role {
                EmployeeRole::Developer => &DEVELOPER_FACTS,
                EmployeeRole::Teamlead => &TEAMLEAD_FACTS,
            };
            for (metric, &(goal, week_one, week_two)) in employee.metrics.iter().zip(facts.iter()) {
                let fact = if week_index == 0 { week_one } else { week_two };
                entries.push(EntryDraft {
                    employee_id: employee.id.clone(),
                    metric_config_id: metric.id.clone(),
                    fact,
                    goal,
                });
            }
        }

        views.push(service.create_report(week_start, week_end, entries)?);
    }

    Ok(views)
}

/// Prints the seeded metric catalogue grouped by category, deduplicated
/// across employees sharing the same configuration.
fn print_metric_legend(team: &[Employee]) {
    println!("Metric configuration");
    for category in MetricCategory::ordered() {
        let mut metrics: Vec<_> = team
            .iter()
            .flat_map(|employee| employee.metrics.iter())
            .filter(|metric| metric.category == category)
            .collect();
        if metrics.is_empty() {
            continue;
        }
        metrics.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        metrics.dedup_by(|a, b| a.name == b.name);

        println!("  {}", category.label());
        for metric in metrics {
            println!("    {:<26} {}", metric.name, metric.direction.label());
        }
    }
    println!();
}

fn print_monthly(summary: &MonthlySummary) {
    println!(
        "Monthly summary for {} ({} report(s))",
        summary.month, summary.reports_count
    );
    println!(
        "  {:<10} {:<11} {:>5} {:>12} {:>10}",
        "Employee", "Role", "Weeks", "Monthly KPI", "Money"
    );
    for row in &summary.summary {
        let money = row
            .money_kpi
            .map(|money| money.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10} {:<11} {:>5} {:>11.2}% {:>10}",
            row.employee.name,
            row.employee.role.label(),
            row.weeks_count,
            row.monthly_kpi,
            money
        );
    }
}

fn maybe_export(summary: &MonthlySummary, path: Option<PathBuf>) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(&path)?;
    write_monthly_csv(summary, file).map_err(ServiceError::Export)?;
    println!("CSV summary written to {}", path.display());
    Ok(())
}
