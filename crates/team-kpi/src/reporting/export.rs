use std::io::Write;

use super::domain::MonthlySummary;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export produced non-utf8 output: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Writes a monthly summary as CSV: one row per employee, with an empty
/// money column when no budget is configured.
pub fn write_monthly_csv<W: Write>(summary: &MonthlySummary, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "month",
        "employee",
        "role",
        "weeks",
        "monthly_kpi",
        "money_kpi",
    ])?;

    for row in &summary.summary {
        csv_writer.write_record([
            summary.month.to_string(),
            row.employee.name.clone(),
            row.employee.role.label().to_string(),
            row.weeks_count.to_string(),
            format!("{:.2}", row.monthly_kpi),
            row.money_kpi
                .map(|money| money.to_string())
                .unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn monthly_csv_string(summary: &MonthlySummary) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_monthly_csv(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
