// src/export/mod.rs

mod fs_utils;
mod json_csv;
mod pdf;
mod pdf_export;
mod xlsx;

pub use fs_utils::ensure_writable;

use crate::core::report::Report;
use crate::errors::AppResult;
use crate::models::period::Period;
use crate::ui::messages::success;
use crate::utils::zone::Zone;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Completion line shared by every export format.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// `timekeeper-<first day>-<last day>.<ext>` in the working directory.
pub fn default_file_name(period: &Period, zone: &Zone, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!(
        "timekeeper-{}-{}.{}",
        period.first_day(zone).format("%Y-%m-%d"),
        period.last_day(zone).format("%Y-%m-%d"),
        format.as_str()
    ))
}

/// Serialize `report` to `path` in the requested format.
pub fn write_report(report: &Report, format: ExportFormat, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Xlsx => xlsx::export_xlsx(report, path),
        ExportFormat::Csv => json_csv::export_csv(report, path),
        ExportFormat::Json => json_csv::export_json(report, path),
        ExportFormat::Pdf => pdf_export::export_pdf(report, path),
    }?;

    tracing::debug!(
        format = format.as_str(),
        rows = report.rows.len(),
        path = %path.display(),
        "report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_uses_period_days() {
        let p = Period::from_range("2024-03", &Zone::Utc).unwrap();
        assert_eq!(
            default_file_name(&p, &Zone::Utc, ExportFormat::Xlsx),
            PathBuf::from("timekeeper-2024-03-01-2024-03-31.xlsx")
        );
    }
}
