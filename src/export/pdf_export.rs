// src/export/pdf_export.rs

use crate::core::report::{DETAIL_HEADERS, Report};
use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::ui::messages::info;
use std::path::Path;

/// Summary lines on top of the first page, records table below.
pub(crate) fn export_pdf(report: &Report, path: &Path) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let preamble: Vec<String> = report
        .summary
        .iter()
        .map(|l| format!("{}: {}", l.label, l.value))
        .collect();
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| r.cells().iter().map(|c| c.to_string()).collect())
        .collect();

    let mut pdf = PdfManager::new();
    pdf.write_table(&report.title, &preamble, &DETAIL_HEADERS, &rows);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}
