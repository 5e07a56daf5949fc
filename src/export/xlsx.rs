// src/export/xlsx.rs

use crate::core::report::{DETAIL_HEADERS, Report};
use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;

const SUMMARY_WIDTHS: [f64; 2] = [20.0, 40.0];
const RECORD_WIDTHS: [f64; 6] = [25.0, 12.0, 10.0, 10.0, 12.0, 8.0];

/// Two sheets: `Summary` (label / value) and `Records` (one row per session).
pub(crate) fn export_xlsx(report: &Report, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary").map_err(to_export_error)?;
    write_summary(summary, report)?;

    let records = workbook.add_worksheet();
    records.set_name("Records").map_err(to_export_error)?;
    write_records(records, report)?;

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_summary(ws: &mut Worksheet, report: &Report) -> AppResult<()> {
    let bold = Format::new().set_bold();
    let title = Format::new().set_bold().set_font_size(14);

    ws.write_with_format(0, 0, report.title.as_str(), &title)
        .map_err(to_export_error)?;

    // title, blank, identity lines, blank, "Summary", figures, blank, Generated
    let mut row: u32 = 2;
    for line in &report.summary {
        match line.label {
            "Total Hours" => {
                row += 1;
                ws.write_with_format(row, 0, "Summary", &bold)
                    .map_err(to_export_error)?;
                row += 1;
            }
            "Generated" => row += 1,
            _ => {}
        }
        ws.write_with_format(row, 0, line.label, &bold)
            .map_err(to_export_error)?;
        ws.write(row, 1, line.value.as_str())
            .map_err(to_export_error)?;
        row += 1;
    }

    for (c, w) in SUMMARY_WIDTHS.iter().enumerate() {
        ws.set_column_width(c as u16, *w).map_err(to_export_error)?;
    }
    Ok(())
}

fn write_records(ws: &mut Worksheet, report: &Report) -> AppResult<()> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in DETAIL_HEADERS.iter().enumerate() {
        ws.write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }
    ws.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (i, detail) in report.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let fmt = Format::new()
            .set_background_color(if i % 2 == 0 { band1 } else { band2 })
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        for (col, value) in detail.cells().iter().enumerate() {
            ws.write_with_format(row, col as u16, *value, &fmt)
                .map_err(to_export_error)?;
        }
    }

    for (c, w) in RECORD_WIDTHS.iter().enumerate() {
        ws.set_column_width(c as u16, *w).map_err(to_export_error)?;
    }
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
