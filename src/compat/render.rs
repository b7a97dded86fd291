//! Box-drawn table output for compatibility reports.

use unicode_width::UnicodeWidthStr;

use super::report::CompatibilityReport;

const HEADERS: [&str; 4] = ["Package", "Local version", "Remote version", "Compatible"];

/// Renders one line per report row under a header line.
///
/// ```text
/// ┌────────────────────┬───────────────┬────────────────┬────────────┐
/// │ Package            │ Local version │ Remote version │ Compatible │
/// ├────────────────────┼───────────────┼────────────────┼────────────┤
/// │ @capacitor/android │ 7.0.0         │ 7.0.0          │ ✅         │
/// └────────────────────┴───────────────┴────────────────┴────────────┘
/// ```
pub fn render_table(report: &CompatibilityReport) -> String {
    let cells: Vec<[&str; 4]> = report
        .rows
        .iter()
        .map(|row| {
            [
                row.package_name.as_str(),
                row.local_display.as_str(),
                row.bundle_version.as_str(),
                row.verdict.symbol(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    out.push_str(&border(&widths, '┌', '┬', '┐'));
    out.push_str(&line(&widths, &HEADERS));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for row in &cells {
        out.push_str(&line(&widths, row));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));
    out
}

fn border(widths: &[usize; 4], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

fn line(widths: &[usize; 4], cells: &[&str; 4]) -> String {
    let mut out = String::from("│");
    for (width, cell) in widths.iter().zip(cells) {
        let pad = width - cell.width();
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(pad + 1));
        out.push('│');
    }
    out.push('\n');
    out
}
