//! Plain-text and JSON rendering of a harvest report

use crate::output::types::HarvestReport;

/// Formats a report as a plain-text listing
///
/// One `No / Title / URL` row per title, followed by the totals line.
pub fn format_report(report: &HarvestReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!("Strategy: {}\n", report.strategy));
    if report.cancelled {
        out.push_str("Run was cancelled; results are partial\n");
    }
    out.push('\n');

    let width = report.titles.len().to_string().len().max(2);
    out.push_str(&format!("{:>width$}  {}  {}\n", "No", "Title", "URL", width = width));
    for title in &report.titles {
        out.push_str(&format!(
            "{:>width$}  {}  {}",
            title.sequence,
            title.title,
            title.url,
            width = width
        ));
        if let Some(published) = &title.published {
            out.push_str(&format!("  ({})", published));
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "{} posts found, {} titles extracted ({:.1}%, {:.1}s)\n",
        report.total_candidates,
        report.extracted_count,
        report.extraction_rate(),
        report.duration_seconds()
    ));

    out
}

/// Prints a report to stdout
pub fn print_report(report: &HarvestReport) {
    print!("{}", format_report(report));
}

/// Serializes a report as pretty-printed JSON
pub fn to_json(report: &HarvestReport) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
