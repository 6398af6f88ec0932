use std::fmt::Write as _;

use crate::coop::CoopCatalog;
use crate::listing::{format_long_date, format_unix_date, UntilDates};
use crate::models::MetadataRecord;

const SUMMARY_CHARS: usize = 100;
const HEADERS: [&str; 8] = [
    "Name", "Platform", "Coop", "Until", "Critic", "User", "Released", "Summary",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub platform: &'static str,
    pub coop: &'static str,
    pub until: String,
    pub critic: String,
    pub user: String,
    pub released: String,
    pub summary: String,
}

impl ReportRow {
    fn cells(&self) -> [&str; 8] {
        [
            &self.name,
            self.platform,
            self.coop,
            &self.until,
            &self.critic,
            &self.user,
            &self.released,
            &self.summary,
        ]
    }
}

pub fn build_rows(
    ranked: &[&MetadataRecord],
    coop: &CoopCatalog,
    until: &UntilDates,
) -> Vec<ReportRow> {
    ranked
        .iter()
        .map(|record| ReportRow {
            name: record.name.clone(),
            platform: if record.is_native() { "native" } else { "stream" },
            coop: if coop.is_local_multiplayer(&record.name) {
                "Local"
            } else {
                ""
            },
            until: until_for(record, until),
            critic: rounded(record.aggregated_rating),
            user: rounded(record.rating),
            released: record
                .first_release_date
                .and_then(format_unix_date)
                .unwrap_or_default(),
            summary: short_summary(record.summary.as_deref().unwrap_or_default()),
        })
        .collect()
}

/// Until dates are keyed by listing title, so try the record's key first.
fn until_for(record: &MetadataRecord, until: &UntilDates) -> String {
    record
        .key_name
        .as_deref()
        .and_then(|key| until.get(key))
        .or_else(|| until.get(&record.name))
        .map(|date| format_long_date(date))
        .unwrap_or_default()
}

fn rounded(rating: Option<f64>) -> String {
    rating.map(|r| format!("{:.0}", r)).unwrap_or_default()
}

fn short_summary(summary: &str) -> String {
    summary
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(SUMMARY_CHARS)
        .collect()
}

pub fn render(rows: &[ReportRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS, &widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, rule.each_ref().map(String::as_str), &widths);
    for row in rows {
        push_line(&mut out, row.cells(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: [&str; 8], widths: &[usize; 8]) {
    let last = cells.len() - 1;
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            line.push_str(cell);
        } else {
            let _ = write!(line, "{:<width$}  ", cell, width = *width);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
