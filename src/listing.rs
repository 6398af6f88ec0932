use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;

const UNTIL_MARKER: &str = " - Until ";

pub type UntilDates = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTitle {
    pub name: String,
    pub until: Option<String>,
}

/// Splits `"Game - Until 21st August, 2024"` when the year is within
/// `reference_year - 1 ..= reference_year + 2`.
pub fn split_until(item: &str, reference_year: i32) -> RawTitle {
    let item = item.trim();
    let plain = || RawTitle {
        name: item.to_string(),
        until: None,
    };

    let Some(pos) = item.rfind(UNTIL_MARKER) else {
        return plain();
    };
    if !ends_with_plausible_year(item, reference_year) {
        return plain();
    }

    let name = item[..pos].trim();
    let until = item[pos + UNTIL_MARKER.len()..].trim();
    if name.is_empty() || until.is_empty() {
        return plain();
    }
    RawTitle {
        name: name.to_string(),
        until: Some(until.to_string()),
    }
}

fn ends_with_plausible_year(item: &str, reference_year: i32) -> bool {
    let digits: String = item
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.len() != 4 {
        return false;
    }
    digits
        .parse::<i32>()
        .is_ok_and(|year| (reference_year - 1..=reference_year + 2).contains(&year))
}

pub fn extract_titles<I, S>(items: I, reference_year: i32) -> (Vec<String>, UntilDates)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut titles = Vec::new();
    let mut until = UntilDates::new();
    for item in items {
        let raw = split_until(item.as_ref(), reference_year);
        if raw.name.is_empty() {
            continue;
        }
        if let Some(date) = raw.until {
            until.insert(raw.name.clone(), date);
        }
        titles.push(raw.name);
    }
    (titles, until)
}

/// `"21st August, 2024"` -> `"2024-08-21"`. Unparsable input is returned as is.
pub fn format_long_date(date: &str) -> String {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    parse_long_date(trimmed)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn parse_long_date(date: &str) -> Option<NaiveDate> {
    let (day, rest) = date.split_once(' ')?;
    let day = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| day.strip_suffix(suffix))?;
    NaiveDate::parse_from_str(&format!("{} {}", day, rest.trim()), "%d %B, %Y").ok()
}

pub fn format_unix_date(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|d| d.format("%Y-%m-%d").to_string())
}
