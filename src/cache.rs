use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::listing::UntilDates;
use crate::models::MetadataRecord;

/// Reads a JSON document, `None` when the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON for this store", path.display()))?;
    debug!("Loaded {}", path.display());
    Ok(Some(parsed))
}

pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_titles(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

pub fn save_titles(path: &Path, titles: &[String]) -> Result<()> {
    let mut text = titles.join("\n");
    text.push('\n');
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_until_dates(path: &Path) -> Result<UntilDates> {
    Ok(load_json(path)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    records: Vec<MetadataRecord>,
}

impl MetadataCache {
    pub fn from_records(records: Vec<MetadataRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if let Some(key) = record.key_name.as_deref() {
                if !seen.insert(key.to_string()) {
                    warn!("Dropping duplicate cached record for '{}'", key);
                    continue;
                }
            }
            kept.push(record);
        }
        Self { records: kept }
    }

    pub fn load(path: &Path) -> Result<Option<Self>> {
        Ok(load_json::<Vec<MetadataRecord>>(path)?.map(Self::from_records))
    }

    /// Exact `key_name` first, then a case-insensitive display name.
    pub fn lookup(&self, title: &str) -> Option<&MetadataRecord> {
        self.records
            .iter()
            .find(|r| r.key_name.as_deref() == Some(title))
            .or_else(|| {
                let wanted = title.trim().to_lowercase();
                self.records
                    .iter()
                    .find(|r| r.name.trim().to_lowercase() == wanted)
            })
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
