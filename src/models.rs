use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// PS4.
pub const NATIVE_PLATFORM_ID: i64 = 48;

// PS2, PS3, PSN, PS4
pub const QUERY_PLATFORM_IDS: [i64; 4] = [8, 9, 45, 48];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_release_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    pub fn is_native(&self) -> bool {
        self.platforms
            .as_deref()
            .is_some_and(|p| p.contains(&NATIVE_PLATFORM_ID))
    }

    pub fn critic_count(&self) -> u32 {
        self.aggregated_rating_count.unwrap_or(0)
    }

    pub fn user_count(&self) -> u32 {
        self.rating_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoopEntry {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Shortname", default)]
    pub shortname: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Num_online")]
    pub num_online: Option<String>,
    #[serde(rename = "Num_couch")]
    pub num_couch: Option<String>,
    #[serde(rename = "Num_combo")]
    pub num_combo: Option<String>,
    #[serde(rename = "Score_overall")]
    pub score_overall: Option<String>,
    #[serde(rename = "Score_coop")]
    pub score_coop: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
}
