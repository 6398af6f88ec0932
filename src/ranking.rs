use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::coop::CoopCatalog;
use crate::models::MetadataRecord;

/// Weight of one critic review relative to one user rating.
const CRITIC_WEIGHT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    Date,
    User,
    Critic,
    #[default]
    Combined,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "date" => Ok(SortMode::Date),
            "u" | "user" => Ok(SortMode::User),
            "c" | "critic" => Ok(SortMode::Critic),
            "b" | "both" | "combined" => Ok(SortMode::Combined),
            other => Err(format!("unknown sort mode '{other}' (expected d, u, c or b)")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Date => "date",
            SortMode::User => "user",
            SortMode::Critic => "critic",
            SortMode::Combined => "combined",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    pub mode: SortMode,
    pub min_rating_count: u32,
    pub local_coop_only: bool,
    pub platform_only: bool,
    pub limit: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            mode: SortMode::Combined,
            min_rating_count: 3,
            local_coop_only: false,
            platform_only: false,
            limit: 100,
        }
    }
}

/// `(critic * critic_n * 4 + user * user_n) / (critic_n * 4 + user_n)`.
///
/// `None` when either rating is missing or there are no samples at all.
pub fn combined_rating(record: &MetadataRecord) -> Option<f64> {
    let critic = record.aggregated_rating?;
    let user = record.rating?;
    let critic_n = f64::from(record.critic_count()) * CRITIC_WEIGHT;
    let user_n = f64::from(record.user_count());
    let denominator = critic_n + user_n;
    if denominator == 0.0 {
        return None;
    }
    Some((critic * critic_n + user * user_n) / denominator)
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Ties keep catalog order. Unscored records sort last.
pub fn rank<'a>(
    records: &'a [MetadataRecord],
    coop: &CoopCatalog,
    options: &RankOptions,
) -> Vec<&'a MetadataRecord> {
    let min = options.min_rating_count;
    let mut view: Vec<&MetadataRecord> = records
        .iter()
        .filter(|r| !options.platform_only || r.is_native())
        .filter(|r| !options.local_coop_only || coop.is_local_multiplayer(&r.name))
        .filter(|r| match options.mode {
            SortMode::Date => r.first_release_date.is_some(),
            SortMode::User => r.rating.is_some() && r.user_count() >= min,
            SortMode::Critic => r.aggregated_rating.is_some() && r.critic_count() >= min,
            SortMode::Combined => {
                r.aggregated_rating.is_some()
                    && r.critic_count() >= min
                    && r.rating.is_some()
                    && r.user_count() >= min
            }
        })
        .collect();

    match options.mode {
        SortMode::Date => view.sort_by(|a, b| b.first_release_date.cmp(&a.first_release_date)),
        SortMode::User => view.sort_by(|a, b| descending(a.rating, b.rating)),
        SortMode::Critic => {
            view.sort_by(|a, b| descending(a.aggregated_rating, b.aggregated_rating))
        }
        SortMode::Combined => {
            view.sort_by(|a, b| descending(combined_rating(a), combined_rating(b)))
        }
    }

    view.truncate(options.limit);
    view
}
