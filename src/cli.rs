use clap::Parser;
use std::path::PathBuf;

use crate::ranking::{RankOptions, SortMode};

#[derive(Parser, Debug)]
#[command(name = "nowrank")]
#[command(about = "Ranks streaming catalog games by ratings", long_about = None)]
pub struct Cli {
    /// Only games with local (couch or split-screen) co-op
    #[arg(short, long)]
    pub local_coop: bool,

    /// Only games available natively on the platform (downloadable)
    #[arg(short, long, visible_alias = "downloadable")]
    pub platform_only: bool,

    /// Number of games to show
    #[arg(short = 'n', long = "count", default_value_t = 100)]
    pub count: usize,

    /// Sort by d (release date), u (user), c (critic) or b (both, combined)
    #[arg(short, long, default_value = "b")]
    pub sort: SortMode,

    /// Minimum number of ratings required in the sorted category
    #[arg(short, long = "min-ratings", default_value_t = 3)]
    pub min_ratings: u32,

    /// Directory holding settings.json and the cached data files
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Query the metadata catalog for titles missing from an existing cache
    #[arg(long)]
    pub fetch_missing: bool,
}

impl Cli {
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            mode: self.sort,
            min_rating_count: self.min_ratings,
            local_coop_only: self.local_coop,
            platform_only: self.platform_only,
            limit: self.count,
        }
    }
}
