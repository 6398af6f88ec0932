//! Run one IGDB search and show how the matcher sees the candidates.
//! Usage:
//!   cargo run --bin igdb_probe -- "<title>" [data_dir]
//! Credentials come from IGDB_CLIENT_ID / IGDB_ACCESS_TOKEN (.env supported)
//! or from settings.json in the data directory.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use nowrank::config::Settings;
use nowrank::igdb::{IgdbClient, MetadataApi};
use nowrank::listing::format_unix_date;
use nowrank::matcher::match_metadata;
use nowrank::normalize::normalize;
use nowrank::ranking::combined_rating;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let title = args
        .next()
        .context("usage: igdb_probe <title> [data_dir]")?;
    let data_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let settings = Settings::load_or_bootstrap(&data_dir)?;
    let client = IgdbClient::from_settings(&settings)?;
    let candidates = client
        .search_games(&title)
        .await
        .with_context(|| format!("IGDB search for '{}' failed", title))?;

    println!("query: {}  key: {}", title, normalize(&title));
    println!("{} candidates", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        println!(
            "{:>3}. {}  key={}  native={}  critic={:?}/{}  user={:?}/{}  combined={:?}  released={}",
            i + 1,
            c.name,
            normalize(&c.name),
            c.is_native(),
            c.aggregated_rating,
            c.critic_count(),
            c.rating,
            c.user_count(),
            combined_rating(c),
            c.first_release_date
                .and_then(format_unix_date)
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    match match_metadata(&title, &candidates) {
        Some(pick) => println!("pick: {}", pick.name),
        None => println!("pick: none"),
    }
    Ok(())
}
