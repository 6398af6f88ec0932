use anyhow::Result;
use chrono::{Datelike, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::cache::{self, MetadataCache};
use crate::config::{DataPaths, Settings};
use crate::coop::CoopCatalog;
use crate::fetcher::{enrich, Enrichment};
use crate::igdb::{IgdbClient, MetadataApi};
use crate::listing::{extract_titles, UntilDates};
use crate::models::{CoopEntry, MetadataRecord};
use crate::ranking::{rank, RankOptions};
use crate::report::{build_rows, ReportRow};
use crate::sources::{
    harvest, CoopListing, Harvest, ListingSource, StreamingListing, COUCH_FILTER,
    SPLITSCREEN_FILTER,
};
use crate::throttle::Throttle;

#[derive(Debug, Clone)]
pub struct RunContext {
    pub settings: Settings,
    pub paths: DataPaths,
    pub options: RankOptions,
    pub fetch_missing: bool,
    pub reference_year: i32,
}

impl RunContext {
    pub fn load(data_dir: &Path, options: RankOptions, fetch_missing: bool) -> Result<Self> {
        Ok(Self {
            settings: Settings::load_or_bootstrap(data_dir)?,
            paths: DataPaths::in_dir(data_dir),
            options,
            fetch_missing,
            reference_year: Utc::now().year(),
        })
    }
}

/// The live client is only built when a query is needed.
#[derive(Clone)]
pub enum MetadataBackend {
    Igdb,
    Api(Arc<dyn MetadataApi>),
}

impl MetadataBackend {
    fn connect(&self, settings: &Settings) -> Result<Arc<dyn MetadataApi>> {
        match self {
            MetadataBackend::Igdb => Ok(Arc::new(IgdbClient::from_settings(settings)?)),
            MetadataBackend::Api(api) => Ok(api.clone()),
        }
    }
}

#[derive(Clone)]
pub struct Sources {
    pub listing: Arc<dyn ListingSource<String>>,
    pub couch: Arc<dyn ListingSource<CoopEntry>>,
    pub splitscreen: Arc<dyn ListingSource<CoopEntry>>,
    pub metadata: MetadataBackend,
}

impl Sources {
    pub fn live(settings: &Settings) -> Result<Self> {
        Ok(Self {
            listing: Arc::new(StreamingListing::new(settings.listing_url.clone())?),
            couch: Arc::new(CoopListing::new(settings.coop_url.clone(), COUCH_FILTER)?),
            splitscreen: Arc::new(CoopListing::new(
                settings.coop_url.clone(),
                SPLITSCREEN_FILTER,
            )?),
            metadata: MetadataBackend::Igdb,
        })
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub titles: usize,
    pub from_cache: usize,
    pub fetched: usize,
    pub not_found: Vec<String>,
    pub coop_games: usize,
    pub rows: Vec<ReportRow>,
}

/// Titles -> metadata -> co-op catalog -> ranking -> report rows.
pub async fn run(ctx: &RunContext, sources: &Sources) -> Result<RunOutcome> {
    let (titles, until) = load_titles(ctx, sources).await?;
    info!("{} titles", titles.len());

    let enrichment = load_metadata(ctx, sources, &titles).await?;
    info!(
        "found {} in local DB, retrieved {} more",
        enrichment.from_cache, enrichment.fetched
    );
    if !enrichment.not_found.is_empty() {
        info!("{} titles have no metadata", enrichment.not_found.len());
    }

    let coop = load_coop_catalog(ctx, sources).await?;

    let ranked = rank(&enrichment.records, &coop, &ctx.options);
    info!(
        mode = %ctx.options.mode,
        shown = ranked.len(),
        "Ranked {} games",
        enrichment.records.len()
    );
    let rows = build_rows(&ranked, &coop, &until);

    Ok(RunOutcome {
        titles: titles.len(),
        from_cache: enrichment.from_cache,
        fetched: enrichment.fetched,
        not_found: enrichment.not_found,
        coop_games: coop.len(),
        rows,
    })
}

async fn load_titles(ctx: &RunContext, sources: &Sources) -> Result<(Vec<String>, UntilDates)> {
    if let Some(titles) = cache::load_titles(&ctx.paths.titles)? {
        let until = cache::load_until_dates(&ctx.paths.until_dates)?;
        info!("Using title snapshot {}", ctx.paths.titles.display());
        return Ok((titles, until));
    }

    let listing: Harvest<String> = harvest(sources.listing.as_ref()).await?;
    let (titles, until) = extract_titles(&listing.entries, ctx.reference_year);
    cache::save_titles(&ctx.paths.titles, &titles)?;
    cache::save_json(&ctx.paths.until_dates, &until)?;
    Ok((titles, until))
}

async fn load_metadata(
    ctx: &RunContext,
    sources: &Sources,
    titles: &[String],
) -> Result<Enrichment> {
    let (cache, populate) = match MetadataCache::load(&ctx.paths.metadata)? {
        Some(cache) => {
            info!(
                "Loaded {} cached games from {}",
                cache.len(),
                ctx.paths.metadata.display()
            );
            (cache, ctx.fetch_missing)
        }
        None => (MetadataCache::default(), true),
    };

    let mut throttle = Throttle::default();
    if !populate {
        return Ok(enrich(titles, &cache, None, &mut throttle).await);
    }

    let api = sources.metadata.connect(&ctx.settings)?;
    let enrichment = enrich(titles, &cache, Some(api.as_ref()), &mut throttle).await;
    let stored = merged_store(cache.records(), &enrichment.records);
    cache::save_json(&ctx.paths.metadata, &stored)?;
    info!("Saved {} games to {}", stored.len(), ctx.paths.metadata.display());
    Ok(enrichment)
}

fn merged_store(cached: &[MetadataRecord], current: &[MetadataRecord]) -> Vec<MetadataRecord> {
    let mut stored = cached.to_vec();
    for record in current {
        let known = stored
            .iter()
            .any(|r| r.key_name == record.key_name && r.name == record.name);
        if !known {
            stored.push(record.clone());
        }
    }
    stored
}

async fn load_coop_catalog(ctx: &RunContext, sources: &Sources) -> Result<CoopCatalog> {
    let couch = load_coop_list(&ctx.paths.couch_coop, sources.couch.as_ref()).await?;
    let splitscreen =
        load_coop_list(&ctx.paths.splitscreen_coop, sources.splitscreen.as_ref()).await?;
    let catalog = CoopCatalog::merge(couch, splitscreen);
    info!("{} local co-op games", catalog.len());
    Ok(catalog)
}

async fn load_coop_list(
    path: &Path,
    source: &dyn ListingSource<CoopEntry>,
) -> Result<Vec<CoopEntry>> {
    if let Some(entries) = cache::load_json::<Vec<CoopEntry>>(path)? {
        return Ok(entries);
    }
    let listing: Harvest<CoopEntry> = harvest(source).await?;
    cache::save_json(path, &listing.entries)?;
    info!("saved {} co-op games to {}", listing.entries.len(), path.display());
    Ok(listing.entries)
}
