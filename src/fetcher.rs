use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::cache::MetadataCache;
use crate::igdb::MetadataApi;
use crate::matcher::match_metadata;
use crate::models::MetadataRecord;
use crate::throttle::Throttle;

#[derive(Debug, Default)]
pub struct Enrichment {
    pub records: Vec<MetadataRecord>,
    pub from_cache: usize,
    pub fetched: usize,
    pub not_found: Vec<String>,
}

/// Without an `api`, uncached titles are skipped.
pub async fn enrich(
    titles: &[String],
    cache: &MetadataCache,
    api: Option<&dyn MetadataApi>,
    throttle: &mut Throttle,
) -> Enrichment {
    let mut out = Enrichment::default();
    let mut seen = HashSet::new();
    let mut queried: HashSet<&str> = HashSet::new();

    for title in titles {
        if let Some(hit) = cache.lookup(title) {
            let identity = (hit.key_name.clone(), hit.name.clone());
            if seen.insert(identity) {
                out.records.push(hit.clone());
            }
            out.from_cache += 1;
            continue;
        }

        let Some(api) = api else {
            continue;
        };
        if !queried.insert(title.as_str()) {
            debug!("Already queried '{}' this run", title);
            continue;
        }

        match throttle.run(api.search_games(title)).await {
            Ok(candidates) => match match_metadata(title, &candidates) {
                Some(best) => {
                    info!("Found game in metadata catalog: {} == {}", title, best.name);
                    let mut record = best.clone();
                    record.key_name = Some(title.clone());
                    if seen.insert((record.key_name.clone(), record.name.clone())) {
                        out.records.push(record);
                        out.fetched += 1;
                    }
                }
                None => {
                    info!("Game NOT FOUND in metadata catalog: {}", title);
                    out.not_found.push(title.clone());
                }
            },
            Err(e) => {
                warn!("Metadata query for '{}' failed, skipping: {}", title, e);
                out.not_found.push(title.clone());
            }
        }
    }

    out
}
