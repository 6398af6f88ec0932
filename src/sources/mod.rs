use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ParseFailure;

mod coop_listing;
mod streaming;

pub use coop_listing::{parse_coop_rows, CoopListing, COUCH_FILTER, SPLITSCREEN_FILTER};
pub use streaming::{parse_listing_items, StreamingListing};

pub const MAX_PAGES: u32 = 500;

/// A paged external listing. Pages are numbered from 1; a page with no
/// successfully parsed rows ends the listing.
#[async_trait]
pub trait ListingSource<T: Send>: Send + Sync {
    fn label(&self) -> &str;

    async fn fetch_page(&self, page: u32) -> Result<Vec<Result<T, ParseFailure>>>;
}

#[derive(Debug)]
pub struct Harvest<T> {
    pub entries: Vec<T>,
    pub failures: Vec<ParseFailure>,
    pub pages: u32,
    /// The page cap was reached before the listing ran out.
    pub truncated: bool,
}

pub async fn harvest<T, S>(source: &S) -> Result<Harvest<T>>
where
    T: Send,
    S: ListingSource<T> + ?Sized,
{
    let mut entries = Vec::new();
    let mut failures = Vec::new();
    let mut pages = 0;
    let mut truncated = true;

    for page in 1..=MAX_PAGES {
        let rows = source
            .fetch_page(page)
            .await
            .with_context(|| format!("Failed to fetch page {} of {}", page, source.label()))?;
        pages = page;

        let mut parsed = 0usize;
        for row in rows {
            match row {
                Ok(entry) => {
                    entries.push(entry);
                    parsed += 1;
                }
                Err(failure) => failures.push(failure),
            }
        }
        debug!(page, parsed, "Fetched {} page", source.label());
        if parsed == 0 {
            truncated = false;
            break;
        }
    }

    if truncated {
        warn!(
            "Stopped {} after {} pages; the listing may be incomplete",
            source.label(),
            MAX_PAGES
        );
    }

    info!(
        "Collected {} entries from {} ({} pages)",
        entries.len(),
        source.label(),
        pages
    );
    if !failures.is_empty() {
        warn!(
            "Skipped {} unparsable rows from {}",
            failures.len(),
            source.label()
        );
        for failure in &failures {
            debug!("{}", failure);
        }
    }

    Ok(Harvest {
        entries,
        failures,
        pages,
        truncated,
    })
}

pub(crate) fn http_client() -> Result<Client> {
    let user_agent = format!("nowrank/{}", env!("CARGO_PKG_VERSION"));
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .build()
        .context("Failed to build listing HTTP client")
}

pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let res = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?;
    let status = res.status();
    let text = res.text().await.context("reading body failed")?;
    if !status.is_success() {
        anyhow::bail!("{} -> HTTP {}", url, status);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakePages {
        pages: HashMap<u32, Vec<Result<String, ParseFailure>>>,
    }

    #[async_trait]
    impl ListingSource<String> for FakePages {
        fn label(&self) -> &str {
            "fake listing"
        }

        async fn fetch_page(&self, page: u32) -> Result<Vec<Result<String, ParseFailure>>> {
            Ok(self.pages.get(&page).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn stops_at_first_page_without_parsed_rows() {
        let source = FakePages {
            pages: HashMap::from([
                (1, vec![Ok("a".to_string()), Err(ParseFailure::new("<tr>", "no name"))]),
                (2, vec![Ok("b".to_string())]),
                (3, vec![Err(ParseFailure::new("<tr/>", "no cells"))]),
                (4, vec![Ok("never".to_string())]),
            ]),
        };
        let harvest: Harvest<String> = harvest(&source).await.expect("harvest");
        assert_eq!(harvest.entries, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(harvest.failures.len(), 2);
        assert_eq!(harvest.pages, 3);
        assert!(!harvest.truncated);
    }

    struct EndlessPages;

    #[async_trait]
    impl ListingSource<String> for EndlessPages {
        fn label(&self) -> &str {
            "endless listing"
        }

        async fn fetch_page(&self, page: u32) -> Result<Vec<Result<String, ParseFailure>>> {
            Ok(vec![Ok(format!("row {page}"))])
        }
    }

    #[tokio::test]
    async fn page_cap_marks_the_harvest_truncated() {
        let harvest: Harvest<String> = harvest(&EndlessPages).await.expect("harvest");
        assert!(harvest.truncated);
        assert_eq!(harvest.pages, MAX_PAGES);
        assert_eq!(harvest.entries.len(), MAX_PAGES as usize);
    }

    #[tokio::test]
    async fn empty_listing_is_not_an_error() {
        let source = FakePages {
            pages: HashMap::new(),
        };
        let harvest: Harvest<String> = harvest(&source).await.expect("harvest");
        assert!(harvest.entries.is_empty());
        assert_eq!(harvest.pages, 1);
    }
}
