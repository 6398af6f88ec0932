use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use super::{fetch_text, http_client, ListingSource};
use crate::error::ParseFailure;

pub struct StreamingListing {
    client: Client,
    url: String,
}

impl StreamingListing {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ListingSource<String> for StreamingListing {
    fn label(&self) -> &str {
        "streaming listing"
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<Result<String, ParseFailure>>> {
        if page > 1 {
            return Ok(Vec::new());
        }
        let html = fetch_text(&self.client, &self.url).await?;
        Ok(parse_listing_items(&html)?.into_iter().map(Ok).collect())
    }
}

pub fn parse_listing_items(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let item_selector =
        Selector::parse("section.text > ul > li").map_err(|e| anyhow!("bad selector: {e}"))?;

    Ok(document
        .select(&item_selector)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
