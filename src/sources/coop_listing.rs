use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use super::{fetch_text, http_client, ListingSource};
use crate::error::ParseFailure;
use crate::models::CoopEntry;

pub const COUCH_FILTER: &str = "&couch=true";
pub const SPLITSCREEN_FILTER: &str = "&splitscreen=true";

const MIN_CELLS: usize = 8;

pub struct CoopListing {
    client: Client,
    base_url: String,
    filter: String,
    label: String,
}

impl CoopListing {
    pub fn new(base_url: impl Into<String>, filter: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
            filter: filter.to_string(),
            label: format!("co-op listing ({})", filter.trim_start_matches('&')),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}{}&page={}", self.base_url, self.filter, page)
    }
}

#[async_trait]
impl ListingSource<CoopEntry> for CoopListing {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<Result<CoopEntry, ParseFailure>>> {
        let html = fetch_text(&self.client, &self.page_url(page)).await?;
        if html.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_coop_rows(&html)
    }
}

// The endpoint returns bare <tr> rows; they only parse inside a table.
pub fn parse_coop_rows(html: &str) -> Result<Vec<Result<CoopEntry, ParseFailure>>> {
    let fragment = Html::parse_fragment(&format!("<table>{html}</table>"));
    let row_selector = selector("tr.result_row")?;
    let overall_selector = selector("div.score-bar.mini.overall > div")?;
    let coop_selector = selector("div.score-bar.mini.co-op > div")?;

    Ok(fragment
        .select(&row_selector)
        .map(|tr| parse_row(tr, &overall_selector, &coop_selector))
        .collect())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("bad selector '{css}': {e}"))
}

fn parse_row(
    tr: ElementRef<'_>,
    overall_selector: &Selector,
    coop_selector: &Selector,
) -> Result<CoopEntry, ParseFailure> {
    let cells: Vec<ElementRef<'_>> = children_named(tr, "td").collect();
    if cells.len() < MIN_CELLS {
        return Err(ParseFailure::new(
            tr.html(),
            format!("expected {} cells, found {}", MIN_CELLS, cells.len()),
        ));
    }

    let name = children_named(cells[0], "strong")
        .next()
        .map(text_of)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseFailure::new(tr.html(), "missing game name"))?;
    let category = children_named(cells[0], "label").next().map(text_of);

    let score = |sel: &Selector| cells[5].select(sel).next().map(text_of);

    Ok(CoopEntry {
        id: tr.value().attr("id").unwrap_or_default().to_string(),
        shortname: tr.value().attr("title").unwrap_or_default().to_string(),
        name,
        category,
        num_online: Some(text_of(cells[1])),
        num_couch: Some(text_of(cells[2])),
        num_combo: Some(text_of(cells[3])),
        score_overall: score(overall_selector),
        score_coop: score(coop_selector),
        released: Some(text_of(cells[7])),
    })
}

fn children_named<'a>(
    el: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |c| c.value().name() == tag)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"
<tr class="result_row" id="2301" title="overcooked">
  <td><strong>Overcooked</strong><label>Simulation</label></td>
  <td>4</td><td>4</td><td>4</td><td></td>
  <td>
    <div class="score-bar mini overall"><div>4.5</div></div>
    <div class="score-bar mini co-op"><div>5.0</div></div>
  </td>
  <td></td>
  <td>August 2, 2016</td>
</tr>"#;

    #[test]
    fn parses_a_full_row() {
        let rows = parse_coop_rows(ROW).expect("parse");
        assert_eq!(rows.len(), 1);
        let entry = rows[0].as_ref().expect("row");
        assert_eq!(entry.id, "2301");
        assert_eq!(entry.shortname, "overcooked");
        assert_eq!(entry.name, "Overcooked");
        assert_eq!(entry.category.as_deref(), Some("Simulation"));
        assert_eq!(entry.num_couch.as_deref(), Some("4"));
        assert_eq!(entry.score_overall.as_deref(), Some("4.5"));
        assert_eq!(entry.score_coop.as_deref(), Some("5.0"));
        assert_eq!(entry.released.as_deref(), Some("August 2, 2016"));
    }

    #[test]
    fn bad_rows_fail_individually() {
        let html = format!(
            r#"{ROW}
<tr class="result_row" id="1"><td><strong>Short row</strong></td><td>2</td></tr>
<tr class="result_row" id="2"><td>no name</td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>
<tr class="other"><td>ignored</td></tr>"#
        );
        let rows = parse_coop_rows(&html).expect("parse");
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        let short = rows[1].as_ref().unwrap_err();
        assert!(short.reason.contains("expected 8 cells"));
        assert!(short.fragment.contains("Short row"));
        let nameless = rows[2].as_ref().unwrap_err();
        assert_eq!(nameless.reason, "missing game name");
    }

    #[test]
    fn builds_paged_urls() {
        let listing = CoopListing::new("https://coop.test/ajax?system=22", COUCH_FILTER)
            .expect("listing");
        assert_eq!(
            listing.page_url(3),
            "https://coop.test/ajax?system=22&couch=true&page=3"
        );
        assert_eq!(listing.label(), "co-op listing (couch=true)");
    }
}
