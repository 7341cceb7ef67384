///! Title list updater
///!
///! Fetches the wiki title list, parses it and upserts every row into the store.

use reqwest::Client;
use std::fmt;

use super::parser::{ScrapedPage, parse_titles_html};
use crate::error::{Result, TitleError};
use crate::module::store::{TitleStore, Upsert};

/// Counters for one scrape run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Table rows found on the page
    pub found: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Rows dropped by the parser or rejected by the store
    pub skipped: usize,
}

impl fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rows: {}, inserted: {}, updated: {}, skipped: {}",
            self.found, self.inserted, self.updated, self.skipped
        )
    }
}

/// Owns the HTTP client used to fetch the title list
pub struct TitleScraper {
    client: Client,
    url: String,
}

impl TitleScraper {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// GET the title list page
    pub async fn fetch_page(&self) -> Result<String> {
        tracing::info!("Fetching title list from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(TitleError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        tracing::debug!("Fetched {} bytes", body.len());
        Ok(body)
    }

    /// Fetch → parse → upsert one cycle
    pub async fn update(&self, store: &TitleStore) -> Result<ScrapeReport> {
        let html = self.fetch_page().await?;
        let page = parse_titles_html(&html)?;
        tracing::info!("Found {} title rows", page.row_count);
        Ok(store_page(store, &page))
    }
}

/// Upsert every parsed row; a row the store rejects is logged and skipped
pub fn store_page(store: &TitleStore, page: &ScrapedPage) -> ScrapeReport {
    let mut report = ScrapeReport {
        found: page.row_count,
        skipped: page.skipped,
        ..Default::default()
    };

    for title in &page.titles {
        match store.upsert(
            &title.name,
            title.available,
            &title.rarity_color,
            &title.obtain_condition,
            &title.tips,
        ) {
            Ok(Upsert::Inserted(_)) => {
                report.inserted += 1;
                tracing::info!("New title: {} ({})", title.name, title.rarity_color);
            }
            Ok(Upsert::Updated(_)) => report.updated += 1,
            Err(e) => {
                tracing::warn!("Failed to store title {}: {}", title.name, e);
                report.skipped += 1;
            }
        }
    }

    tracing::info!("Title list stored. {}", report);
    report
}
