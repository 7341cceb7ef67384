///! Wiki title list scraper
///!
///! Fetches the title table, parses each row and upserts it into the store.

pub mod parser;
pub mod updater;

pub use parser::{ScrapedPage, ScrapedTitle, parse_titles_html};
pub use updater::{ScrapeReport, TitleScraper, store_page};
