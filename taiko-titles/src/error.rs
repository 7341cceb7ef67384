///! Error types shared by the store, scraper and renderer

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    /// No frame image exists (or decodes) for a rarity color
    #[error("frame asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    /// A scraped table row could not be turned into a title
    #[error("malformed row {row}: {reason}")]
    RowParse { row: usize, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, TitleError>;
