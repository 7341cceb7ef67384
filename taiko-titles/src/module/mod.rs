pub mod batch;
pub mod handler;
pub mod renderer;
pub mod scraper;
pub mod store;
