///! Title image request handling
///!
///! Turns a batch outcome (or any failure below it) into a `GenerateResponse`.
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use taiko_common::GenerateResponse;

use super::batch::{BatchGenerator, BatchOutcome};
use super::renderer::{CardRender, CardRenderer};
use super::store::TitleStore;
use crate::config::TitlesConfig;

/// Title image generator with store and renderer wired in
pub struct TitleImageService<R: CardRender = CardRenderer> {
    batch: BatchGenerator<R>,
}

impl TitleImageService<CardRenderer> {
    pub fn from_config(config: &TitlesConfig) -> Self {
        let store = TitleStore::new(&config.database_path);
        let renderer = CardRenderer::new(config);
        Self::new(BatchGenerator::new(store, renderer, config.max_matches))
    }
}

impl<R: CardRender> TitleImageService<R> {
    pub fn new(batch: BatchGenerator<R>) -> Self {
        Self { batch }
    }

    /// Generate cards for every title matching `title` and `color`.
    /// Never fails; problems are reported in the response.
    pub fn generate(&self, title: Option<&str>, color: Option<&str>, output_dir: &Path) -> GenerateResponse {
        let result = catch_unwind(AssertUnwindSafe(|| self.batch.generate(title, color, output_dir)));

        let response = match result {
            Ok(Ok(outcome)) => Self::respond(outcome),
            Ok(Err(e)) => {
                tracing::error!("Card generation failed: {}", e);
                GenerateResponse::failure(format!("Failed to generate title images: {}", e))
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("Card generation panicked: {}", reason);
                GenerateResponse::failure(format!("Failed to generate title images: {}", reason))
            }
        };

        tracing::info!("Generate request finished: {}", response.message);
        response
    }

    fn respond(outcome: BatchOutcome) -> GenerateResponse {
        match outcome {
            BatchOutcome::NotFound => GenerateResponse::failure("No matching titles found"),
            BatchOutcome::TooManyMatches(n) => GenerateResponse::failure(format!(
                "Found {} matching titles, please refine your query with a more specific name or a color",
                n
            )),
            BatchOutcome::Rendered(results) => {
                let total = results.len();
                let images: Vec<PathBuf> = results.into_iter().flatten().collect();
                let skipped = total - images.len();

                if images.is_empty() {
                    GenerateResponse::failure(format!(
                        "No image generated, {} matching titles have no frame asset",
                        skipped
                    ))
                } else if skipped > 0 {
                    let message = format!(
                        "Generated {} title images, skipped {} without a frame asset",
                        images.len(),
                        skipped
                    );
                    GenerateResponse::success(images, message)
                } else {
                    let message = format!("Generated {} title images", images.len());
                    GenerateResponse::success(images, message)
                }
            }
        }
    }
}
