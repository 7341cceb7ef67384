///! Batch card generation
///!
///! Resolves a name/color query against the store and renders one card per
///! match, refusing queries that are too broad.

use std::path::{Path, PathBuf};

use super::renderer::CardRender;
use super::store::TitleStore;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    NotFound,
    /// Match count at or above the limit; nothing was rendered
    TooManyMatches(usize),
    /// One entry per match in query order, `None` where the frame was missing
    Rendered(Vec<Option<PathBuf>>),
}

pub struct BatchGenerator<R: CardRender> {
    store: TitleStore,
    renderer: R,
    max_matches: usize,
}

impl<R: CardRender> BatchGenerator<R> {
    pub fn new(store: TitleStore, renderer: R, max_matches: usize) -> Self {
        Self {
            store,
            renderer,
            max_matches,
        }
    }

    pub fn generate(
        &self,
        name: Option<&str>,
        color: Option<&str>,
        output_dir: &Path,
    ) -> Result<BatchOutcome> {
        let name = name.filter(|s| !s.is_empty());
        let color = color.filter(|s| !s.is_empty());

        let matches = self.store.find_by_name_and_color(name, color)?;
        tracing::info!(
            "Query name={:?} color={:?} matched {} titles",
            name,
            color,
            matches.len()
        );

        if matches.is_empty() {
            return Ok(BatchOutcome::NotFound);
        }
        if matches.len() >= self.max_matches {
            tracing::warn!("{} matches is over the limit of {}", matches.len(), self.max_matches);
            return Ok(BatchOutcome::TooManyMatches(matches.len()));
        }

        std::fs::create_dir_all(output_dir)?;

        let mut rendered = Vec::with_capacity(matches.len());
        for (idx, record) in matches.iter().enumerate() {
            let output_path = output_dir.join(card_file_name(&record.name, idx + 1));
            rendered.push(self.renderer.render(record, &output_path)?);
        }

        Ok(BatchOutcome::Rendered(rendered))
    }
}

/// `"A/B Test #1"`, 1 → `AB_Test_1_1.png`
pub fn card_file_name(name: &str, index: usize) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    format!("{}_{}.png", kept.trim().replace(' ', "_"), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use taiko_common::TitleRecord;

    /// Records every call; pretends frames for "none" are missing
    #[derive(Default)]
    struct CountingRenderer {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl CardRender for &CountingRenderer {
        fn render(&self, record: &TitleRecord, output_path: &Path) -> Result<Option<PathBuf>> {
            self.calls.borrow_mut().push(output_path.to_path_buf());
            if record.rarity_color == "none" {
                Ok(None)
            } else {
                Ok(Some(output_path.to_path_buf()))
            }
        }
    }

    fn seeded_store(dir: &Path, versions: usize) -> TitleStore {
        let store = TitleStore::new(dir.join("titles.db"));
        for i in 0..versions {
            store
                .upsert("達人", true, &format!("#{:06}", i), "条件", "")
                .unwrap();
        }
        store.upsert("月下打人", true, "none", "条件", "").unwrap();
        store
    }

    #[test]
    fn test_card_file_name() {
        assert_eq!(card_file_name("A/B Test #1", 1), "AB_Test_1_1.png");
        assert_eq!(card_file_name("  太鼓の達人  ", 2), "太鼓の達人_2.png");
        assert_eq!(card_file_name("x-y_z", 3), "x-y_z_3.png");
    }

    #[test]
    fn test_too_many_matches_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::default();
        let batch = BatchGenerator::new(seeded_store(dir.path(), 5), &renderer, 5);

        let outcome = batch.generate(Some("達人"), None, &dir.path().join("out")).unwrap();
        assert_eq!(outcome, BatchOutcome::TooManyMatches(5));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_under_limit_renders_each_match() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::default();
        let batch = BatchGenerator::new(seeded_store(dir.path(), 4), &renderer, 5);
        let out = dir.path().join("out");

        let outcome = batch.generate(Some("達人"), Some(""), &out).unwrap();
        let BatchOutcome::Rendered(paths) = outcome else {
            panic!("expected rendered outcome");
        };
        assert_eq!(paths.len(), 4);
        assert_eq!(renderer.calls.borrow().len(), 4);
        assert_eq!(paths[0], Some(out.join("達人_1.png")));
        assert_eq!(paths[3], Some(out.join("達人_4.png")));
        assert!(out.is_dir());
    }

    #[test]
    fn test_missing_frame_is_kept_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::default();
        let batch = BatchGenerator::new(seeded_store(dir.path(), 1), &renderer, 5);

        let outcome = batch.generate(None, Some("none"), &dir.path().join("out")).unwrap();
        assert_eq!(outcome, BatchOutcome::Rendered(vec![None]));
    }

    #[test]
    fn test_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::default();
        let batch = BatchGenerator::new(seeded_store(dir.path(), 1), &renderer, 5);

        let outcome = batch.generate(Some("存在しない"), None, &dir.path().join("out")).unwrap();
        assert_eq!(outcome, BatchOutcome::NotFound);
        assert!(!dir.path().join("out").exists());
    }
}
