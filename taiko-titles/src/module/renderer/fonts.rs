///! Font resolution for title cards
///!
///! Order: bundled font file, then known platform CJK fonts, then whatever
///! the system has. With no face at all, text is measured with built-in metrics.

use resvg::usvg::{Options, Tree, fontdb::Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::escape_xml;
use super::measure::{TextMeasure, estimate_width};

/// Fonts that ship Japanese glyphs, probed in order
const PLATFORM_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "C:\\Windows\\Fonts\\msmincho.ttc",
    "C:\\Windows\\Fonts\\yugothm.ttc",
    "C:\\Windows\\Fonts\\YuGothR.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
];

/// Family name fragments preferred when falling back to system fonts
const CJK_FAMILY_HINTS: &[&str] = &["CJK", "Gothic", "Hiragino", "Hei", "Mincho", "Meiryo"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Bundled(PathBuf),
    Platform(PathBuf),
    System,
    BuiltIn,
}

/// Loaded font faces plus the family used for every text element
#[derive(Clone)]
pub struct FontBook {
    db: Arc<Database>,
    family: Option<String>,
    source: FontSource,
}

impl FontBook {
    /// Resolve fonts, preferring `bundled` when it exists
    pub fn resolve(bundled: &Path) -> Self {
        if bundled.exists() {
            if let Some(book) = Self::from_file(bundled, FontSource::Bundled(bundled.to_path_buf())) {
                tracing::debug!("Using bundled font {}", bundled.display());
                return book;
            }
            tracing::warn!("Bundled font {} could not be loaded", bundled.display());
        }

        for candidate in PLATFORM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                if let Some(book) = Self::from_file(path, FontSource::Platform(path.to_path_buf())) {
                    tracing::debug!("Using platform font {}", path.display());
                    return book;
                }
            }
        }

        tracing::warn!("No Japanese font found; falling back to system fonts, non-Latin glyphs may not render");
        Self::system().unwrap_or_else(|| {
            tracing::warn!("No usable font faces at all; text will be measured with built-in metrics");
            Self::builtin()
        })
    }

    /// Installed fonts, preferring a CJK-looking family. `None` when there are none.
    pub fn system() -> Option<Self> {
        let mut db = Database::new();
        db.load_system_fonts();
        let family = pick_family(&db)?;
        Some(Self {
            db: Arc::new(db),
            family: Some(family),
            source: FontSource::System,
        })
    }

    /// No faces; text measured with estimated metrics and not drawn
    pub fn builtin() -> Self {
        Self {
            db: Arc::new(Database::new()),
            family: None,
            source: FontSource::BuiltIn,
        }
    }

    fn from_file(path: &Path, source: FontSource) -> Option<Self> {
        let mut db = Database::new();
        if let Err(e) = db.load_font_file(path) {
            tracing::warn!("Failed to load font {}: {}", path.display(), e);
            return None;
        }
        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())?;
        Some(Self {
            db: Arc::new(db),
            family: Some(family),
            source,
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// CSS `font-family` value for the card template
    pub fn css_family(&self) -> String {
        match &self.family {
            Some(family) => format!("'{}', sans-serif", family.replace('\'', "")),
            None => "sans-serif".to_string(),
        }
    }

    /// usvg options sharing this font database
    pub fn options(&self) -> Options<'static> {
        let mut options = Options::default();
        if let Some(family) = &self.family {
            options.font_family = family.clone();
        }
        options.fontdb = self.db.clone();
        options
    }

    /// Ink width of `text` as laid out by usvg
    fn svg_text_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10000" height="{h}"><text x="0" y="{y}" font-family="{family}" font-size="{size}" xml:space="preserve">{text}</text></svg>"#,
            h = font_size * 3.0,
            y = font_size * 2.0,
            family = escape_xml(&self.css_family()),
            size = font_size,
            text = escape_xml(text),
        );

        match Tree::from_str(&svg, &self.options()) {
            Ok(tree) => Some(tree.root().bounding_box().width()),
            Err(e) => {
                tracing::debug!("Text measurement failed: {}", e);
                None
            }
        }
    }
}

impl TextMeasure for FontBook {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        if self.family.is_none() {
            return estimate_width(text, font_size);
        }
        match self.svg_text_width(text, font_size) {
            // zero ink for visible text: usvg laid nothing out. A face without
            // these glyphs still draws placeholder boxes and lands in the first arm.
            Some(width) if width > 0.0 || text.trim().is_empty() => width,
            _ => estimate_width(text, font_size),
        }
    }
}

fn pick_family(db: &Database) -> Option<String> {
    let families: Vec<&str> = db
        .faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
        .collect();

    families
        .iter()
        .find(|name| CJK_FAMILY_HINTS.iter().any(|hint| name.contains(hint)))
        .or_else(|| families.first())
        .map(|name| name.to_string())
}
