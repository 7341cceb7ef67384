///! Title card renderer
///!
///! A card is the rarity frame on a white canvas with an SVG layer drawn on
///! top: border, title, availability and the wrapped condition and tips.

use resvg::tiny_skia::{Color, Pixmap, PixmapPaint, Transform};
use resvg::usvg::Tree;
use std::path::{Path, PathBuf};
use taiko_common::TitleRecord;

use super::escape_xml;
use super::fonts::FontBook;
use super::layout::{CardLayout, LayoutParams, TextBlock};
use super::localize::Localizer;
use crate::config::{CardLabels, TitlesConfig};
use crate::error::{Result, TitleError};

const CARD_TEMPLATE: &str = include_str!("../../../resources/card_template.svg");
const BORDER_WIDTH: u32 = 2;

/// Renders one title record to a PNG file
pub trait CardRender {
    /// `Ok(None)` when no frame exists for the record's color; nothing is written then.
    fn render(&self, record: &TitleRecord, output_path: &Path) -> Result<Option<PathBuf>>;
}

pub struct CardRenderer {
    resources_dir: PathBuf,
    params: LayoutParams,
    labels: CardLabels,
    localizer: Localizer,
    fonts: FontBook,
}

impl CardRenderer {
    pub fn new(config: &TitlesConfig) -> Self {
        Self {
            resources_dir: config.resources_dir.clone(),
            params: LayoutParams::from(&config.card),
            labels: config.card.labels.clone(),
            localizer: Localizer::with_extra(&config.card.replacements),
            fonts: FontBook::resolve(&config.font_file),
        }
    }

    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    /// `#DED523` → `<resources>/#ded523.png`
    pub fn frame_path(&self, rarity_color: &str) -> PathBuf {
        let key = rarity_color.trim().trim_start_matches('#').to_lowercase();
        self.resources_dir.join(format!("#{}.png", key))
    }

    fn load_frame(&self, rarity_color: &str) -> Result<Pixmap> {
        let path = self.frame_path(rarity_color);
        if !path.is_file() {
            return Err(TitleError::MissingAsset(path));
        }
        Pixmap::load_png(&path).map_err(|e| {
            tracing::warn!("Frame {} could not be decoded: {}", path.display(), e);
            TitleError::MissingAsset(path)
        })
    }

    fn build_svg(&self, record: &TitleRecord, layout: &CardLayout) -> String {
        let mut content = String::new();

        content.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" class="title" text-anchor="middle" dominant-baseline="central">{v}</text>"#,
            x = layout.title_x,
            y = layout.title_y,
            v = escape_xml(&record.name),
        ));

        let (answer, class) = if record.available {
            (&self.labels.yes, "available")
        } else {
            (&self.labels.no, "unavailable")
        };
        content.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" class="{class}" dominant-baseline="text-before-edge">{v}</text>"#,
            x = layout.text_x,
            y = layout.availability_y,
            class = class,
            v = escape_xml(&format!("{}: {}", self.labels.available, answer)),
        ));

        self.push_block(&mut content, layout, &layout.condition, &self.labels.condition, "condition", true);
        if let Some(tips) = &layout.tips {
            self.push_block(&mut content, layout, tips, &self.labels.tips, "tips", false);
        }

        CARD_TEMPLATE
            .replace("{{WIDTH}}", &layout.width.to_string())
            .replace("{{HEIGHT}}", &layout.height.to_string())
            .replace("{{FONT_FAMILY}}", &escape_xml(&self.fonts.css_family()))
            .replace("{{TITLE_SIZE}}", &self.params.title_font_size.to_string())
            .replace("{{BODY_SIZE}}", &self.params.body_font_size.to_string())
            .replace("{{BORDER_WIDTH}}", &layout.width.saturating_sub(BORDER_WIDTH).to_string())
            .replace("{{BORDER_HEIGHT}}", &layout.height.saturating_sub(BORDER_WIDTH).to_string())
            .replace("{{CONTENT}}", &content)
    }

    /// Header plus indented lines; term replacement only where `localize` is set
    fn push_block(
        &self,
        out: &mut String,
        layout: &CardLayout,
        block: &TextBlock,
        header: &str,
        class: &str,
        localize: bool,
    ) {
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" class="label" dominant-baseline="text-before-edge">{v}</text>"#,
            x = layout.text_x,
            y = block.header_y,
            v = escape_xml(&format!("{}:", header)),
        ));

        for line in &block.lines {
            let text = if localize {
                self.localizer.apply(&line.text)
            } else {
                line.text.clone()
            };
            out.push_str(&format!(
                r#"<text x="{x:.1}" y="{y:.1}" class="{class}" dominant-baseline="text-before-edge" xml:space="preserve">{v}</text>"#,
                x = layout.body_x,
                y = line.y,
                class = class,
                v = escape_xml(&text),
            ));
        }
    }

    fn rasterize(&self, svg: &str, frame: &Pixmap, layout: &CardLayout) -> Result<Pixmap> {
        let tree = Tree::from_str(svg, &self.fonts.options())
            .map_err(|e| TitleError::Render(format!("failed to parse card SVG: {}", e)))?;

        let mut pixmap = Pixmap::new(layout.width, layout.height)
            .ok_or_else(|| TitleError::Render(format!("invalid canvas {}x{}", layout.width, layout.height)))?;
        pixmap.fill(Color::WHITE);
        pixmap.draw_pixmap(
            layout.frame_x,
            layout.frame_y,
            frame.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl CardRender for CardRenderer {
    fn render(&self, record: &TitleRecord, output_path: &Path) -> Result<Option<PathBuf>> {
        let frame = match self.load_frame(&record.rarity_color) {
            Ok(frame) => frame,
            Err(TitleError::MissingAsset(path)) => {
                tracing::warn!(
                    "No frame for color '{}' ({}), skipping {}",
                    record.rarity_color,
                    path.display(),
                    record.name
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let layout = CardLayout::compute(
            record,
            (frame.width(), frame.height()),
            &self.params,
            &self.fonts,
        );
        let svg = self.build_svg(record, &layout);
        let pixmap = self.rasterize(&svg, &frame, &layout)?;

        let png = pixmap
            .encode_png()
            .map_err(|e| TitleError::Render(format!("failed to encode PNG: {}", e)))?;
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, png)?;

        tracing::info!("Generated title card: {}", output_path.display());
        Ok(Some(output_path.to_path_buf()))
    }
}
