///! Card geometry
///!
///! Everything about where things go on a card is decided here, before any
///! SVG is written, so the height can be known up front.

use taiko_common::TitleRecord;

use super::measure::{TextMeasure, wrap_text};
use crate::config::CardConfig;

pub const PADDING: f32 = 40.0;
pub const LINE_SPACING: f32 = 15.0;
pub const SECTION_SPACING: f32 = 30.0;
/// Gap between wrapped lines of one block
pub const LINE_GAP: f32 = 10.0;
/// Body lines sit this far right of their header
pub const INDENT: f32 = 20.0;
/// Title baseline is this far above the bottom edge of the frame
pub const TITLE_INSET: f32 = 68.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub width: u32,
    pub title_font_size: f32,
    pub body_font_size: f32,
}

impl From<&CardConfig> for LayoutParams {
    fn from(card: &CardConfig) -> Self {
        Self {
            width: card.width,
            title_font_size: card.title_font_size,
            body_font_size: card.body_font_size,
        }
    }
}

impl LayoutParams {
    /// Usable width of an indented body line
    pub fn wrap_width(&self) -> f32 {
        self.width as f32 - 2.0 * PADDING - INDENT
    }

    fn header_height(&self) -> f32 {
        self.body_font_size + LINE_SPACING
    }

    fn line_step(&self) -> f32 {
        self.body_font_size + LINE_GAP
    }

    fn block_height(&self, lines: usize) -> f32 {
        self.header_height() + lines as f32 * self.line_step()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub y: f32,
    pub text: String,
}

/// A header followed by its wrapped, indented lines
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub header_y: f32,
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub frame_x: i32,
    pub frame_y: i32,
    pub title_x: f32,
    pub title_y: f32,
    pub availability_y: f32,
    pub condition: TextBlock,
    /// Absent when the record has no tips
    pub tips: Option<TextBlock>,
    /// Left edge of headers and the availability line
    pub text_x: f32,
    /// Left edge of wrapped body lines
    pub body_x: f32,
}

impl CardLayout {
    pub fn compute(
        record: &TitleRecord,
        frame_size: (u32, u32),
        params: &LayoutParams,
        measure: &dyn TextMeasure,
    ) -> Self {
        let (frame_w, frame_h) = frame_size;
        let frame_h = frame_h as f32;
        let body = params.body_font_size;
        let wrap_width = params.wrap_width();

        let condition_lines = wrap_text(&record.obtain_condition, measure, body, wrap_width);
        let tips_lines = if record.has_tips() {
            Some(wrap_text(&record.tips, measure, body, wrap_width))
        } else {
            None
        };

        let mut height = PADDING + frame_h + SECTION_SPACING;
        height += params.header_height();
        height += SECTION_SPACING;
        height += params.block_height(condition_lines.len());
        if let Some(lines) = &tips_lines {
            height += SECTION_SPACING + params.block_height(lines.len());
        }
        height += PADDING;

        let frame_x = (params.width as i32 - frame_w as i32).div_euclid(2);
        let frame_y = PADDING as i32;

        let mut y = PADDING + frame_h + SECTION_SPACING;
        let availability_y = y;
        y += params.header_height() + SECTION_SPACING;

        let condition = place_block(&mut y, condition_lines, params.line_step());
        let tips = tips_lines.map(|lines| {
            y += SECTION_SPACING;
            place_block(&mut y, lines, params.line_step())
        });

        Self {
            width: params.width,
            height: height.ceil() as u32,
            frame_x,
            frame_y,
            title_x: params.width as f32 / 2.0,
            title_y: frame_y as f32 + frame_h - TITLE_INSET,
            availability_y,
            condition,
            tips,
            text_x: PADDING,
            body_x: PADDING + INDENT,
        }
    }
}

fn place_block(y: &mut f32, lines: Vec<String>, step: f32) -> TextBlock {
    let header_y = *y;
    *y += step;
    let lines = lines
        .into_iter()
        .map(|text| {
            let line = PlacedLine { y: *y, text };
            *y += step;
            line
        })
        .collect();
    TextBlock { header_y, lines }
}
