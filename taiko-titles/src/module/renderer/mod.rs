///! Title card rendering: fonts, measurement, layout and the PNG writer

pub mod card;
pub mod fonts;
pub mod layout;
pub mod localize;
pub mod measure;

pub use card::{CardRender, CardRenderer};
pub use fonts::{FontBook, FontSource};
pub use layout::{CardLayout, LayoutParams};
pub use localize::Localizer;
pub use measure::{TextMeasure, wrap_text};

pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
