///! Fixed term replacements applied to card body text

use crate::config::Replacement;

/// Order matters: `ドンダフルコンボ` must go before `フルコンボ`
const BUILTIN_REPLACEMENTS: &[(&str, &str)] = &[
    ("おに", "鬼"),
    ("ドンダフルコンボ", "全良"),
    ("フルコンボ", "全連"),
];

#[derive(Debug, Clone)]
pub struct Localizer {
    pairs: Vec<(String, String)>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self {
            pairs: BUILTIN_REPLACEMENTS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl Localizer {
    /// Built-in pairs followed by `extra`
    pub fn with_extra(extra: &[Replacement]) -> Self {
        let mut localizer = Self::default();
        localizer.pairs.extend(
            extra
                .iter()
                .filter(|r| !r.pattern.is_empty())
                .map(|r| (r.pattern.clone(), r.replacement.clone())),
        );
        localizer
    }

    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}
