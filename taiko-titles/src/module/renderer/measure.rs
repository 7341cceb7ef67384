///! Text measurement and greedy character wrapping

/// Pixel width of a single line of text at a given font size
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Built-in metrics used when no font face is available: full-width
/// characters take one em, everything else a bit over half an em.
pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|c| {
            if c == ' ' {
                0.3
            } else if is_wide(c) {
                1.0
            } else {
                0.6
            }
        })
        .sum::<f32>()
        * font_size
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

/// Wrap character by character: Japanese text has no spaces to break on.
///
/// A character that would push the line past `max_width` starts a new line.
/// A single character wider than `max_width` still gets its own line.
pub fn wrap_text(text: &str, measure: &dyn TextMeasure, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);

        if measure.text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is exactly `font_size` wide
    pub(crate) struct MonoMeasure;

    impl TextMeasure for MonoMeasure {
        fn text_width(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * font_size
        }
    }

    #[test]
    fn test_wrap_overflow_splits() {
        let lines = wrap_text("abcdefghij", &MonoMeasure, 10.0, 50.0);
        assert_eq!(lines, vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_wrap_empty_is_zero_lines() {
        assert!(wrap_text("", &MonoMeasure, 10.0, 50.0).is_empty());
    }

    #[test]
    fn test_wrap_short_stays_single_line() {
        assert_eq!(wrap_text("おにで", &MonoMeasure, 10.0, 50.0), vec!["おにで"]);
    }

    #[test]
    fn test_wrap_japanese_long_condition() {
        let text = "ドンダフルコンボを達成した曲数が100曲以上になる";
        let lines = wrap_text(text, &MonoMeasure, 24.0, 240.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.concat(), text);
        for line in &lines {
            assert!(MonoMeasure.text_width(line, 24.0) <= 240.0);
        }
    }

    #[test]
    fn test_wrap_char_wider_than_limit() {
        let lines = wrap_text("ab", &MonoMeasure, 30.0, 20.0);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_estimate_wide_chars() {
        assert_eq!(estimate_width("達人", 24.0), 48.0);
        assert!(estimate_width("ab", 24.0) < estimate_width("達人", 24.0));
        assert_eq!(estimate_width("", 24.0), 0.0);
    }
}
