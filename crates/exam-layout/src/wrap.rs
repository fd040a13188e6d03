//! Line wrapping shared by the height estimator and the renderer.
//!
//! Glyph widths are approximated by an average Helvetica character width, so
//! both sides agree on line breaks without shaping text.

use crate::constants::{HELVETICA_CHAR_WIDTH_RATIO, pt_to_mm};

fn char_width(font_pt: f32) -> f32 {
    pt_to_mm(font_pt * HELVETICA_CHAR_WIDTH_RATIO)
}

/// Characters at `font_pt` that fit in `width` mm, at least one.
pub fn line_capacity(width: f32, font_pt: f32) -> usize {
    ((width / char_width(font_pt)).floor() as usize).max(1)
}

/// Approximate rendered width of `text` in mm.
pub fn text_width(text: &str, font_pt: f32) -> f32 {
    text.chars().count() as f32 * char_width(font_pt)
}

/// Greedy word wrap at `width` mm.
///
/// Explicit newlines always break. Words longer than a line are split at the
/// line capacity. Blank input gives no lines.
pub fn wrap_text(text: &str, width: f32, font_pt: f32) -> Vec<String> {
    let capacity = line_capacity(width, font_pt);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > capacity {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(capacity);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > capacity && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

/// Number of lines [`wrap_text`] produces for `text`.
pub fn wrapped_lines(text: &str, width: f32, font_pt: f32) -> usize {
    wrap_text(text, width, font_pt).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_capacity() {
        let capacity = line_capacity(40.0, 13.0);
        let text = "the quick brown fox jumps over the lazy dog ".repeat(5);
        let lines = wrap_text(&text, 40.0, 13.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= capacity));
        assert_eq!(lines.join(" "), text.trim());
    }

    #[test]
    fn test_long_word_split() {
        let capacity = line_capacity(20.0, 13.0);
        let word = "x".repeat(capacity * 2 + 1);
        let lines = wrap_text(&word, 20.0, 13.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].len(), 1);
    }

    #[test]
    fn test_newlines_break() {
        let text = (1..=8).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(wrapped_lines(&text, 80.0, 13.0), 8);
    }

    #[test]
    fn test_whole_words_move_down() {
        // Words that would fit by character count alone still wrap whole
        let width = 60.0;
        let capacity = line_capacity(width, 13.0);
        let word = "a".repeat(capacity / 2 + 1);
        let text = format!("{} ", word).repeat(10);
        assert_eq!(wrapped_lines(&text, width, 13.0), 10);
    }

    #[test]
    fn test_blank_text_has_no_lines() {
        assert_eq!(wrapped_lines("", 80.0, 13.0), 0);
        assert_eq!(wrapped_lines("   ", 80.0, 13.0), 0);
        assert_eq!(wrapped_lines("short", 80.0, 13.0), 1);
    }
}
