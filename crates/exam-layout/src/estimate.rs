//! Height estimation for question blocks and section headers.
//!
//! Lines are counted with the same greedy wrap the renderer draws with
//! ([`crate::wrap_text`]). Glyph widths are still approximate, so every
//! estimate carries the profile's safety margin on top.

use crate::block::Block;
use crate::constants::*;
use crate::model::{Fragment, QuestionKind};
use crate::profile::SizeProfile;
use crate::wrap::wrapped_lines;

/// One row of options as drawn under a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRow {
    pub first: usize,
    /// Present when two short options share the row
    pub second: Option<usize>,
}

fn text_height(text: &str, width: f32, profile: &SizeProfile) -> f32 {
    wrapped_lines(text, width, profile.font_pt()) as f32 * profile.line_height
}

/// Items drawn one per row with at least one line each.
fn rows_height(items: &[String], width: f32, profile: &SizeProfile) -> f32 {
    let row_gap = profile.spacing_unit / 2.0;
    items
        .iter()
        .map(|item| text_height(item, width, profile).max(profile.line_height) + row_gap)
        .sum()
}

fn fragment_height(fragment: &Fragment, profile: &SizeProfile) -> f32 {
    let question_width = profile.question_width();
    let indented = question_width - BLOCK_INDENT;

    match fragment {
        Fragment::Text(text) => text_height(text, question_width, profile),
        // "Statement:" label line, then the indented statement
        Fragment::Statement(statement) => {
            profile.line_height + text_height(statement, indented, profile)
        }
        Fragment::Statements(items) | Fragment::List(items) | Fragment::Sequence(items) => {
            rows_height(items, indented, profile)
        }
        Fragment::MatchTable { left, right } => {
            let cell_width = indented * MATCH_COLUMN_RATIO;
            let row_gap = profile.spacing_unit / 2.0;
            let rows = left.len().max(right.len());
            (0..rows)
                .map(|i| {
                    let cell = |column: &[String]| {
                        column
                            .get(i)
                            .map(|text| wrapped_lines(text, cell_width, profile.font_pt()))
                            .unwrap_or(0)
                    };
                    let lines = cell(left).max(cell(right)).max(1);
                    lines as f32 * profile.line_height + row_gap
                })
                .sum()
        }
        Fragment::Paragraph(paragraph) => {
            text_height(paragraph, indented, profile) + profile.spacing_unit
        }
    }
}

/// Widest label form, the marked one of the answer view.
fn labelled(option: &str) -> String {
    format!("*A. {}", option)
}

/// Arrange `options` into rows, pairing two options when both fit on one
/// line at half width. Sequence questions always stack.
pub fn arrange_options(
    options: &[String],
    kind: QuestionKind,
    profile: &SizeProfile,
) -> Vec<OptionRow> {
    let half = profile.half_option_width();
    let fits_half = |option: &String| wrapped_lines(&labelled(option), half, profile.font_pt()) <= 1;

    let mut rows = Vec::with_capacity(options.len());
    let mut i = 0;
    while i < options.len() {
        let pair = kind != QuestionKind::Sequence
            && i + 1 < options.len()
            && fits_half(&options[i])
            && fits_half(&options[i + 1]);
        if pair {
            rows.push(OptionRow {
                first: i,
                second: Some(i + 1),
            });
            i += 2;
        } else {
            rows.push(OptionRow {
                first: i,
                second: None,
            });
            i += 1;
        }
    }
    rows
}

/// Height of the option rows for `options`.
pub fn options_height(options: &[String], kind: QuestionKind, profile: &SizeProfile) -> f32 {
    let row_gap = profile.spacing_unit / 4.0;
    let width = profile.options_width() - OPTION_LABEL_WIDTH;
    arrange_options(options, kind, profile)
        .into_iter()
        .map(|row| {
            let lines = match row.second {
                Some(_) => profile.line_height,
                None => text_height(&options[row.first], width, profile).max(profile.line_height),
            };
            lines + row_gap
        })
        .sum()
}

fn with_safety_margin(height: f32, profile: &SizeProfile) -> f32 {
    height * (1.0 + profile.safety_margin_pct / 100.0)
}

/// Estimated vertical extent of `block`, safety margin included.
pub fn estimate(block: &Block, profile: &SizeProfile) -> f32 {
    let content: f32 = block
        .fragments
        .iter()
        .map(|f| fragment_height(f, profile) + profile.spacing_unit)
        .sum();

    let options = options_height(&block.options, block.kind, profile);

    let reasoning = block
        .reasoning
        .as_deref()
        .map(|r| {
            text_height(&format!("Explanation: {}", r), profile.options_width(), profile)
                + profile.section_gap
        })
        .unwrap_or(0.0);

    with_safety_margin(content + options + reasoning + profile.spacing_unit, profile)
}

/// Estimated height of a section header (name plus optional description).
pub fn estimate_section_header(name: &str, description: Option<&str>, profile: &SizeProfile) -> f32 {
    let name_lines = wrapped_lines(
        name,
        profile.column_width,
        profile.font_pt() * SECTION_NAME_SCALE,
    )
    .max(1);
    let mut height = name_lines as f32 * profile.line_height + profile.spacing_unit;

    if let Some(description) = description {
        height += text_height(description, profile.question_width(), profile);
        height += profile.spacing_unit * 2.0;
    }

    with_safety_margin(height, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn block(fragments: Vec<Fragment>, options: &[&str]) -> Block {
        Block {
            id: QuestionId::new(0, 0),
            number: 1,
            kind: QuestionKind::classify(&fragments),
            fragments,
            options: options.iter().map(|s| s.to_string()).collect(),
            reasoning: None,
            height: 0.0,
        }
    }

    #[test]
    fn test_short_options_are_paired() {
        let profile = SizeProfile::default();
        let options: Vec<String> = ["1", "2", "3", "4"].iter().map(|s| s.to_string()).collect();
        let rows = arrange_options(&options, QuestionKind::Plain, &profile);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].second, Some(1));

        let stacked = arrange_options(&options, QuestionKind::Sequence, &profile);
        assert_eq!(stacked.len(), 4);
    }

    #[test]
    fn test_long_option_gets_its_own_row() {
        let profile = SizeProfile::default();
        let options = vec!["a".to_string(), "word ".repeat(20), "b".to_string()];
        let rows = arrange_options(&options, QuestionKind::Plain, &profile);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.second.is_none()));
    }

    #[test]
    fn test_safety_margin_applied() {
        let mut profile = SizeProfile::default();
        let b = block(vec![Fragment::Text("Question".into())], &["a", "b"]);
        profile.safety_margin_pct = 0.0;
        let bare = estimate(&b, &profile);
        profile.safety_margin_pct = 10.0;
        let padded = estimate(&b, &profile);
        assert!((padded - bare * 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_every_kind_contributes_height() {
        let profile = SizeProfile::default();
        let base = estimate(&block(vec![Fragment::Text("Q".into())], &["a"]), &profile);
        let kinds = vec![
            Fragment::Statement("A statement".into()),
            Fragment::Statements(vec!["i. one".into(), "ii. two".into()]),
            Fragment::MatchTable {
                left: vec!["a".into(), "b".into()],
                right: vec!["1".into(), "2".into()],
            },
            Fragment::Paragraph("A passage".into()),
            Fragment::List(vec!["x".into()]),
            Fragment::Sequence(vec!["first".into(), "second".into()]),
        ];
        for fragment in kinds {
            let b = block(vec![Fragment::Text("Q".into()), fragment.clone()], &["a"]);
            assert!(estimate(&b, &profile) > base, "{:?} added no height", fragment);
        }
    }

    #[test]
    fn test_reasoning_adds_height() {
        let profile = SizeProfile::default();
        let mut b = block(vec![Fragment::Text("Q".into())], &["a", "b"]);
        let without = estimate(&b, &profile);
        b.reasoning = Some("Because".into());
        assert!(estimate(&b, &profile) > without);
    }

    #[test]
    fn test_section_header_with_description_is_taller() {
        let profile = SizeProfile::default();
        let bare = estimate_section_header("Section A", None, &profile);
        let described =
            estimate_section_header("Section A", Some("Answer all questions."), &profile);
        assert!(described > bare);
    }
}
