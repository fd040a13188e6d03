//! Shared constants for exam layout
//!
//! All layout distances are millimetres unless a name says otherwise.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Page Frame
// =============================================================================

/// Outer left/right page margin
pub const PAGE_MARGIN: f32 = 10.0;

/// Y position where columns start on every page after the first
pub const COLUMN_TOP: f32 = 20.0;

/// Space kept free above the footer rule
pub const FOOTER_BUFFER: f32 = 15.0;

/// Horizontal space taken from each column in two-column mode
pub const COLUMN_SPACING: f32 = 15.0;

/// Height of the first-page title block when the student info panel is shown
pub const FIRST_PAGE_HEADER_WITH_INFO: f32 = 55.0;

/// Height of the first-page title block without the student info panel
pub const FIRST_PAGE_HEADER_COMPACT: f32 = 22.0;

// =============================================================================
// Question Geometry
// =============================================================================

/// Width reserved for the question number gutter
pub const QUESTION_NUMBER_WIDTH: f32 = 10.0;

/// Width of an option label ("A.")
pub const OPTION_LABEL_WIDTH: f32 = 5.0;

/// Indent applied to statements, lists and paragraphs
pub const BLOCK_INDENT: f32 = 5.0;

/// Share of the table width given to each match-table column
pub const MATCH_COLUMN_RATIO: f32 = 0.45;

/// Height of the END marker flowed after the last question
pub const END_MARKER_HEIGHT: f32 = 20.0;

// =============================================================================
// Typography
// =============================================================================

/// Question font size at font scale 1.0
pub const BASE_FONT_PT: f32 = 13.0;

/// Section names are set larger than question text
pub const SECTION_NAME_SCALE: f32 = 1.15;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Default percentage added on top of every height estimate
pub const DEFAULT_SAFETY_MARGIN_PCT: f32 = 10.0;

/// Letters used to label displayed options
pub const OPTION_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Label for the displayed option at `index` ("A", "B", ...)
pub fn option_letter(index: usize) -> char {
    OPTION_LETTERS
        .get(index)
        .map(|b| *b as char)
        .unwrap_or('?')
}

// =============================================================================
// Generation Limits
// =============================================================================

/// Longest title printed on the first page
pub const MAX_TITLE_CHARS: usize = 60;

/// Longest subtitle printed under the title
pub const MAX_SUBTITLE_CHARS: usize = 50;

/// Longest exam title printed in the running header
pub const MAX_EXAM_TITLE_CHARS: usize = 50;

/// One set per option letter
pub const MAX_SETS: usize = 26;
