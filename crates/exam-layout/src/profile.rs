//! Size profiles and column geometry consumed by the estimator and flow engine.

use crate::constants::*;
use crate::types::{Density, PaperSize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font and spacing configuration for one density tier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeProfile {
    /// Multiplier applied to [`BASE_FONT_PT`]
    pub font_scale: f32,
    /// Height of one wrapped text line
    pub line_height: f32,
    /// Gap between elements inside a question
    pub spacing_unit: f32,
    /// Gap left before a section header that does not start a column
    pub section_gap: f32,
    /// Width of one column
    pub column_width: f32,
    /// Height available to questions in one column
    pub usable_column_height: f32,
    /// Percentage added to every estimate to absorb wrapping error
    pub safety_margin_pct: f32,
}

impl SizeProfile {
    /// Named profile for `density` on two-column A4.
    pub fn for_density(density: Density) -> Self {
        Self::for_layout(density, PaperSize::A4, 2)
    }

    /// Profile for `density` with column metrics derived from the paper and
    /// the number of columns per page.
    pub fn for_layout(density: Density, paper: PaperSize, columns: usize) -> Self {
        let (font_scale, line_height, spacing_unit, section_gap) = match density {
            Density::Small => (11.0 / BASE_FONT_PT, 4.0, 1.5, 4.0),
            Density::Medium => (1.0, 5.0, 2.0, 6.0),
            Density::Large => (15.0 / BASE_FONT_PT, 6.0, 2.5, 8.0),
        };

        let (page_width, page_height) = paper.dimensions_mm();
        let column_width = if columns <= 1 {
            page_width - 2.0 * PAGE_MARGIN
        } else {
            page_width / columns as f32 - COLUMN_SPACING
        };

        Self {
            font_scale,
            line_height,
            spacing_unit,
            section_gap,
            column_width,
            usable_column_height: page_height - COLUMN_TOP - FOOTER_BUFFER,
            safety_margin_pct: DEFAULT_SAFETY_MARGIN_PCT,
        }
    }

    /// Question and option font size in points
    pub fn font_pt(&self) -> f32 {
        BASE_FONT_PT * self.font_scale
    }

    /// Width available to question text (column minus the number gutter)
    pub fn question_width(&self) -> f32 {
        self.column_width - QUESTION_NUMBER_WIDTH - 1.0
    }

    /// Width available to a full row of options
    pub fn options_width(&self) -> f32 {
        self.column_width - QUESTION_NUMBER_WIDTH - 3.0
    }

    /// Width of one option when two share a row
    pub fn half_option_width(&self) -> f32 {
        (self.options_width() - self.spacing_unit * 2.0) / 2.0
    }
}

impl Default for SizeProfile {
    fn default() -> Self {
        Self::for_density(Density::default())
    }
}

/// How many columns a page holds and how much of page 1 the title block takes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnGeometry {
    pub columns_per_page: usize,
    /// Height removed from every column on the first page
    pub first_page_reserved: f32,
}

impl ColumnGeometry {
    pub fn two_column(show_student_info: bool) -> Self {
        Self::new(2, show_student_info)
    }

    pub fn new(columns_per_page: usize, show_student_info: bool) -> Self {
        Self {
            columns_per_page,
            first_page_reserved: if show_student_info {
                FIRST_PAGE_HEADER_WITH_INFO
            } else {
                FIRST_PAGE_HEADER_COMPACT
            },
        }
    }

    /// Usable height of a column on `page` (1-based).
    pub fn usable_height(&self, profile: &SizeProfile, page: usize) -> f32 {
        if page == 1 {
            (profile.usable_column_height - self.first_page_reserved).max(0.0)
        } else {
            profile.usable_column_height
        }
    }
}

impl Default for ColumnGeometry {
    fn default() -> Self {
        Self::two_column(true)
    }
}
