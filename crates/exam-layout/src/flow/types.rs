//! Layout plan data types
//!
//! These types are the hand-off between the flow engine and the renderer:
//! every element of a paper set with the page, column and vertical offset it
//! was given.

use crate::estimate::estimate_section_header;
use crate::model::{QuestionId, SectionInfo};
use crate::profile::{ColumnGeometry, SizeProfile};
use std::fmt;

/// Tolerance for floating point comparisons of offsets
const EPSILON: f32 = 1e-3;

/// A section header kept with the first question of its section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    pub section_index: usize,
    pub name: String,
    pub description: Option<String>,
    pub height: f32,
}

impl SectionHeader {
    pub fn for_section(section: &SectionInfo, profile: &SizeProfile) -> Self {
        Self {
            section_index: section.index,
            name: section.name.clone(),
            description: section.description.clone(),
            height: estimate_section_header(
                &section.name,
                section.description.as_deref(),
                profile,
            ),
        }
    }
}

/// What a placement holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedItem {
    SectionHeader { section_index: usize },
    /// Index into the set's block list
    Question { block_index: usize },
    EndMarker,
}

/// One element positioned in a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// 1-based page number
    pub page: usize,
    /// 0-based column index within the page
    pub column: usize,
    pub item: PlacedItem,
    /// Distance from the top of the column's usable area
    pub offset: f32,
    pub height: f32,
}

impl Placement {
    pub fn bottom(&self) -> f32 {
        self.offset + self.height
    }
}

/// A question taller than a whole column, placed at the top of a fresh
/// column anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowWarning {
    pub block_index: usize,
    /// Displayed question number
    pub number: usize,
    pub id: QuestionId,
    pub page: usize,
    pub column: usize,
    pub height: f32,
    pub usable_height: f32,
}

impl fmt::Display for OverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "question {} needs {:.1}mm but column {} on page {} holds {:.1}mm",
            self.number,
            self.height,
            self.column + 1,
            self.page,
            self.usable_height
        )
    }
}

/// Placement of every element of one paper set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutPlan {
    pub placements: Vec<Placement>,
    pub warnings: Vec<OverflowWarning>,
}

impl LayoutPlan {
    pub fn page_count(&self) -> usize {
        self.placements.last().map(|p| p.page).unwrap_or(0)
    }

    /// Placements in one column, in top-to-bottom order.
    pub fn placements_on(&self, page: usize, column: usize) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.page == page && p.column == column)
    }

    /// Placement of the question at `block_index`.
    pub fn question(&self, block_index: usize) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.item == PlacedItem::Question { block_index })
    }

    fn is_overflow(&self, placement: &Placement) -> bool {
        match placement.item {
            PlacedItem::Question { block_index } => {
                self.warnings.iter().any(|w| w.block_index == block_index)
            }
            _ => false,
        }
    }

    /// Describe every violated layout invariant; empty when the plan is sound.
    pub fn check_invariants(&self, profile: &SizeProfile, geometry: &ColumnGeometry) -> Vec<String> {
        let mut violations = Vec::new();

        for pair in self.placements.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.page < a.page || (b.page == a.page && b.column < a.column) {
                violations.push(format!(
                    "{:?} on page {} column {} comes after page {} column {}",
                    b.item, b.page, b.column, a.page, a.column
                ));
            }
            if a.page == b.page && a.column == b.column {
                if b.offset <= a.offset {
                    violations.push(format!(
                        "{:?} does not move down from {:?}",
                        b.item, a.item
                    ));
                }
                if b.offset + EPSILON < a.bottom() {
                    violations.push(format!("{:?} overlaps {:?}", b.item, a.item));
                }
            }
        }

        for placement in &self.placements {
            if placement.column >= geometry.columns_per_page {
                violations.push(format!(
                    "{:?} placed in column {} of {}",
                    placement.item, placement.column, geometry.columns_per_page
                ));
            }
            let usable = geometry.usable_height(profile, placement.page);
            if placement.bottom() > usable + EPSILON && !self.is_overflow(placement) {
                violations.push(format!(
                    "{:?} ends at {:.1}mm past usable height {:.1}mm",
                    placement.item,
                    placement.bottom(),
                    usable
                ));
            }
        }

        violations
    }
}
