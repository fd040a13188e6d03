//! Column and page break decisions.
//!
//! The engine walks the blocks in displayed order and keeps its position as
//! explicit cursor state. Questions are never split: one that does not fit the
//! rest of a column moves to the next column, and the next page is opened only
//! once every column of the current page is used.

use super::types::*;
use crate::block::Block;
use crate::constants::END_MARKER_HEIGHT;
use crate::profile::{ColumnGeometry, SizeProfile};

/// State of the column the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    /// Nothing placed yet; no leading gap is needed
    AtColumnTop,
    /// Something placed and room may remain
    MidColumn,
    /// No room left and another column follows on this page
    ColumnFull,
    /// No room left in the last column of the page
    PageFull,
}

struct FlowCursor<'a> {
    profile: &'a SizeProfile,
    geometry: &'a ColumnGeometry,
    page: usize,
    column: usize,
    y: f32,
    state: ColumnState,
    plan: LayoutPlan,
}

impl<'a> FlowCursor<'a> {
    fn new(profile: &'a SizeProfile, geometry: &'a ColumnGeometry) -> Self {
        Self {
            profile,
            geometry,
            page: 1,
            column: 0,
            y: 0.0,
            state: ColumnState::AtColumnTop,
            plan: LayoutPlan::default(),
        }
    }

    fn usable(&self) -> f32 {
        self.geometry.usable_height(self.profile, self.page)
    }

    fn at_top(&self) -> bool {
        self.state == ColumnState::AtColumnTop
    }

    fn leading(&self, gap: f32) -> f32 {
        if self.at_top() { 0.0 } else { gap }
    }

    fn fits(&self, needed: f32) -> bool {
        match self.state {
            ColumnState::ColumnFull | ColumnState::PageFull => false,
            _ => self.y + needed <= self.usable(),
        }
    }

    /// A fresh column on a later page is taller than one on the first page.
    fn later_page_has_room(&self, needed: f32) -> bool {
        self.page == 1 && needed <= self.profile.usable_column_height
    }

    fn place(&mut self, item: PlacedItem, height: f32, gap: f32) {
        let offset = self.y + self.leading(gap);
        self.plan.placements.push(Placement {
            page: self.page,
            column: self.column,
            item,
            offset,
            height,
        });
        self.y = offset + height;
        self.state = if self.y < self.usable() {
            ColumnState::MidColumn
        } else if self.column + 1 < self.geometry.columns_per_page {
            ColumnState::ColumnFull
        } else {
            ColumnState::PageFull
        };
    }

    fn advance(&mut self) {
        let last_column = self.column + 1 >= self.geometry.columns_per_page;
        if last_column || self.state == ColumnState::PageFull {
            self.page += 1;
            self.column = 0;
            log::trace!("Starting page {}", self.page);
        } else {
            self.column += 1;
        }
        self.y = 0.0;
        self.state = ColumnState::AtColumnTop;
    }

    fn place_question(&mut self, block_index: usize, block: &Block) {
        let gap = self.profile.spacing_unit;
        loop {
            if self.fits(self.leading(gap) + block.height) {
                self.place(PlacedItem::Question { block_index }, block.height, gap);
                return;
            }
            if self.at_top() && !self.later_page_has_room(block.height) {
                self.place_oversized(block_index, block);
                return;
            }
            self.advance();
        }
    }

    fn place_oversized(&mut self, block_index: usize, block: &Block) {
        let warning = OverflowWarning {
            block_index,
            number: block.number,
            id: block.id,
            page: self.page,
            column: self.column,
            height: block.height,
            usable_height: self.usable(),
        };
        log::warn!("Overflow: {}", warning);
        self.plan.warnings.push(warning);
        self.place(PlacedItem::Question { block_index }, block.height, 0.0);
    }

    /// Place a section header together with the first question of its section.
    fn place_section(&mut self, header: &SectionHeader, block_index: usize, block: &Block) {
        let gap = self.profile.section_gap;
        let together = header.height + block.height;
        loop {
            if self.fits(self.leading(gap) + together) {
                self.place(
                    PlacedItem::SectionHeader {
                        section_index: header.section_index,
                    },
                    header.height,
                    gap,
                );
                self.place(PlacedItem::Question { block_index }, block.height, 0.0);
                return;
            }
            if self.at_top() && !self.later_page_has_room(together) {
                log::warn!(
                    "Section '{}' header cannot share a column with question {}",
                    header.name,
                    block.number
                );
                self.place(
                    PlacedItem::SectionHeader {
                        section_index: header.section_index,
                    },
                    header.height,
                    0.0,
                );
                self.place_question(block_index, block);
                return;
            }
            self.advance();
        }
    }

    fn place_end_marker(&mut self) {
        let gap = self.profile.spacing_unit;
        while !self.fits(self.leading(gap) + END_MARKER_HEIGHT) && !self.at_top() {
            self.advance();
        }
        self.place(PlacedItem::EndMarker, END_MARKER_HEIGHT, gap);
    }
}

/// Flow `blocks` into columns and pages.
///
/// `headers` supplies the header for each section; one is emitted before the
/// first block of every section that has an entry. Block heights must already
/// be estimated.
pub fn layout(
    blocks: &[Block],
    headers: &[SectionHeader],
    profile: &SizeProfile,
    geometry: &ColumnGeometry,
) -> LayoutPlan {
    let mut cursor = FlowCursor::new(profile, geometry);
    let mut current_section = None;

    for (block_index, block) in blocks.iter().enumerate() {
        let section = block.id.section_index;
        let header = if current_section != Some(section) {
            current_section = Some(section);
            headers.iter().find(|h| h.section_index == section)
        } else {
            None
        };

        match header {
            Some(header) => cursor.place_section(header, block_index, block),
            None => cursor.place_question(block_index, block),
        }
    }

    if !blocks.is_empty() {
        cursor.place_end_marker();
    }

    let plan = cursor.plan;
    log::debug!(
        "Flowed {} blocks onto {} pages ({} overflow)",
        blocks.len(),
        plan.page_count(),
        plan.warnings.len()
    );
    plan
}
