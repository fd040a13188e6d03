//! Booklet imposition
//!
//! Places the logical pages of a paper onto folded half-sheets so that a
//! stack of sheets, folded once along the spine, reads 1..N.
//!
//! ## Saddle-stitch pairing
//!
//! For `N = 4 * S` padded pages, sheet `i` (0-based, outermost first) carries:
//!
//! ```text
//! front: [N - 2i | 2i + 1]
//! back:  [2i + 2 | N - 2i - 1]
//! ```
//!
//! With 8 pages the outer sheet is `[8 | 1] / [2 | 7]` and the inner sheet is
//! `[6 | 3] / [4 | 5]`.

use crate::types::{ExamError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One slot on a sheet side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageSlot {
    /// A logical page of the paper (1-based)
    Page(usize),
    /// Padding; carries its position in the padded sequence
    Blank(usize),
}

impl PageSlot {
    /// Position in the padded page sequence, blank or not.
    pub fn position(self) -> usize {
        match self {
            PageSlot::Page(n) | PageSlot::Blank(n) => n,
        }
    }

    pub fn page(self) -> Option<usize> {
        match self {
            PageSlot::Page(n) => Some(n),
            PageSlot::Blank(_) => None,
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, PageSlot::Blank(_))
    }
}

/// One physical sheet, printed on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    /// 1-based, outermost sheet first
    pub sheet_number: usize,
    pub front_left: PageSlot,
    pub front_right: PageSlot,
    pub back_left: PageSlot,
    pub back_right: PageSlot,
}

impl Sheet {
    pub fn slots(&self) -> [PageSlot; 4] {
        [
            self.front_left,
            self.front_right,
            self.back_left,
            self.back_right,
        ]
    }
}

/// Sheet assignment for a whole booklet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetPlan {
    /// Logical pages before padding
    pub page_count: usize,
    /// Page count rounded up to a multiple of 4
    pub padded_count: usize,
    pub sheets: Vec<Sheet>,
}

impl SheetPlan {
    pub fn blank_pages(&self) -> usize {
        self.padded_count - self.page_count
    }

    /// Printed sides (two per sheet).
    pub fn side_count(&self) -> usize {
        self.sheets.len() * 2
    }
}

/// Round `page_count` up to the next multiple of 4.
pub fn padded_page_count(page_count: usize) -> usize {
    page_count.div_ceil(4) * 4
}

/// Build the saddle-stitch sheet plan for `page_count` logical pages.
///
/// The result is checked with [`verify`] before it is returned.
pub fn impose(page_count: usize) -> Result<SheetPlan> {
    if page_count == 0 {
        return Err(ExamError::NoPages);
    }

    let padded = padded_page_count(page_count);
    let slot = |n: usize| {
        if n <= page_count {
            PageSlot::Page(n)
        } else {
            PageSlot::Blank(n)
        }
    };

    let sheets = (0..padded / 4)
        .map(|i| Sheet {
            sheet_number: i + 1,
            front_left: slot(padded - 2 * i),
            front_right: slot(2 * i + 1),
            back_left: slot(2 * i + 2),
            back_right: slot(padded - 2 * i - 1),
        })
        .collect();

    let plan = SheetPlan {
        page_count,
        padded_count: padded,
        sheets,
    };
    verify(&plan)?;

    log::debug!(
        "Imposed {} pages on {} sheets ({} blank)",
        page_count,
        plan.sheets.len(),
        plan.blank_pages()
    );
    Ok(plan)
}

/// Check a sheet plan.
///
/// Two independent checks: every padded position appears exactly once (with
/// exactly the positions past `page_count` blank), and unfolding the stacked
/// sheets in reading order yields 1..N.
pub fn verify(plan: &SheetPlan) -> Result<()> {
    let broken = |msg: String| Err(ExamError::ImpositionInvariant(msg));

    if plan.padded_count % 4 != 0 || plan.padded_count < plan.page_count {
        return broken(format!(
            "padded count {} is not a multiple of 4 covering {} pages",
            plan.padded_count, plan.page_count
        ));
    }
    if plan.sheets.len() * 4 != plan.padded_count {
        return broken(format!(
            "{} sheets cannot hold {} pages",
            plan.sheets.len(),
            plan.padded_count
        ));
    }

    // Multiset check
    let mut seen = vec![false; plan.padded_count];
    for sheet in &plan.sheets {
        for slot in sheet.slots() {
            let n = slot.position();
            if n == 0 || n > plan.padded_count {
                return broken(format!("sheet {} references page {}", sheet.sheet_number, n));
            }
            if std::mem::replace(&mut seen[n - 1], true) {
                return broken(format!("page {} appears twice", n));
            }
            if slot.is_blank() != (n > plan.page_count) {
                return broken(format!("page {} has the wrong blank marker", n));
            }
        }
    }

    // Fold check: open the stack and read every page in order. The first half
    // runs down the right-hand sides of the sheets from the outside in, the
    // second half comes back out along the left-hand sides.
    let reading: Vec<usize> = plan
        .sheets
        .iter()
        .flat_map(|s| [s.front_right, s.back_left])
        .chain(
            plan.sheets
                .iter()
                .rev()
                .flat_map(|s| [s.back_right, s.front_left]),
        )
        .map(PageSlot::position)
        .collect();

    if let Some((i, &n)) = reading.iter().enumerate().find(|&(i, &n)| n != i + 1) {
        return broken(format!(
            "folded booklet reads page {} at position {}",
            n,
            i + 1
        ));
    }

    Ok(())
}
