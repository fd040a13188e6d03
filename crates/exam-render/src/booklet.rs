//! Booklet output: each sheet of the plan becomes two landscape sides, each
//! holding two logical pages next to each other.

use crate::canvas::PageCanvas;
use crate::paper::{PaperPainter, paint_blank_page, save_document};
use crate::types::*;
use exam_layout::{
    ExamBank, ExamError, GenerationOptions, PageSlot, PaperSet, PaperView, SheetPlan, impose,
};
use printpdf::{Mm, PdfPage};

fn paint_slot(painter: &PaperPainter<'_>, canvas: &mut PageCanvas, slot: PageSlot, x_offset: f32) {
    let (width, height) = painter.page_size();
    canvas.set_x_offset(x_offset);
    match slot {
        PageSlot::Page(page) => painter.paint_page(canvas, page),
        PageSlot::Blank(position) => paint_blank_page(canvas, width, height, position),
    }
}

fn side(painter: &PaperPainter<'_>, sheet: (f32, f32), left: PageSlot, right: PageSlot) -> PdfPage {
    let (width, height) = painter.page_size();
    let mut canvas = PageCanvas::new(height);
    paint_slot(painter, &mut canvas, left, 0.0);
    paint_slot(painter, &mut canvas, right, width);
    PdfPage::new(Mm(sheet.0), Mm(sheet.1), canvas.into_ops())
}

/// Render the question view of `set` as booklet sheets.
///
/// Uses the set's own sheet plan when it has one, otherwise imposes the
/// question view's page count.
pub fn render_booklet(set: &PaperSet, bank: &ExamBank, options: &GenerationOptions) -> Result<Vec<u8>> {
    let painter = PaperPainter::new(set, bank, options, PaperView::Questions);
    let plan: SheetPlan = match &set.sheets {
        Some(plan) => plan.clone(),
        None => impose(painter.page_count())?,
    };
    if plan.page_count != painter.page_count() {
        return Err(ExamError::ImpositionInvariant(format!(
            "sheet plan covers {} pages but set {} has {}",
            plan.page_count,
            set.label,
            painter.page_count()
        ))
        .into());
    }

    let sheet_size = options.paper_size.booklet_sheet_mm();
    let mut sides = Vec::with_capacity(plan.side_count());
    for sheet in &plan.sheets {
        sides.push(side(&painter, sheet_size, sheet.front_left, sheet.front_right));
        sides.push(side(&painter, sheet_size, sheet.back_left, sheet.back_right));
    }

    log::debug!(
        "Rendered booklet for set {}: {} sheets, {} blank pages",
        set.label,
        plan.sheets.len(),
        plan.blank_pages()
    );
    save_document(&format!("{} - Set {} Booklet", options.title, set.label), sides)
}
