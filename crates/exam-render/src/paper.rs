//! Draws one paper set page by page from its layout plan.

use crate::canvas::PageCanvas;
use crate::types::*;
use exam_layout::constants::*;
use exam_layout::{
    Block, ExamBank, ExamError, Fragment, GenerationOptions, PaperSet, PaperView, PlacedItem,
    Placement, SizeProfile, arrange_options, wrap_text,
};
use printpdf::*;

/// Text drawn on padding pages of a booklet
pub const BLANK_PAGE_TEXT: &str = "Empty page for rough work";

const TITLE_PT: f32 = 16.0;
const SUBTITLE_PT: f32 = 12.0;
const INFO_PT: f32 = 11.0;
const HEADER_PT: f32 = 10.0;
const FOOTER_PT: f32 = 9.0;
const RULE_PT: f32 = 0.5;

pub(crate) struct PaperPainter<'a> {
    set: &'a PaperSet,
    bank: &'a ExamBank,
    options: &'a GenerationOptions,
    view: PaperView,
    page_width: f32,
    page_height: f32,
}

impl<'a> PaperPainter<'a> {
    pub fn new(
        set: &'a PaperSet,
        bank: &'a ExamBank,
        options: &'a GenerationOptions,
        view: PaperView,
    ) -> Self {
        let (page_width, page_height) = options.paper_size.dimensions_mm();
        Self {
            set,
            bank,
            options,
            view,
            page_width,
            page_height,
        }
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }

    pub fn page_count(&self) -> usize {
        self.set.layout_for(self.view).page_count()
    }

    fn profile(&self) -> &SizeProfile {
        &self.set.profile
    }

    fn blocks(&self) -> &[Block] {
        self.set.blocks_for(self.view)
    }

    fn baseline(&self, top: f32) -> f32 {
        top + self.profile().line_height * 0.8
    }

    fn column_x(&self, column: usize) -> f32 {
        let columns = self.set.geometry.columns_per_page;
        let width = self.profile().column_width;
        let gap = if columns > 1 {
            (self.page_width - 2.0 * PAGE_MARGIN - columns as f32 * width) / (columns - 1) as f32
        } else {
            0.0
        };
        PAGE_MARGIN + column as f32 * (width + gap)
    }

    fn column_top(&self, page: usize) -> f32 {
        if page == 1 {
            COLUMN_TOP + self.set.geometry.first_page_reserved
        } else {
            COLUMN_TOP
        }
    }

    /// Draw logical page `page` (1-based) onto `canvas`.
    pub fn paint_page(&self, canvas: &mut PageCanvas, page: usize) {
        if page == 1 {
            self.paint_title_block(canvas);
        } else {
            self.paint_running_header(canvas);
        }

        if self.set.geometry.columns_per_page > 1 {
            let x = self.page_width / 2.0;
            canvas.line(
                (x, self.column_top(page)),
                (x, self.page_height - FOOTER_BUFFER),
                RULE_PT,
            );
        }

        let layout = self.set.layout_for(self.view);
        for placement in layout.placements.iter().filter(|p| p.page == page) {
            self.paint_placement(canvas, placement);
        }

        canvas.text_centered(
            self.page_width / 2.0,
            self.page_height - 7.0,
            FOOTER_PT,
            BuiltinFont::Helvetica,
            &format!("Page {} of {}", page, self.page_count()),
        );
    }

    fn paint_title_block(&self, canvas: &mut PageCanvas) {
        let center = self.page_width / 2.0;
        let right = self.page_width - PAGE_MARGIN;

        canvas.text_centered(center, 14.0, TITLE_PT, BuiltinFont::HelveticaBold, &self.options.title);
        canvas.text_centered(center, 21.0, SUBTITLE_PT, BuiltinFont::Helvetica, &self.options.subtitle);

        let set_label = match self.view {
            PaperView::Questions => format!("SET {}", self.set.label),
            PaperView::AnswerKey => format!("SET {} - ANSWERS", self.set.label),
        };
        canvas.text_right(right, 14.0, INFO_PT, BuiltinFont::HelveticaBold, &set_label);

        let questions = self.set.blocks.len();
        let marks = self.set.total_marks(self.options.marks_per_question);

        let rule_y = COLUMN_TOP + self.set.geometry.first_page_reserved - 4.0;
        if self.options.show_student_info {
            canvas.text(PAGE_MARGIN, 32.0, INFO_PT, BuiltinFont::Helvetica, "Name: ______________________________");
            canvas.text(center + 5.0, 32.0, INFO_PT, BuiltinFont::Helvetica, "Roll No: ____________________");
            canvas.text(
                PAGE_MARGIN,
                42.0,
                INFO_PT,
                BuiltinFont::Helvetica,
                &format!("Total Questions: {}", questions),
            );
            canvas.text(
                center + 5.0,
                42.0,
                INFO_PT,
                BuiltinFont::Helvetica,
                &format!("Total Marks: {}", marks),
            );
            canvas.text(
                PAGE_MARGIN,
                54.0,
                HEADER_PT,
                BuiltinFont::HelveticaOblique,
                "Instructions: Choose the single best answer for each question.",
            );
            canvas.text(
                PAGE_MARGIN,
                61.0,
                HEADER_PT,
                BuiltinFont::HelveticaOblique,
                &format!("Each question carries {} mark(s).", self.options.marks_per_question),
            );
        } else {
            canvas.text(
                PAGE_MARGIN,
                31.0,
                INFO_PT,
                BuiltinFont::Helvetica,
                &format!("Questions: {}    Marks: {}", questions, marks),
            );
        }
        canvas.line((PAGE_MARGIN, rule_y), (right, rule_y), RULE_PT);
    }

    fn paint_running_header(&self, canvas: &mut PageCanvas) {
        let right = self.page_width - PAGE_MARGIN;
        canvas.text(PAGE_MARGIN, 12.0, HEADER_PT, BuiltinFont::HelveticaBold, &self.options.exam_title);
        canvas.text_right(
            right,
            12.0,
            HEADER_PT,
            BuiltinFont::HelveticaBold,
            &format!("Set {}", self.set.label),
        );
        canvas.line((PAGE_MARGIN, 15.0), (right, 15.0), RULE_PT);
    }

    fn paint_placement(&self, canvas: &mut PageCanvas, placement: &Placement) {
        let x = self.column_x(placement.column);
        let top = self.column_top(placement.page) + placement.offset;

        match placement.item {
            PlacedItem::SectionHeader { section_index } => {
                if let Some(section) = self.bank.sections().get(section_index) {
                    self.paint_section_header(canvas, &section.name, section.description.as_deref(), x, top);
                }
            }
            PlacedItem::Question { block_index } => {
                self.paint_question(canvas, block_index, x, top);
            }
            PlacedItem::EndMarker => self.paint_end_marker(canvas, x, top),
        }
    }

    fn paint_lines(&self, canvas: &mut PageCanvas, lines: &[String], x: f32, mut y: f32, font: BuiltinFont) -> f32 {
        let size = self.profile().font_pt();
        for line in lines {
            canvas.text(x, self.baseline(y), size, font, line);
            y += self.profile().line_height;
        }
        y
    }

    fn paint_section_header(
        &self,
        canvas: &mut PageCanvas,
        name: &str,
        description: Option<&str>,
        x: f32,
        top: f32,
    ) -> f32 {
        let profile = self.profile();
        let size = profile.font_pt() * SECTION_NAME_SCALE;
        let mut y = top;
        for line in wrap_text(name, profile.column_width, size) {
            canvas.text(x, self.baseline(y), size, BuiltinFont::HelveticaBold, &line);
            y += profile.line_height;
        }
        y += profile.spacing_unit;

        if let Some(description) = description {
            let lines = wrap_text(description, profile.question_width(), profile.font_pt());
            y = self.paint_lines(canvas, &lines, x, y, BuiltinFont::HelveticaOblique);
        }
        y
    }

    /// Draw the question at `block_index` and return the bottom of what was drawn.
    fn paint_question(&self, canvas: &mut PageCanvas, block_index: usize, x: f32, top: f32) -> f32 {
        let Some(block) = self.blocks().get(block_index) else {
            return top;
        };
        let profile = self.profile();
        let body_x = x + QUESTION_NUMBER_WIDTH;

        canvas.text(
            x,
            self.baseline(top),
            profile.font_pt(),
            BuiltinFont::HelveticaBold,
            &format!("{}.", block.number),
        );

        let mut y = top;
        for fragment in &block.fragments {
            y = self.paint_fragment(canvas, fragment, body_x, y);
            y += profile.spacing_unit;
        }

        y = self.paint_options(canvas, block, block_index, body_x, y);

        if self.view == PaperView::AnswerKey {
            if let Some(reasoning) = &block.reasoning {
                y += profile.section_gap / 2.0;
                let lines = wrap_text(
                    &format!("Explanation: {}", reasoning),
                    profile.options_width(),
                    profile.font_pt(),
                );
                y = self.paint_lines(canvas, &lines, body_x, y, BuiltinFont::HelveticaOblique);
            }
        }
        y
    }

    fn paint_fragment(&self, canvas: &mut PageCanvas, fragment: &Fragment, x: f32, mut y: f32) -> f32 {
        let profile = self.profile();
        let font = profile.font_pt();
        let width = profile.question_width();
        let indent_x = x + BLOCK_INDENT;
        let indented = width - BLOCK_INDENT;

        match fragment {
            Fragment::Text(text) => {
                self.paint_lines(canvas, &wrap_text(text, width, font), x, y, BuiltinFont::Helvetica)
            }
            Fragment::Statement(statement) => {
                canvas.text(x, self.baseline(y), font, BuiltinFont::HelveticaBold, "Statement:");
                y += profile.line_height;
                let lines = wrap_text(statement, indented, font);
                self.paint_lines(canvas, &lines, indent_x, y, BuiltinFont::Helvetica)
            }
            Fragment::Statements(items) | Fragment::List(items) | Fragment::Sequence(items) => {
                for item in items {
                    let lines = wrap_text(item, indented, font);
                    let after = self.paint_lines(canvas, &lines, indent_x, y, BuiltinFont::Helvetica);
                    y = after.max(y + profile.line_height) + profile.spacing_unit / 2.0;
                }
                y
            }
            Fragment::MatchTable { left, right } => {
                let cell_width = indented * MATCH_COLUMN_RATIO;
                let right_x = indent_x + indented - cell_width;
                for row in 0..left.len().max(right.len()) {
                    let mut bottom = y + profile.line_height;
                    for (column, cell_x) in [(left, indent_x), (right, right_x)] {
                        if let Some(text) = column.get(row) {
                            let lines = wrap_text(text, cell_width, font);
                            let after = self.paint_lines(canvas, &lines, cell_x, y, BuiltinFont::Helvetica);
                            bottom = bottom.max(after);
                        }
                    }
                    y = bottom + profile.spacing_unit / 2.0;
                }
                y
            }
            Fragment::Paragraph(paragraph) => {
                let lines = wrap_text(paragraph, indented, font);
                self.paint_lines(canvas, &lines, indent_x, y, BuiltinFont::Helvetica) + profile.spacing_unit
            }
        }
    }

    /// Displayed index of the correct option, answer view only.
    fn marked_option(&self, block: &Block, block_index: usize) -> Option<usize> {
        if self.view != PaperView::AnswerKey {
            return None;
        }
        let record = self.bank.record(block.id)?;
        self.set.permutation.displayed_option(block_index, record.correct)
    }

    fn paint_options(&self, canvas: &mut PageCanvas, block: &Block, block_index: usize, x: f32, mut y: f32) -> f32 {
        let profile = self.profile();
        let font = profile.font_pt();
        let marked = self.marked_option(block, block_index);
        let style = |index: usize| {
            let letter = option_letter(index);
            if marked == Some(index) {
                (format!("*{}.", letter), BuiltinFont::HelveticaBold)
            } else {
                (format!("{}.", letter), BuiltinFont::Helvetica)
            }
        };

        for row in arrange_options(&block.options, block.kind, profile) {
            match row.second {
                Some(second) => {
                    let second_x = x + profile.half_option_width() + 2.0 * profile.spacing_unit;
                    for (index, option_x) in [(row.first, x), (second, second_x)] {
                        let (label, style_font) = style(index);
                        canvas.text(
                            option_x,
                            self.baseline(y),
                            font,
                            style_font,
                            &format!("{} {}", label, block.options[index]),
                        );
                    }
                    y += profile.line_height;
                }
                None => {
                    let (label, style_font) = style(row.first);
                    canvas.text(x, self.baseline(y), font, style_font, &label);
                    let lines = wrap_text(
                        &block.options[row.first],
                        profile.options_width() - OPTION_LABEL_WIDTH,
                        font,
                    );
                    let after = self.paint_lines(canvas, &lines, x + OPTION_LABEL_WIDTH, y, style_font);
                    y = after.max(y + profile.line_height);
                }
            }
            y += profile.spacing_unit / 4.0;
        }
        y
    }

    fn paint_end_marker(&self, canvas: &mut PageCanvas, x: f32, top: f32) {
        let width = self.profile().column_width;
        canvas.line((x, top + 5.0), (x + width, top + 5.0), RULE_PT);
        canvas.text_centered(
            x + width / 2.0,
            top + 12.0,
            self.profile().font_pt(),
            BuiltinFont::HelveticaBold,
            "*** END ***",
        );
    }
}

/// Draw a padding page carrying only its position in the padded sequence.
pub(crate) fn paint_blank_page(canvas: &mut PageCanvas, page_width: f32, page_height: f32, position: usize) {
    canvas.text_centered(
        page_width / 2.0,
        page_height / 2.0,
        SUBTITLE_PT,
        BuiltinFont::HelveticaOblique,
        BLANK_PAGE_TEXT,
    );
    canvas.text_centered(
        page_width / 2.0,
        page_height - 7.0,
        FOOTER_PT,
        BuiltinFont::Helvetica,
        &format!("Page {}", position),
    );
}

pub(crate) fn save_document(title: &str, pages: Vec<PdfPage>) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(title);
    doc.pages = pages;

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if bytes.is_empty() {
        return Err(RenderError::Pdf(format!("{} produced no output", title)));
    }
    Ok(bytes)
}

/// Render one view of a paper set as a PDF.
pub fn render_paper(
    set: &PaperSet,
    bank: &ExamBank,
    options: &GenerationOptions,
    view: PaperView,
) -> Result<Vec<u8>> {
    let painter = PaperPainter::new(set, bank, options, view);
    let page_count = painter.page_count();
    if page_count == 0 {
        return Err(ExamError::NoPages.into());
    }

    let (width, height) = painter.page_size();
    let pages = (1..=page_count)
        .map(|page| {
            let mut canvas = PageCanvas::new(height);
            painter.paint_page(&mut canvas, page);
            PdfPage::new(Mm(width), Mm(height), canvas.into_ops())
        })
        .collect();

    log::debug!("Rendered set {} ({:?}): {} pages", set.label, view, page_count);
    save_document(&format!("{} - Set {}", options.title, set.label), pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_layout::{Density, LayoutMode, RawQuestion, Section, build, generate_set};

    const EPSILON: f32 = 1e-3;

    fn awkward_text() -> String {
        // Long unbroken words, explicit newlines and words near half a line
        format!(
            "{} \n{}\nfirst line\nsecond line\n{}",
            "abcdefghijklmnopqr ".repeat(10),
            "y".repeat(150),
            "The quick brown fox jumps over the lazy dog. ".repeat(4)
        )
    }

    fn question(fragment: Fragment) -> RawQuestion {
        RawQuestion {
            fragments: vec![Fragment::Text(awkward_text()), fragment],
            options: vec![
                "A".into(),
                "B".into(),
                "An option that is clearly too long to share a row with another one".into(),
                "multi\nline\noption".into(),
            ],
            answer: "B".into(),
            reasoning: Some(awkward_text()),
        }
    }

    fn every_kind() -> Vec<Fragment> {
        let items = || vec![awkward_text(), "short".to_string(), "1\n2\n3".to_string()];
        vec![
            Fragment::Text(awkward_text()),
            Fragment::Statement(awkward_text()),
            Fragment::Statements(items()),
            Fragment::List(items()),
            Fragment::Sequence(items()),
            Fragment::MatchTable {
                left: items(),
                right: vec!["x".into(), awkward_text()],
            },
            Fragment::Paragraph(awkward_text()),
        ]
    }

    #[test]
    fn test_drawn_height_within_estimate() {
        let bank = build(&[Section {
            name: "A section name long enough to wrap onto a second line when it is drawn in bold".into(),
            description: Some(awkward_text()),
            required_questions: None,
            questions: every_kind().into_iter().map(question).collect(),
        }])
        .unwrap();

        for density in [Density::Small, Density::Medium, Density::Large] {
            for layout in [LayoutMode::OneColumn, LayoutMode::TwoColumn] {
                let options = GenerationOptions {
                    density,
                    layout,
                    shuffle: false,
                    ..Default::default()
                };
                let set = generate_set(&bank, 0, &options).unwrap();

                for view in [PaperView::Questions, PaperView::AnswerKey] {
                    let painter = PaperPainter::new(&set, &bank, &options, view);
                    for placement in &set.layout_for(view).placements {
                        let mut canvas = PageCanvas::new(painter.page_height);
                        let x = painter.column_x(placement.column);
                        let top = painter.column_top(placement.page) + placement.offset;
                        let bottom = match placement.item {
                            PlacedItem::Question { block_index } => {
                                painter.paint_question(&mut canvas, block_index, x, top)
                            }
                            PlacedItem::SectionHeader { section_index } => {
                                let section = &bank.sections()[section_index];
                                painter.paint_section_header(
                                    &mut canvas,
                                    &section.name,
                                    section.description.as_deref(),
                                    x,
                                    top,
                                )
                            }
                            PlacedItem::EndMarker => continue,
                        };
                        assert!(
                            bottom - top <= placement.height + EPSILON,
                            "{:?} drew {:.1}mm but was given {:.1}mm ({:?}, {:?})",
                            placement.item,
                            bottom - top,
                            placement.height,
                            density,
                            view
                        );
                    }
                }
            }
        }
    }
}
