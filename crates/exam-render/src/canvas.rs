use exam_layout::text_width;
use printpdf::*;

/// Collects drawing ops for one output page.
///
/// Coordinates are in mm measured from the top-left corner of the logical
/// page; `x_offset` shifts the logical page across a wider sheet side.
pub(crate) struct PageCanvas {
    ops: Vec<Op>,
    x_offset: f32,
    height: f32,
}

impl PageCanvas {
    pub fn new(height: f32) -> Self {
        Self {
            ops: Vec::new(),
            x_offset: 0.0,
            height,
        }
    }

    pub fn set_x_offset(&mut self, x_offset: f32) {
        self.x_offset = x_offset;
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point {
            x: Mm(self.x_offset + x).into_pt(),
            y: Mm(self.height - y).into_pt(),
        }
    }

    /// Draw `text` with its baseline at `y`.
    pub fn text(&mut self, x: f32, y: f32, size_pt: f32, font: BuiltinFont, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.point(x, y);
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor { pos });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            font,
            size: Pt(size_pt),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    pub fn text_centered(&mut self, center_x: f32, y: f32, size_pt: f32, font: BuiltinFont, text: &str) {
        let x = center_x - text_width(text, size_pt) / 2.0;
        self.text(x, y, size_pt, font, text);
    }

    pub fn text_right(&mut self, right_x: f32, y: f32, size_pt: f32, font: BuiltinFont, text: &str) {
        let x = right_x - text_width(text, size_pt);
        self.text(x, y, size_pt, font, text);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness_pt: f32) {
        let points = vec![
            LinePoint {
                p: self.point(from.0, from.1),
                bezier: false,
            },
            LinePoint {
                p: self.point(to.0, to.1),
                bezier: false,
            },
        ];
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(thickness_pt),
        });
        self.ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: false,
            },
        });
    }
}
