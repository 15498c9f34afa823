//! Draw recording used in place of a GPU canvas

use crate::{Color, Path, Point, Rect, Size};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawPrimitive {
    Rect { rect: Rect, color: Color },
    Path { path: Path, color: Color },
    /// A run of glyphs drawn from `origin` (top-left of the line box).
    Text {
        text: String,
        origin: Point,
        baseline: f32,
        font_size: f32,
        color: Color,
    },
    ClipRect(Rect),
    RestoreClip,
}

pub trait DrawScope {
    fn size(&self) -> Size;
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_path(&mut self, path: &Path, color: Color);
    fn draw_text(&mut self, text: &str, origin: Point, baseline: f32, font_size: f32, color: Color);
    fn clip_rect(&mut self, rect: Rect);
    fn restore_clip(&mut self);
}

/// A [`DrawScope`] that stores everything it is asked to draw.
#[derive(Default)]
pub struct RecordingDrawScope {
    size: Size,
    primitives: Vec<DrawPrimitive>,
}

impl RecordingDrawScope {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            primitives: Vec::new(),
        }
    }

    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<DrawPrimitive> {
        self.primitives
    }
}

impl DrawScope for RecordingDrawScope {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.primitives.push(DrawPrimitive::Rect { rect, color });
    }

    fn draw_path(&mut self, path: &Path, color: Color) {
        if path.is_empty() {
            return;
        }
        self.primitives.push(DrawPrimitive::Path {
            path: path.clone(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, baseline: f32, font_size: f32, color: Color) {
        self.primitives.push(DrawPrimitive::Text {
            text: text.to_string(),
            origin,
            baseline,
            font_size,
            color,
        });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.primitives.push(DrawPrimitive::ClipRect(rect));
    }

    fn restore_clip(&mut self) {
        self.primitives.push(DrawPrimitive::RestoreClip);
    }
}
