//! Styled text with inline placeholders.

/// Style override for a range of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanStyle {
    pub font_size: Option<f32>,
    pub letter_spacing: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub style: SpanStyle,
}

/// Where a placeholder sits relative to the line it is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaceholderVerticalAlign {
    /// Bottom of the placeholder on the baseline.
    #[default]
    AboveBaseline,
    Top,
    Bottom,
    Center,
}

/// Space reserved in the text for inline content. It replaces the
/// characters in `start..end`; the first of them takes the placeholder's width.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub start: usize,
    pub end: usize,
    pub width: f32,
    pub height: f32,
    pub vertical_align: PlaceholderVerticalAlign,
}

/// Text with character-offset span styles and placeholders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotatedString {
    text: String,
    spans: Vec<StyleRange>,
    placeholders: Vec<Placeholder>,
}

impl AnnotatedString {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
            placeholders: Vec::new(),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize, style: SpanStyle) -> Self {
        self.spans.push(StyleRange { start, end, style });
        self
    }

    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholders.push(placeholder);
        self.placeholders.sort_by_key(|p| p.start);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[StyleRange] {
        &self.spans
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The part of the text in `start..end` (char offsets), with spans and
    /// placeholders clipped and re-based to it.
    pub fn sub_sequence(&self, start: usize, end: usize) -> AnnotatedString {
        let text: String = self.text.chars().skip(start).take(end - start).collect();
        let spans = self
            .spans
            .iter()
            .filter(|span| span.start < end && span.end > start)
            .map(|span| StyleRange {
                start: span.start.max(start) - start,
                end: span.end.min(end) - start,
                style: span.style.clone(),
            })
            .collect();
        let placeholders = self
            .placeholders
            .iter()
            .filter(|p| p.start >= start && p.end <= end)
            .map(|p| Placeholder {
                start: p.start - start,
                end: p.end - start,
                ..p.clone()
            })
            .collect();
        AnnotatedString {
            text,
            spans,
            placeholders,
        }
    }
}

impl From<&str> for AnnotatedString {
    fn from(text: &str) -> Self {
        AnnotatedString::new(text)
    }
}

impl From<String> for AnnotatedString {
    fn from(text: String) -> Self {
        AnnotatedString::new(text)
    }
}
