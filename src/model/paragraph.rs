//! The paragraph accumulator.

use std::collections::HashSet;

use super::Element;
use crate::geom::PdfParagraph;

/// A logical paragraph extracted from a TeX document.
///
/// The accumulator collects text with whitespace normalization, remembers
/// every element that contributed to it, and tracks the deduplicated set of
/// source lines those elements span. The sorted line list is derived lazily:
/// it is recomputed from the internal set only when the set changed since the
/// last read.
#[derive(Debug, Clone, Default)]
pub struct TexParagraph {
    /// The feature role of this paragraph (body text, heading, caption, ...).
    feature: Option<String>,

    /// The accumulated text.
    text: String,

    /// Whether a whitespace must be introduced before the next text write.
    introduce_whitespace: bool,

    /// Every element registered into this paragraph, in registration order.
    elements: Vec<Element>,

    /// The line numbers of this paragraph, deduplicated.
    line_set: HashSet<u32>,

    /// The sorted line numbers, derived from `line_set`.
    line_nums: Vec<u32>,

    /// Whether `line_nums` must be recomputed from `line_set`.
    dirty: bool,

    /// The associated geometric paragraphs, appended by the caller.
    pdf_paragraphs: Vec<PdfParagraph>,
}

impl TexParagraph {
    /// Create a new paragraph without a feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new paragraph with the given feature.
    pub fn with_feature(feature: impl Into<String>) -> Self {
        Self {
            feature: Some(feature.into()),
            ..Self::default()
        }
    }

    /// Set the feature of this paragraph.
    pub fn set_feature(&mut self, feature: impl Into<String>) {
        self.feature = Some(feature.into());
    }

    /// Get the feature of this paragraph.
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    // -----------------------------------------------------------------------

    /// Register a whitespace to introduce before the next text write. A run
    /// of registered whitespace still yields exactly one space character.
    pub fn register_whitespace(&mut self) {
        self.introduce_whitespace = true;
    }

    /// Write the given text to this paragraph. Emits a single pending space
    /// first if one was registered; no space is ever introduced before the
    /// first non-whitespace write.
    pub fn write_str(&mut self, text: &str) {
        if self.introduce_whitespace {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.introduce_whitespace = false;
        }
        self.text.push_str(text);
    }

    /// Get the accumulated text of this paragraph.
    pub fn text(&self) -> &str {
        &self.text
    }

    // -----------------------------------------------------------------------

    /// Register the given element into this paragraph, recording the line
    /// numbers of the element and all its sub-elements.
    pub fn register_element(&mut self, element: &Element) {
        self.elements.push(element.clone());
        self.register_line_numbers(element);
    }

    /// Record the line numbers of the given element and all its sub-elements.
    /// For commands, options are walked before argument groups.
    fn register_line_numbers(&mut self, element: &Element) {
        match element {
            Element::Text(_) => {}
            Element::Group(group) => {
                for child in &group.elements {
                    self.register_line_numbers(child);
                }
            }
            Element::OptGroup(opt) => {
                for child in &opt.elements {
                    self.register_line_numbers(child);
                }
            }
            Element::Command(cmd) => {
                for option in &cmd.options {
                    for child in &option.elements {
                        self.register_line_numbers(child);
                    }
                }
                for arg in &cmd.args {
                    for child in &arg.elements {
                        self.register_line_numbers(child);
                    }
                }
            }
        }

        let span = element.span();
        if self.line_set.insert(span.begin) {
            self.dirty = true;
        }
        if self.line_set.insert(span.end) {
            self.dirty = true;
        }
    }

    /// Get the registered elements.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get the line numbers of this paragraph, sorted ascending and free of
    /// duplicates. The cached list is recomputed only if registrations
    /// happened since the last read.
    pub fn tex_line_numbers(&mut self) -> &[u32] {
        if self.dirty {
            self.line_nums = self.line_set.iter().copied().collect();
            self.line_nums.sort_unstable();
            self.dirty = false;
        }
        &self.line_nums
    }

    // -----------------------------------------------------------------------

    /// Check if this paragraph is empty, i.e. no element was ever registered.
    pub fn is_empty(&self) -> bool {
        self.line_set.is_empty()
    }

    /// Get the first source line of this paragraph, or `None` if empty.
    pub fn tex_start_line(&mut self) -> Option<u32> {
        self.tex_line_numbers().first().copied()
    }

    /// Get the last source line of this paragraph, or `None` if empty.
    pub fn tex_end_line(&mut self) -> Option<u32> {
        self.tex_line_numbers().last().copied()
    }

    // -----------------------------------------------------------------------

    /// Add a geometric paragraph to this paragraph.
    pub fn add_pdf_paragraph(&mut self, paragraph: PdfParagraph) {
        self.pdf_paragraphs.push(paragraph);
    }

    /// Get the geometric paragraphs associated with this paragraph.
    pub fn pdf_paragraphs(&self) -> &[PdfParagraph] {
        &self.pdf_paragraphs
    }
}
