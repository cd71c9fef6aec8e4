//! Paragraph identification.
//!
//! Ties the preprocessing, parsing and segmentation stages together behind
//! one entry point.

mod rules;
mod segmenter;

pub use rules::Rules;
pub use segmenter::ParagraphSegmenter;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::{TexDocument, TexParagraph};
use crate::parser::{parse_tex, resolve_macros, IdentifyOptions};

/// The full identification pipeline: macro resolution, parsing and
/// segmentation, driven by [`IdentifyOptions`] and a [`Rules`] set.
pub struct ParagraphIdentifier {
    options: IdentifyOptions,
    rules: Rules,
}

impl ParagraphIdentifier {
    /// Create an identifier with the given options and the standard ruleset.
    pub fn new(options: IdentifyOptions) -> Self {
        Self {
            options,
            rules: Rules::default(),
        }
    }

    /// Replace the ruleset.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Identify the paragraphs of a TeX file.
    pub fn identify_file(&self, path: &Path) -> Result<Vec<TexParagraph>> {
        log::debug!("identifying paragraphs in {}", path.display());
        let input = fs::read_to_string(path)?;
        self.identify_str(&input)
    }

    /// Identify the paragraphs of TeX markup.
    pub fn identify_str(&self, input: &str) -> Result<Vec<TexParagraph>> {
        let resolved;
        let source = if self.options.resolve_macros {
            resolved = resolve_macros(input)?;
            &resolved
        } else {
            input
        };
        let document = parse_tex(source)?;
        self.identify_document(&document)
    }

    /// Identify the paragraphs of an already parsed document.
    pub fn identify_document(&self, document: &TexDocument) -> Result<Vec<TexParagraph>> {
        ParagraphSegmenter::new(document, &self.rules, &self.options.default_feature).identify()
    }
}

impl Default for ParagraphIdentifier {
    fn default() -> Self {
        Self::new(IdentifyOptions::default())
    }
}
