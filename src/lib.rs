//! # untex
//!
//! Identify the logical paragraphs of TeX and LaTeX documents, with exact
//! source line provenance for every paragraph.
//!
//! The pipeline resolves user-defined macros, parses the markup into an
//! element tree and segments the document body into paragraphs labeled with
//! their role (body text, heading, caption, item, ...).
//!
//! ## Quick start
//!
//! ```
//! let mut paragraphs = untex::identify_str("Hello\n\nWorld\n")?;
//! assert_eq!(paragraphs.len(), 2);
//! assert_eq!(paragraphs[0].text(), "Hello");
//! assert_eq!(paragraphs[1].tex_line_numbers(), &[3]);
//! # Ok::<(), untex::Error>(())
//! ```
//!
//! ## Builder API
//!
//! ```
//! use untex::Untex;
//!
//! let result = Untex::new()
//!     .keep_macros()
//!     .with_default_feature("body")
//!     .identify_str("Just prose\n")?;
//! assert_eq!(result.paragraphs()[0].feature(), Some("body"));
//! # Ok::<(), untex::Error>(())
//! ```

pub mod error;
pub mod geom;
pub mod identify;
pub mod model;
pub mod parser;
pub mod render;

pub use error::{Error, Result};
pub use geom::{PageBoxSource, PdfPageProvider, PdfParagraph, Rectangle};
pub use identify::{ParagraphIdentifier, ParagraphSegmenter, Rules};
pub use model::{Command, Element, ElementIter, Group, OptGroup, Span, TexDocument, TexParagraph, Text};
pub use parser::{parse_tex, resolve_macros, resolve_macros_file, IdentifyOptions};
pub use render::{JsonFormat, ParagraphRecord};

use std::path::{Path, PathBuf};

use rayon::prelude::*;

/// Identify the paragraphs of a TeX file with default options.
pub fn identify_file(path: impl AsRef<Path>) -> Result<Vec<TexParagraph>> {
    identify_file_with_options(path, &IdentifyOptions::default())
}

/// Identify the paragraphs of a TeX file with the given options.
pub fn identify_file_with_options(
    path: impl AsRef<Path>,
    options: &IdentifyOptions,
) -> Result<Vec<TexParagraph>> {
    ParagraphIdentifier::new(options.clone()).identify_file(path.as_ref())
}

/// Identify the paragraphs of TeX markup with default options.
pub fn identify_str(input: &str) -> Result<Vec<TexParagraph>> {
    identify_str_with_options(input, &IdentifyOptions::default())
}

/// Identify the paragraphs of TeX markup with the given options.
pub fn identify_str_with_options(
    input: &str,
    options: &IdentifyOptions,
) -> Result<Vec<TexParagraph>> {
    ParagraphIdentifier::new(options.clone()).identify_str(input)
}

/// Identify the paragraphs of many TeX files, in parallel unless the options
/// say otherwise. Each file fails or succeeds on its own.
pub fn identify_files(
    paths: &[PathBuf],
    options: &IdentifyOptions,
) -> Vec<(PathBuf, Result<Vec<TexParagraph>>)> {
    let identify = |path: &PathBuf| {
        (
            path.clone(),
            ParagraphIdentifier::new(options.clone()).identify_file(path),
        )
    };
    if options.parallel {
        paths.par_iter().map(identify).collect()
    } else {
        paths.iter().map(identify).collect()
    }
}

// ---------------------------------------------------------------------------

/// Chainable entry point for configuring and running identification.
#[derive(Debug, Clone, Default)]
pub struct Untex {
    options: IdentifyOptions,
    rules: Option<Rules>,
}

impl Untex {
    /// Create a new instance with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the macro resolution pass.
    pub fn keep_macros(mut self) -> Self {
        self.options.resolve_macros = false;
        self
    }

    /// Set the feature label used for ordinary body text.
    pub fn with_default_feature(mut self, feature: impl Into<String>) -> Self {
        self.options.default_feature = feature.into();
        self
    }

    /// Disable parallel processing in the batch API.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Replace the segmentation ruleset.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Identify the paragraphs of a TeX file.
    pub fn identify(&self, path: impl AsRef<Path>) -> Result<UntexResult> {
        let paragraphs = self.identifier().identify_file(path.as_ref())?;
        Ok(UntexResult { paragraphs })
    }

    /// Identify the paragraphs of TeX markup.
    pub fn identify_str(&self, input: &str) -> Result<UntexResult> {
        let paragraphs = self.identifier().identify_str(input)?;
        Ok(UntexResult { paragraphs })
    }

    fn identifier(&self) -> ParagraphIdentifier {
        let identifier = ParagraphIdentifier::new(self.options.clone());
        match &self.rules {
            Some(rules) => identifier.with_rules(rules.clone()),
            None => identifier,
        }
    }
}

/// The outcome of an identification run, with rendering helpers.
#[derive(Debug)]
pub struct UntexResult {
    paragraphs: Vec<TexParagraph>,
}

impl UntexResult {
    /// Get the identified paragraphs.
    pub fn paragraphs(&self) -> &[TexParagraph] {
        &self.paragraphs
    }

    /// Consume the result and take ownership of the paragraphs.
    pub fn into_paragraphs(self) -> Vec<TexParagraph> {
        self.paragraphs
    }

    /// Render the paragraphs as JSON.
    pub fn to_json(&mut self, format: JsonFormat) -> Result<String> {
        render::to_json(&mut self.paragraphs, format)
    }

    /// Render the paragraphs as tab-separated provenance lines.
    pub fn to_text(&mut self) -> String {
        render::to_text(&mut self.paragraphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_str_default() {
        let paragraphs = identify_str("Hello\n\nWorld\n").unwrap();
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_builder_identify_str() {
        let mut result = Untex::new()
            .keep_macros()
            .identify_str("\\section{A}\nBody\n")
            .unwrap();
        assert_eq!(result.paragraphs().len(), 2);
        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"feature\":\"heading\""));
    }

    #[test]
    fn test_builder_text_output() {
        let mut result = Untex::new().identify_str("One\n\nTwo\n").unwrap();
        let text = result.to_text();
        assert_eq!(text, "1\t1\ttext\tOne\n3\t3\ttext\tTwo\n");
    }
}
