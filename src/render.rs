//! Output rendering for identified paragraphs.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::TexParagraph;

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Human-readable, indented
    Pretty,

    /// Single line, minimal
    Compact,
}

/// The serializable view of a paragraph.
#[derive(Debug, Serialize)]
pub struct ParagraphRecord {
    /// Feature role of the paragraph
    pub feature: Option<String>,

    /// Normalized paragraph text
    pub text: String,

    /// First source line, absent for paragraphs without provenance
    pub start_line: Option<u32>,

    /// Last source line
    pub end_line: Option<u32>,

    /// All source lines, sorted ascending
    pub line_numbers: Vec<u32>,
}

impl ParagraphRecord {
    /// Build the record for a paragraph. Takes `&mut` because reading the
    /// line numbers may refresh the paragraph's lazy cache.
    pub fn from_paragraph(paragraph: &mut TexParagraph) -> Self {
        let line_numbers = paragraph.tex_line_numbers().to_vec();
        Self {
            feature: paragraph.feature().map(String::from),
            text: paragraph.text().to_string(),
            start_line: line_numbers.first().copied(),
            end_line: line_numbers.last().copied(),
            line_numbers,
        }
    }
}

/// Render the paragraphs as JSON.
pub fn to_json(paragraphs: &mut [TexParagraph], format: JsonFormat) -> Result<String> {
    let records: Vec<ParagraphRecord> = paragraphs
        .iter_mut()
        .map(ParagraphRecord::from_paragraph)
        .collect();
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&records),
        JsonFormat::Compact => serde_json::to_string(&records),
    };
    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render the paragraphs as tab-separated lines of
/// `start<TAB>end<TAB>feature<TAB>text`. Paragraphs with blank text are
/// skipped.
pub fn to_text(paragraphs: &mut [TexParagraph]) -> String {
    let mut out = String::new();
    for paragraph in paragraphs.iter_mut() {
        if paragraph.text().trim().is_empty() {
            continue;
        }
        let (Some(start), Some(end)) = (paragraph.tex_start_line(), paragraph.tex_end_line())
        else {
            continue;
        };
        let feature = paragraph.feature().unwrap_or("text").to_string();
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            start,
            end,
            feature,
            paragraph.text()
        ));
    }
    out
}
