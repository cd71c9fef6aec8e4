//! End-to-end tests for the full identification pipeline.

use std::fs;

use untex::{
    identify_files, identify_str, identify_str_with_options, IdentifyOptions, JsonFormat,
    TexParagraph, Untex,
};

const SAMPLE: &str = "\\documentclass{article}\n\
\\newcommand{\\stress}[1]{\\textbf{#1}}\n\
\\title{A Sample}\n\
\\author{Jane Doe}\n\
\\begin{document}\n\
\\maketitle\n\
\\begin{abstract}\n\
A short abstract.\n\
\\end{abstract}\n\
\\section{Introduction}\n\
First paragraph with \\stress{important} words.\n\
\n\
Second paragraph spanning two lines.\n\
\\begin{equation}\n\
E = mc^2\n\
\\end{equation}\n\
continuing after math.\n\
\n\
\\begin{itemize}\n\
\\item apples\n\
\\item oranges\n\
\\end{itemize}\n\
\\end{document}\n";

fn non_blank(paragraphs: Vec<TexParagraph>) -> Vec<TexParagraph> {
    paragraphs
        .into_iter()
        .filter(|p| !p.text().trim().is_empty())
        .collect()
}

#[test]
fn test_sample_document_paragraphs() {
    let mut paragraphs = non_blank(identify_str(SAMPLE).unwrap());

    let summary: Vec<(Option<&str>, &str)> = paragraphs
        .iter()
        .map(|p| (p.feature(), p.text()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some("abstract"), "A short abstract."),
            (Some("heading"), "Introduction"),
            (Some("text"), "First paragraph with important words."),
            (
                Some("text"),
                "Second paragraph spanning two lines. continuing after math."
            ),
            (Some("item"), "apples"),
            (Some("item"), "oranges"),
        ]
    );

    // Provenance: the abstract body sits on lines 7-8, the heading on
    // line 10, the math paragraph covers its text and the whole formula
    // block, the items sit on their own lines.
    assert_eq!(paragraphs[0].tex_line_numbers(), &[7, 8]);
    assert_eq!(paragraphs[1].tex_line_numbers(), &[10]);
    assert_eq!(paragraphs[3].tex_line_numbers(), &[13, 14, 15, 16, 17]);
    assert_eq!(paragraphs[4].tex_line_numbers(), &[20]);
    assert_eq!(paragraphs[5].tex_line_numbers(), &[21]);
}

#[test]
fn test_preamble_is_excluded() {
    let paragraphs = identify_str(SAMPLE).unwrap();
    for paragraph in &paragraphs {
        assert_ne!(paragraph.feature(), Some("title"));
        assert_ne!(paragraph.feature(), Some("author"));
        assert!(!paragraph.text().contains("A Sample"));
        assert!(!paragraph.text().contains("Jane Doe"));
    }
}

#[test]
fn test_macro_resolution_preserves_provenance() {
    // The \stress call expands to \textbf on the same source line, so the
    // paragraph using it must still point at line 11.
    let mut paragraphs = non_blank(identify_str(SAMPLE).unwrap());
    let first_text = &mut paragraphs[2];
    assert!(first_text.tex_line_numbers().contains(&11));
}

#[test]
fn test_keep_macros_option() {
    let options = IdentifyOptions::new().keep_macros();
    let paragraphs = non_blank(identify_str_with_options(SAMPLE, &options).unwrap());
    // Unexpanded, \stress is an unknown command and contributes no text.
    assert_eq!(paragraphs[2].text(), "First paragraph with words.");
}

#[test]
fn test_identify_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.tex");
    fs::write(&path, SAMPLE).unwrap();

    let paragraphs = non_blank(untex::identify_file(&path).unwrap());
    assert_eq!(paragraphs.len(), 6);
}

#[test]
fn test_identify_files_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.tex");
    let bad = dir.path().join("missing.tex");
    fs::write(&good, "Hello\n\nWorld\n").unwrap();

    for options in [IdentifyOptions::new(), IdentifyOptions::new().sequential()] {
        let results = identify_files(&[good.clone(), bad.clone()], &options);
        assert_eq!(results.len(), 2);

        let (_, good_result) = results.iter().find(|(p, _)| *p == good).unwrap();
        assert_eq!(good_result.as_ref().unwrap().len(), 2);

        let (_, bad_result) = results.iter().find(|(p, _)| *p == bad).unwrap();
        assert!(bad_result.is_err());
    }
}

#[test]
fn test_json_rendering() {
    let mut result = Untex::new().identify_str(SAMPLE).unwrap();
    let json = result.to_json(JsonFormat::Pretty).unwrap();

    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = records.as_array().unwrap();
    let abstract_record = records
        .iter()
        .find(|r| r["feature"] == "abstract")
        .unwrap();
    assert_eq!(abstract_record["text"], "A short abstract.");
    assert_eq!(abstract_record["start_line"], 7);
    assert_eq!(abstract_record["end_line"], 8);
    assert_eq!(abstract_record["line_numbers"][0], 7);
}

#[test]
fn test_text_rendering() {
    let mut result = Untex::new().identify_str("Alpha\n\nBeta\n").unwrap();
    assert_eq!(result.to_text(), "1\t1\ttext\tAlpha\n3\t3\ttext\tBeta\n");
}

#[test]
fn test_resolve_macros_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("in.tex");
    let target = dir.path().join("out.tex");
    fs::write(&source, "\\newcommand{\\x}{Y}\n\\x\n").unwrap();

    untex::resolve_macros_file(&source, &target).unwrap();
    let out = fs::read_to_string(&target).unwrap();
    assert!(out.contains('Y'));
    assert!(!out.contains("newcommand"));
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_parse_error_propagates() {
    assert!(matches!(
        identify_str("{never closed"),
        Err(untex::Error::Parse(_))
    ));
}

#[test]
fn test_unclosed_environment_aborts() {
    let input = "\\begin{document}\n\\begin{equation}\nx\n\\end{document}\n";
    assert!(matches!(
        identify_str(input),
        Err(untex::Error::Structure(_))
    ));
}
