//! Segmentation behavior tests against the public API.

use untex::{
    identify_str, parse_tex, Element, ElementIter, ParagraphSegmenter, Rules, TexParagraph,
};

fn non_blank(paragraphs: Vec<TexParagraph>) -> Vec<TexParagraph> {
    paragraphs
        .into_iter()
        .filter(|p| !p.text().trim().is_empty())
        .collect()
}

#[test]
fn test_par_command_provenance() {
    let mut paragraphs = identify_str("Hello\n\\par\nWorld\n").unwrap();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "Hello");
    assert_eq!(paragraphs[0].tex_line_numbers(), &[1]);
    assert_eq!(paragraphs[1].text(), "World");
    assert_eq!(paragraphs[1].tex_line_numbers(), &[2, 3]);
}

#[test]
fn test_forced_line_break_closes_paragraph() {
    let paragraphs = non_blank(identify_str("alpha \\\\ beta\n").unwrap());
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "alpha");
    assert_eq!(paragraphs[0].feature(), Some("text"));
    assert_eq!(paragraphs[1].text(), "beta");
}

#[test]
fn test_whitespace_is_normalized() {
    let paragraphs = identify_str("a   b\t c\nd\n").unwrap();
    assert_eq!(paragraphs[0].text(), "a b c d");
}

#[test]
fn test_no_leading_or_trailing_whitespace() {
    let paragraphs = identify_str("   padded   \n").unwrap();
    assert_eq!(paragraphs[0].text(), "padded");
}

#[test]
fn test_line_numbers_sorted_unique_and_in_range() {
    let input = "\\section{A}\nText over\nthree\nlines here\n\n\\begin{align}\nx\n\\end{align}\n";
    let document = parse_tex(input).unwrap();
    let line_count = document.line_count;

    let mut paragraphs = identify_str(input).unwrap();
    for paragraph in &mut paragraphs {
        let lines = paragraph.tex_line_numbers().to_vec();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(lines, sorted);
        for line in lines {
            assert!(line >= 1 && line <= line_count);
        }
    }
}

#[test]
fn test_elements_conserved_across_paragraphs() {
    // No blank lines, so no text element is re-synthesized: every top-level
    // element of the document must land in exactly one paragraph's element
    // list, none dropped and none duplicated.
    let input = "\\section{One}\nAlpha \\textbf{bold} mid\n\\label{x}\n{grouped}\n\
                 \\begin{equation}\ny\n\\end{equation}\ntail\n";
    let document = parse_tex(input).unwrap();
    let rules = Rules::default();
    let paragraphs = ParagraphSegmenter::new(&document, &rules, "text")
        .identify()
        .unwrap();

    let key = |e: &Element| format!("{:?}>{}", e.span(), e);
    let mut expected: Vec<String> = document.elements.iter().map(key).collect();
    let mut registered: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| p.elements().iter())
        .map(key)
        .collect();
    expected.sort();
    registered.sort();
    assert_eq!(registered, expected);
}

#[test]
fn test_every_paragraph_has_elements() {
    let paragraphs = identify_str("One\n\nTwo \\textbf{bold}\n\n\\section{Three}\n").unwrap();
    for paragraph in &paragraphs {
        assert!(!paragraph.elements().is_empty());
        assert!(!paragraph.is_empty());
    }
}

#[test]
fn test_multiple_blank_lines_collapse_to_one_break() {
    let paragraphs = non_blank(identify_str("One\n\n\n\n\nTwo\n").unwrap());
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "One");
    assert_eq!(paragraphs[1].text(), "Two");
}

#[test]
fn test_nested_same_environment_in_opaque_body() {
    let input = "x\n\\begin{equation}\n\\begin{equation}\na\n\\end{equation}\nb\n\\end{equation}\ny\n";
    let paragraphs = non_blank(identify_str(input).unwrap());
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(paragraphs[0].text(), "x y");
}

#[test]
fn test_custom_rules_override_segmentation() {
    let mut rules = Rules::empty();
    rules.add_breaking("mybreak");

    let document = parse_tex("one \\mybreak two\n").unwrap();
    let paragraphs = ParagraphSegmenter::new(&document, &rules, "text")
        .identify()
        .unwrap();
    let paragraphs = non_blank(paragraphs);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "one");
    assert_eq!(paragraphs[1].text(), "two");
}

#[test]
fn test_bounded_iterator_over_document_body() {
    let document = parse_tex("pre\n\\begin{document}\nbody\n\\end{document}\npost\n").unwrap();
    let start = document.environment_begin("document").unwrap();
    let end = document.environment_end("document").unwrap();

    let mut iter = ElementIter::bounded(&document.elements, Some(&start), Some(&end));
    let mut seen = Vec::new();
    while iter.has_next() {
        seen.push(iter.next().unwrap().to_string());
    }
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("body"));
    assert!(iter.next().is_err());
}

#[test]
fn test_comments_do_not_contribute_text() {
    let paragraphs = identify_str("visible % hidden comment\ntext\n").unwrap();
    assert_eq!(paragraphs[0].text(), "visible text");
}

#[test]
fn test_escaped_characters_are_literal() {
    let paragraphs = identify_str("100\\% of 50\\$\n").unwrap();
    assert_eq!(paragraphs[0].text(), "100% of 50$");
}
