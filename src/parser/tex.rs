//! TeX markup parser producing the element tree.
//!
//! A line-tracking tokenizer and recursive-descent builder. Comments are
//! stripped, commands greedily absorb immediately adjacent `[...]` options
//! and `{...}` argument groups, braced scopes outside command position
//! become groups, and everything else becomes text runs with blank lines
//! preserved so the segmenter can split on them.

use crate::error::{Error, Result};
use crate::model::{Command, Element, Group, OptGroup, Span, TexDocument, Text};

/// Parse macro-free TeX markup into a [`TexDocument`].
pub fn parse_tex(input: &str) -> Result<TexDocument> {
    let mut parser = TexParser::new(input);
    let elements = parser.parse_elements(None)?;
    log::debug!(
        "parsed {} top-level elements over {} lines",
        elements.len(),
        parser.line
    );
    Ok(TexDocument {
        elements,
        line_count: parser.line,
    })
}

/// Control symbols that escape a literal character.
const ESCAPES: &[char] = &['%', '&', '_', '$', '#', '{', '}', ' '];

struct TexParser {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl TexParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Parse a sequence of elements up to the given terminator character
    /// (`}` or `]`), which is left unconsumed, or up to the end of input.
    fn parse_elements(&mut self, terminator: Option<char>) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                None => {
                    if let Some(t) = terminator {
                        return Err(Error::Parse(format!(
                            "unbalanced group, expected '{}' before end of input",
                            t
                        )));
                    }
                    break;
                }
                Some(c) if Some(c) == terminator => break,
                Some('}') => {
                    return Err(Error::Parse(format!(
                        "unexpected '}}' at line {}",
                        self.line
                    )));
                }
                Some('{') => {
                    let group = self.parse_group()?;
                    elements.push(Element::Group(group));
                }
                Some('\\') => {
                    elements.push(self.parse_command()?);
                }
                Some('%') => {
                    self.skip_comment();
                }
                Some(_) => {
                    elements.push(self.parse_text(terminator)?);
                }
            }
        }
        Ok(elements)
    }

    fn parse_group(&mut self) -> Result<Group> {
        let begin = self.line;
        self.bump(); // '{'
        let elements = self.parse_elements(Some('}'))?;
        self.bump(); // '}'
        Ok(Group {
            elements,
            span: Span::new(begin, self.line),
        })
    }

    fn parse_opt_group(&mut self) -> Result<OptGroup> {
        let begin = self.line;
        self.bump(); // '['
        let elements = self.parse_elements(Some(']'))?;
        self.bump(); // ']'
        Ok(OptGroup {
            elements,
            span: Span::new(begin, self.line),
        })
    }

    fn parse_command(&mut self) -> Result<Element> {
        let begin = self.line;
        self.bump(); // backslash

        let name = match self.peek() {
            None => {
                return Err(Error::Parse(format!(
                    "dangling '\\' at line {}",
                    self.line
                )));
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(c) = self.peek() {
                    if !c.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(c);
                    self.bump();
                }
                // Starred variants keep the star in the name.
                if self.peek() == Some('*') {
                    name.push('*');
                    self.bump();
                }
                name
            }
            Some(c) if ESCAPES.contains(&c) => {
                // Escaped literal character, e.g. \% or \&.
                self.bump();
                return Ok(Element::Text(Text {
                    text: c.to_string(),
                    span: Span::line(begin),
                }));
            }
            Some(c) => {
                // Control symbol, e.g. \\ or \,.
                self.bump();
                c.to_string()
            }
        };

        // Absorb immediately adjacent options and argument groups.
        let mut options = Vec::new();
        let mut args = Vec::new();
        loop {
            match self.peek() {
                Some('[') => options.push(self.parse_opt_group()?),
                Some('{') => args.push(self.parse_group()?),
                _ => break,
            }
        }

        Ok(Element::Command(Command {
            name,
            options,
            args,
            span: Span::new(begin, self.line),
        }))
    }

    fn parse_text(&mut self, terminator: Option<char>) -> Result<Element> {
        let begin = self.line;
        let mut end = begin;
        let mut buf = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' || c == '{' || c == '%' {
                break;
            }
            if Some(c) == terminator {
                break;
            }
            if c == '}' {
                return Err(Error::Parse(format!(
                    "unexpected '}}' at line {}",
                    self.line
                )));
            }
            if c != '\n' {
                end = self.line;
            }
            buf.push(c);
            self.bump();
        }
        Ok(Element::Text(Text {
            text: buf,
            span: Span::new(begin, end.max(begin)),
        }))
    }

    /// Consume a `%` comment through the end of the line, including the
    /// newline (TeX comments eat the line break).
    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;

    #[test]
    fn test_parse_plain_text() {
        let doc = parse_tex("Hello world").unwrap();
        assert_eq!(doc.element_count(), 1);
        match &doc.elements[0] {
            Element::Text(text) => {
                assert_eq!(text.text, "Hello world");
                assert_eq!(text.span, Span::line(1));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_command_with_arg() {
        let doc = parse_tex("\\section{Introduction}").unwrap();
        assert_eq!(doc.element_count(), 1);
        let cmd = doc.elements[0].as_command().expect("command");
        assert_eq!(cmd.name, "section");
        assert_eq!(cmd.args.len(), 1);
        assert_eq!(doc.elements[0].to_string(), "\\section{Introduction}");
    }

    #[test]
    fn test_parse_starred_command() {
        let doc = parse_tex("\\section*{A}").unwrap();
        let cmd = doc.elements[0].as_command().expect("command");
        assert_eq!(cmd.name, "section*");
    }

    #[test]
    fn test_parse_command_with_option() {
        let doc = parse_tex("\\includegraphics[scale=0.5]{fig}").unwrap();
        let cmd = doc.elements[0].as_command().expect("command");
        assert_eq!(cmd.options.len(), 1);
        assert_eq!(cmd.args.len(), 1);
    }

    #[test]
    fn test_line_spans_across_lines() {
        let doc = parse_tex("line one\nline two\n").unwrap();
        let span = doc.elements[0].span();
        assert_eq!(span.begin, 1);
        assert_eq!(span.end, 2);
        assert_eq!(doc.line_count, 3);
    }

    #[test]
    fn test_comment_is_stripped() {
        let doc = parse_tex("before % comment\nafter").unwrap();
        // The comment eats the newline, so both runs stay separate text
        // elements on consecutive lines.
        let texts: Vec<String> = doc
            .elements
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(texts, vec!["before ".to_string(), "after".to_string()]);
    }

    #[test]
    fn test_escaped_percent_is_text() {
        let doc = parse_tex("50\\% done").unwrap();
        let joined: String = doc.elements.iter().map(|e| e.to_string()).collect();
        assert_eq!(joined, "50% done");
    }

    #[test]
    fn test_nested_groups() {
        let doc = parse_tex("{outer {inner} tail}").unwrap();
        assert_eq!(doc.element_count(), 1);
        match &doc.elements[0] {
            Element::Group(group) => assert_eq!(group.elements.len(), 3),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_group_fails() {
        assert!(matches!(parse_tex("{never closed"), Err(Error::Parse(_))));
        assert!(matches!(parse_tex("stray } brace"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_begin_document_round_trips() {
        let doc = parse_tex("\\begin{document}body\\end{document}").unwrap();
        assert_eq!(
            doc.environment_begin("document"),
            Some("\\begin{document}".to_string())
        );
        assert_eq!(
            doc.environment_end("document"),
            Some("\\end{document}".to_string())
        );
    }
}
