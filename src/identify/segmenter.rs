//! The paragraph segmentation algorithm.
//!
//! A single forward pass over the document body turns the element sequence
//! into logical paragraphs. Text runs are split at blank lines, commands are
//! dispatched through the [`Rules`] and every element that contributes to a
//! paragraph is registered into it, so line provenance falls out of the
//! accumulator for free.

use crate::error::{Error, Result};
use crate::identify::Rules;
use crate::model::{Command, Element, ElementIter, Span, TexDocument, TexParagraph, Text};

/// Segments a parsed document into logical paragraphs.
pub struct ParagraphSegmenter<'a> {
    document: &'a TexDocument,
    rules: &'a Rules,
    default_feature: &'a str,
}

impl<'a> ParagraphSegmenter<'a> {
    pub fn new(document: &'a TexDocument, rules: &'a Rules, default_feature: &'a str) -> Self {
        Self {
            document,
            rules,
            default_feature,
        }
    }

    /// Identify the paragraphs of the document.
    ///
    /// If the document contains a `\begin{document}`/`\end{document}` pair,
    /// only the body between them is segmented; otherwise the whole element
    /// sequence is. Every non-empty paragraph is emitted, even when its
    /// normalized text is blank, so no registered element is ever lost.
    pub fn identify(&self) -> Result<Vec<TexParagraph>> {
        let start = self.document.environment_begin("document");
        let end = self.document.environment_end("document");
        let mut iter =
            ElementIter::bounded(&self.document.elements, start.as_deref(), end.as_deref());

        let mut paragraphs = Vec::new();
        let mut current = TexParagraph::with_feature(self.default_feature);

        while iter.has_next() {
            let element = iter.next()?;
            match element {
                Element::Text(text) => {
                    self.handle_text(text, element, &mut paragraphs, &mut current);
                }
                Element::Group(group) => {
                    current.register_element(element);
                    let mut buf = String::new();
                    self.flatten_text(&group.elements, &mut buf);
                    self.write_normalized(&mut current, &buf);
                }
                Element::OptGroup(opt) => {
                    current.register_element(element);
                    let mut buf = String::new();
                    self.flatten_text(&opt.elements, &mut buf);
                    self.write_normalized(&mut current, &buf);
                }
                Element::Command(cmd) => {
                    self.handle_command(cmd, element, &mut iter, &mut paragraphs, &mut current)?;
                }
            }
        }

        self.open_new(&mut paragraphs, &mut current, self.default_feature);
        log::debug!("identified {} paragraphs", paragraphs.len());
        Ok(paragraphs)
    }

    // -----------------------------------------------------------------------

    /// Close `current` into `out` (if anything was registered into it) and
    /// start a fresh paragraph with the given feature.
    fn open_new(&self, out: &mut Vec<TexParagraph>, current: &mut TexParagraph, feature: &str) {
        let finished = std::mem::replace(current, TexParagraph::with_feature(feature));
        if !finished.is_empty() {
            out.push(finished);
        }
    }

    /// Close `current` and open a paragraph that keeps its feature.
    fn break_same_feature(&self, out: &mut Vec<TexParagraph>, current: &mut TexParagraph) {
        let feature = current
            .feature()
            .unwrap_or(self.default_feature)
            .to_string();
        self.open_new(out, current, &feature);
    }

    fn handle_text(
        &self,
        text: &Text,
        element: &Element,
        out: &mut Vec<TexParagraph>,
        current: &mut TexParagraph,
    ) {
        let split = split_blank_lines(&text.text, text.span.begin);

        if split.runs.is_empty() {
            // Whitespace only. It belongs to the paragraph it was observed
            // in, and a blank line still breaks the paragraph.
            current.register_element(element);
            if split.leading_break || split.trailing_break {
                self.break_same_feature(out, current);
            } else {
                current.register_whitespace();
            }
            return;
        }

        if split.leading_break {
            self.break_same_feature(out, current);
        }

        // A text element falling entirely into one paragraph keeps its
        // identity; runs carved out by blank lines become synthesized text
        // elements with recomputed spans.
        let intact = split.runs.len() == 1 && !split.leading_break && !split.trailing_break;

        for (i, run) in split.runs.iter().enumerate() {
            if i > 0 {
                self.break_same_feature(out, current);
            }
            if intact {
                current.register_element(element);
            } else {
                let sub = Element::Text(Text {
                    text: run.text.clone(),
                    span: Span::new(run.begin, run.end),
                });
                current.register_element(&sub);
            }
            self.write_normalized(current, &run.text);
        }

        if split.trailing_break {
            self.break_same_feature(out, current);
        }
    }

    fn handle_command(
        &self,
        cmd: &Command,
        element: &'a Element,
        iter: &mut ElementIter<'a, Element>,
        out: &mut Vec<TexParagraph>,
        current: &mut TexParagraph,
    ) -> Result<()> {
        match cmd.name.as_str() {
            "begin" => return self.handle_begin(cmd, element, iter, out, current),
            "end" => {
                // Environment closes; whatever follows is ordinary body text
                // until the rules say otherwise.
                self.open_new(out, current, self.default_feature);
                current.register_element(element);
                return Ok(());
            }
            _ => {}
        }

        if let Some(feature) = self.rules.content_feature(&cmd.name) {
            // The last argument is the paragraph text; the command forms a
            // self-contained paragraph.
            let feature = feature.to_string();
            self.open_new(out, current, &feature);
            current.register_element(element);
            if let Some(arg) = cmd.args.last() {
                let mut buf = String::new();
                self.flatten_text(&arg.elements, &mut buf);
                self.write_normalized(current, &buf);
            }
            self.open_new(out, current, self.default_feature);
            return Ok(());
        }

        if let Some(feature) = self.rules.breaking_feature(&cmd.name) {
            let feature = feature.to_string();
            self.open_new(out, current, &feature);
            current.register_element(element);
            return Ok(());
        }

        if self.rules.is_breaking(&cmd.name) {
            self.break_same_feature(out, current);
            current.register_element(element);
            return Ok(());
        }

        if self.rules.is_inline(&cmd.name) {
            current.register_element(element);
            let mut buf = String::new();
            for arg in &cmd.args {
                self.flatten_text(&arg.elements, &mut buf);
            }
            self.write_normalized(current, &buf);
            return Ok(());
        }

        // Unknown command: provenance only, no text.
        current.register_element(element);
        Ok(())
    }

    fn handle_begin(
        &self,
        cmd: &Command,
        element: &'a Element,
        iter: &mut ElementIter<'a, Element>,
        out: &mut Vec<TexParagraph>,
        current: &mut TexParagraph,
    ) -> Result<()> {
        let Some(env) = cmd.env_name() else {
            current.register_element(element);
            return Ok(());
        };
        let env = env.to_string();

        if self.rules.is_opaque_env(&env) {
            // The body contributes provenance but no text. Consume it whole
            // into the current paragraph.
            current.register_element(element);
            self.consume_environment(iter, &env, current)?;
            current.register_whitespace();
            return Ok(());
        }

        let feature = self
            .rules
            .env_feature(&env)
            .unwrap_or(self.default_feature)
            .to_string();
        self.open_new(out, current, &feature);
        current.register_element(element);
        Ok(())
    }

    /// Register everything up to and including the matching `\end` of the
    /// given environment. Nesting of the same environment is honored.
    fn consume_environment(
        &self,
        iter: &mut ElementIter<'a, Element>,
        env: &str,
        current: &mut TexParagraph,
    ) -> Result<()> {
        let mut depth = 1u32;
        while iter.has_next() {
            let element = iter.next()?;
            current.register_element(element);
            if let Some(cmd) = element.as_command() {
                if cmd.env_name() == Some(env) {
                    match cmd.name.as_str() {
                        "begin" => depth += 1,
                        "end" => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(());
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        Err(Error::Structure(format!(
            "environment '{}' is never closed",
            env
        )))
    }

    // -----------------------------------------------------------------------

    /// Write a raw text fragment into the paragraph, collapsing internal
    /// whitespace to single spaces and turning leading or trailing whitespace
    /// into a pending space.
    fn write_normalized(&self, paragraph: &mut TexParagraph, text: &str) {
        if text.is_empty() {
            return;
        }
        if text.chars().next().is_some_and(char::is_whitespace) {
            paragraph.register_whitespace();
        }
        let mut words = text.split_whitespace();
        if let Some(first) = words.next() {
            paragraph.write_str(first);
            for word in words {
                paragraph.register_whitespace();
                paragraph.write_str(word);
            }
        }
        if text.chars().last().is_some_and(char::is_whitespace) {
            paragraph.register_whitespace();
        }
    }

    /// Collect the raw text of an element sequence, descending into groups
    /// and into the arguments of inline commands. Other commands contribute
    /// nothing.
    fn flatten_text(&self, elements: &[Element], buf: &mut String) {
        for element in elements {
            match element {
                Element::Text(text) => buf.push_str(&text.text),
                Element::Group(group) => self.flatten_text(&group.elements, buf),
                Element::OptGroup(opt) => self.flatten_text(&opt.elements, buf),
                Element::Command(cmd) => {
                    if self.rules.is_inline(&cmd.name) {
                        for arg in &cmd.args {
                            self.flatten_text(&arg.elements, buf);
                        }
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------

struct TextRun {
    text: String,
    begin: u32,
    end: u32,
}

struct SplitText {
    leading_break: bool,
    runs: Vec<TextRun>,
    trailing_break: bool,
}

/// Split a text fragment at blank lines (two or more consecutive newlines in
/// a whitespace run). Whitespace around a single newline stays attached to
/// its run; each run's span covers its first through last content line.
fn split_blank_lines(text: &str, first_line: u32) -> SplitText {
    let mut runs: Vec<TextRun> = Vec::new();
    let mut current: Option<TextRun> = None;
    let mut pending = String::new();
    let mut pending_newlines = 0usize;
    let mut leading_break = false;
    let mut line = first_line;

    for c in text.chars() {
        if c.is_whitespace() {
            pending.push(c);
            if c == '\n' {
                pending_newlines += 1;
            }
        } else {
            if pending_newlines >= 2 {
                match current.take() {
                    Some(run) => runs.push(run),
                    None => leading_break = true,
                }
                pending.clear();
            }
            let run = current.get_or_insert_with(|| TextRun {
                text: String::new(),
                begin: line,
                end: line,
            });
            run.text.push_str(&pending);
            run.text.push(c);
            run.end = line;
            pending.clear();
            pending_newlines = 0;
        }
        if c == '\n' {
            line += 1;
        }
    }

    let mut trailing_break = false;
    if pending_newlines >= 2 {
        trailing_break = true;
        if let Some(run) = current.take() {
            runs.push(run);
        }
    } else if let Some(mut run) = current.take() {
        run.text.push_str(&pending);
        runs.push(run);
    }

    SplitText {
        leading_break,
        runs,
        trailing_break,
    }
}
