//! The TeX element tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source line span of an element (1-based, inclusive, `begin <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First source line of the element
    pub begin: u32,

    /// Last source line of the element
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(begin: u32, end: u32) -> Self {
        debug_assert!(begin <= end, "span begin must not exceed end");
        Self { begin, end }
    }

    /// Create a span covering a single line.
    pub fn line(line: u32) -> Self {
        Self { begin: line, end: line }
    }
}

/// A node in the parsed TeX tree.
///
/// This is a closed sum type: the recursive line registration and the
/// segmentation logic match exhaustively on it, so a new variant cannot be
/// added without updating every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// A literal run of text
    Text(Text),

    /// A braced scope `{...}`
    Group(Group),

    /// An optional-argument scope `[...]`
    OptGroup(OptGroup),

    /// A command invocation `\name[...]{...}`
    Command(Command),
}

impl Element {
    /// Get the source line span of this element.
    pub fn span(&self) -> Span {
        match self {
            Element::Text(text) => text.span,
            Element::Group(group) => group.span,
            Element::OptGroup(opt) => opt.span,
            Element::Command(cmd) => cmd.span,
        }
    }

    /// Get the command payload, if this element is a command.
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Element::Command(cmd) => Some(cmd),
            _ => None,
        }
    }
}

/// A literal run of text. Blank lines are preserved so the segmenter can
/// split on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    /// The text content
    pub text: String,

    /// Source line span
    pub span: Span,
}

/// A braced scope containing an ordered sequence of child elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Child elements in source order
    pub elements: Vec<Element>,

    /// Source line span
    pub span: Span,
}

/// An optional-argument scope. Structurally identical to [`Group`] but
/// semantically distinct: commands evaluate options before arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptGroup {
    /// Child elements in source order
    pub elements: Vec<Element>,

    /// Source line span
    pub span: Span,
}

/// A named command carrying zero or more options and argument groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// The command name without the leading backslash
    pub name: String,

    /// Optional arguments, in source order
    pub options: Vec<OptGroup>,

    /// Argument groups, in source order
    pub args: Vec<Group>,

    /// Source line span
    pub span: Span,
}

impl Command {
    /// For `\begin`/`\end` commands, the environment name from the first
    /// argument group, if it is a single text run.
    pub fn env_name(&self) -> Option<&str> {
        let group = self.args.first()?;
        if group.elements.len() != 1 {
            return None;
        }
        match group.elements.first()? {
            Element::Text(text) => Some(text.text.trim()),
            _ => None,
        }
    }
}

// The textual form is what the bounded iterator's sentinels compare against,
// so `Display` must reproduce the source syntax of the element.

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text(text) => text.fmt(f),
            Element::Group(group) => group.fmt(f),
            Element::OptGroup(opt) => opt.fmt(f),
            Element::Command(cmd) => cmd.fmt(f),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for OptGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.name)?;
        for option in &self.options {
            write!(f, "{}", option)?;
        }
        for arg in &self.args {
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}
