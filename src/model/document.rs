//! The parsed TeX document.

use super::Element;
use serde::{Deserialize, Serialize};

/// A parsed TeX document: the ordered top-level element sequence handed to
/// the segmentation algorithm. The document owns its elements exclusively;
/// paragraph identification only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TexDocument {
    /// Top-level elements in source order
    pub elements: Vec<Element>,

    /// Number of source lines the document was parsed from
    pub line_count: u32,
}

impl TexDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the document has any elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of top-level elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Find the top-level `\begin{...}` command for the given environment
    /// and return its textual form, usable as an iterator sentinel.
    pub fn environment_begin(&self, env: &str) -> Option<String> {
        self.find_env_command("begin", env)
    }

    /// Find the top-level `\end{...}` command for the given environment and
    /// return its textual form, usable as an iterator sentinel.
    pub fn environment_end(&self, env: &str) -> Option<String> {
        self.find_env_command("end", env)
    }

    fn find_env_command(&self, command: &str, env: &str) -> Option<String> {
        self.elements.iter().find_map(|element| {
            let cmd = element.as_command()?;
            if cmd.name == command && cmd.env_name() == Some(env) {
                Some(element.to_string())
            } else {
                None
            }
        })
    }
}
