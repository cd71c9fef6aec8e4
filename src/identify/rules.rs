//! Markup-specific rules driving paragraph segmentation.
//!
//! The rules decide which commands break paragraphs, which carry their text
//! in an argument, which environments change the feature label and which
//! environment bodies are not prose at all.

use std::collections::{HashMap, HashSet};

/// The segmentation ruleset for a LaTeX dialect.
#[derive(Debug, Clone)]
pub struct Rules {
    /// Commands that close the current paragraph and keep its feature.
    breaking: HashSet<String>,

    /// Commands that close the current paragraph and open one with a new
    /// feature into which the following content flows (e.g. `\item`).
    breaking_features: HashMap<String, String>,

    /// Commands whose last argument group *is* the paragraph text; they
    /// produce a self-contained paragraph (e.g. `\section`, `\caption`).
    content: HashMap<String, String>,

    /// Commands whose argument text flows inline into the current paragraph
    /// (e.g. `\textbf`).
    inline: HashSet<String>,

    /// Environments that open a paragraph with a specific feature.
    env_features: HashMap<String, String>,

    /// Environments whose body contributes line provenance but no text
    /// (formulas, verbatim listings).
    opaque_envs: HashSet<String>,
}

impl Rules {
    /// Create an empty ruleset.
    pub fn empty() -> Self {
        Self {
            breaking: HashSet::new(),
            breaking_features: HashMap::new(),
            content: HashMap::new(),
            inline: HashSet::new(),
            env_features: HashMap::new(),
            opaque_envs: HashSet::new(),
        }
    }

    /// Register a command that breaks the paragraph without changing the
    /// feature.
    pub fn add_breaking(&mut self, name: impl Into<String>) -> &mut Self {
        self.breaking.insert(name.into());
        self
    }

    /// Register a command that breaks the paragraph and sets a feature for
    /// the following content.
    pub fn add_breaking_feature(
        &mut self,
        name: impl Into<String>,
        feature: impl Into<String>,
    ) -> &mut Self {
        self.breaking_features.insert(name.into(), feature.into());
        self
    }

    /// Register a content command: its last argument becomes a
    /// self-contained paragraph with the given feature.
    pub fn add_content(
        &mut self,
        name: impl Into<String>,
        feature: impl Into<String>,
    ) -> &mut Self {
        self.content.insert(name.into(), feature.into());
        self
    }

    /// Register a command whose argument text flows inline.
    pub fn add_inline(&mut self, name: impl Into<String>) -> &mut Self {
        self.inline.insert(name.into());
        self
    }

    /// Register an environment that opens a paragraph with a feature.
    pub fn add_env_feature(
        &mut self,
        env: impl Into<String>,
        feature: impl Into<String>,
    ) -> &mut Self {
        self.env_features.insert(env.into(), feature.into());
        self
    }

    /// Register an environment whose body carries no prose.
    pub fn add_opaque_env(&mut self, env: impl Into<String>) -> &mut Self {
        self.opaque_envs.insert(env.into());
        self
    }

    // -----------------------------------------------------------------------

    /// Check whether the command breaks the paragraph without a feature
    /// change. Starred variants are treated like their base form.
    pub fn is_breaking(&self, name: &str) -> bool {
        self.breaking.contains(Self::base(name))
    }

    /// Get the feature opened by a breaking command, if any.
    pub fn breaking_feature(&self, name: &str) -> Option<&str> {
        self.breaking_features
            .get(Self::base(name))
            .map(String::as_str)
    }

    /// Get the feature of a content command, if any.
    pub fn content_feature(&self, name: &str) -> Option<&str> {
        self.content.get(Self::base(name)).map(String::as_str)
    }

    /// Check whether the command's argument text flows inline.
    pub fn is_inline(&self, name: &str) -> bool {
        self.inline.contains(Self::base(name))
    }

    /// Get the feature opened by an environment, if any.
    pub fn env_feature(&self, env: &str) -> Option<&str> {
        self.env_features.get(env).map(String::as_str)
    }

    /// Check whether the environment's body carries no prose. Environment
    /// names are matched exactly (`align` and `align*` are distinct).
    pub fn is_opaque_env(&self, env: &str) -> bool {
        self.opaque_envs.contains(env)
    }

    fn base(name: &str) -> &str {
        name.trim_end_matches('*')
    }
}

impl Default for Rules {
    /// The standard LaTeX ruleset.
    fn default() -> Self {
        let mut rules = Self::empty();

        // "\\" is the parsed name of the forced line break control symbol.
        for name in [
            "\\", "par", "newpage", "clearpage", "pagebreak", "maketitle", "bigskip", "medskip",
            "smallskip", "vfill", "tableofcontents",
        ] {
            rules.add_breaking(name);
        }

        rules.add_breaking_feature("item", "item");

        for name in [
            "part",
            "chapter",
            "section",
            "subsection",
            "subsubsection",
            "paragraph",
            "subparagraph",
        ] {
            rules.add_content(name, "heading");
        }
        rules.add_content("title", "title");
        rules.add_content("author", "author");
        rules.add_content("date", "date");
        rules.add_content("caption", "caption");

        for name in [
            "textbf", "textit", "textsc", "textsl", "textrm", "textsf", "texttt", "textup",
            "emph", "underline", "mbox", "text",
        ] {
            rules.add_inline(name);
        }

        rules.add_env_feature("abstract", "abstract");
        rules.add_env_feature("quote", "quote");
        rules.add_env_feature("quotation", "quote");
        rules.add_env_feature("itemize", "item");
        rules.add_env_feature("enumerate", "item");
        rules.add_env_feature("description", "item");

        for env in [
            "equation",
            "equation*",
            "align",
            "align*",
            "alignat",
            "alignat*",
            "eqnarray",
            "eqnarray*",
            "gather",
            "gather*",
            "multline",
            "multline*",
            "displaymath",
            "math",
            "verbatim",
            "lstlisting",
            "tikzpicture",
        ] {
            rules.add_opaque_env(env);
        }

        rules
    }
}
