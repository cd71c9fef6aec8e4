//! Identification options and configuration.

/// Options for identifying paragraphs in TeX documents.
#[derive(Debug, Clone)]
pub struct IdentifyOptions {
    /// Whether to resolve user-defined macros before parsing
    pub resolve_macros: bool,

    /// Feature label assigned to ordinary body text
    pub default_feature: String,

    /// Whether the batch API processes files in parallel
    pub parallel: bool,
}

impl IdentifyOptions {
    /// Create new identify options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the macro resolution pass.
    pub fn keep_macros(mut self) -> Self {
        self.resolve_macros = false;
        self
    }

    /// Enable or disable the macro resolution pass.
    pub fn with_resolve_macros(mut self, resolve: bool) -> Self {
        self.resolve_macros = resolve;
        self
    }

    /// Set the feature label used for ordinary body text.
    pub fn with_default_feature(mut self, feature: impl Into<String>) -> Self {
        self.default_feature = feature.into();
        self
    }

    /// Disable parallel processing in the batch API.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable parallel processing in the batch API.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for IdentifyOptions {
    fn default() -> Self {
        Self {
            resolve_macros: true,
            default_feature: "text".to_string(),
            parallel: true,
        }
    }
}
