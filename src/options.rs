use jsonschema::Draft;

/// Per-match validation options.
#[derive(Debug, Clone, Default)]
pub struct MatcherOptions {
    /// `None` uses the schema as written; `Some(true)` rejects undeclared
    /// properties; `Some(false)` permits them even under
    /// `additionalProperties: false` or `unevaluatedProperties: false`.
    pub strict: Option<bool>,
    /// Forces a JSON Schema draft instead of detecting it from `$schema`.
    pub draft: Option<Draft>,
}

impl MatcherOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }
}
