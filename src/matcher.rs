use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{SchemaError, ValidationFailure};
use crate::options::MatcherOptions;
use crate::response::ResponseBody;
use crate::retriever::{redirect_file_pointers, SchemaDirectoryRetriever};
use crate::strict::Strictness;

/// Checks response bodies against the JSON Schema stored at one path.
///
/// `matches` follows the matcher protocol of test frameworks: call it, then
/// read `failure_message` (or `failure_message_when_negated` for a negated
/// expectation) to explain the result. `evaluate` is the stateless form.
#[derive(Debug, Clone)]
pub struct SchemaMatcher {
    schema_path: PathBuf,
    schema_root: Option<PathBuf>,
    options: MatcherOptions,
    last: Option<Evaluation>,
}

impl SchemaMatcher {
    pub fn new(schema_path: impl Into<PathBuf>) -> Self {
        Self::with_options(schema_path, MatcherOptions::default())
    }

    pub fn with_options(schema_path: impl Into<PathBuf>, options: MatcherOptions) -> Self {
        Self {
            schema_path: schema_path.into(),
            schema_root: None,
            options,
            last: None,
        }
    }

    /// Directory searched for external `$ref` targets.
    ///
    /// Defaults to the directory containing the schema.
    pub fn schema_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.schema_root = Some(root.into());
        self
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Returns whether `response` conforms to the schema.
    ///
    /// A malformed schema is an `Err`; a non-conforming or unparsable body
    /// is `Ok(false)`. An `Err` clears the recorded evaluation.
    pub fn matches<R: ResponseBody + ?Sized>(&mut self, response: &R) -> Result<bool, SchemaError> {
        self.last = None;
        let evaluation = self.evaluate(response)?;
        let matched = evaluation.is_match();
        self.last = Some(evaluation);
        Ok(matched)
    }

    /// Message for a failed positive expectation. Empty before any call.
    pub fn failure_message(&self) -> String {
        self.last
            .as_ref()
            .map(Evaluation::failure_message)
            .unwrap_or_default()
    }

    /// Message for a failed negated expectation. Empty before any call.
    pub fn failure_message_when_negated(&self) -> String {
        self.last
            .as_ref()
            .map(Evaluation::failure_message_when_negated)
            .unwrap_or_default()
    }

    /// The evaluation recorded by the last `matches` call.
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last.as_ref()
    }

    /// Validate `response` without recording the result.
    pub fn evaluate<R: ResponseBody + ?Sized>(&self, response: &R) -> Result<Evaluation, SchemaError> {
        let strictness = Strictness::from_option(self.options.strict);
        let schema = self.load_schema(strictness)?;
        let schema_echo = schema.to_string();

        let root = self.retriever_root();
        let mut options = jsonschema::options()
            .with_retriever(SchemaDirectoryRetriever::new(root, strictness));
        if let Some(draft) = self.options.draft {
            options = options.with_draft(draft);
        }
        let validator = options.build(&schema).map_err(|e| SchemaError::Invalid {
            path: self.schema_path.clone(),
            message: e.to_string(),
        })?;

        let raw = response.body_bytes();
        let body: Value = match serde_json::from_slice(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(schema = %self.schema_path.display(), error = %e, "response body is not JSON");
                return Ok(Evaluation {
                    schema_path: self.schema_path.clone(),
                    body: String::from_utf8_lossy(&raw).into_owned(),
                    schema: schema_echo,
                    outcome: Outcome::Failed(ValidationFailure::InvalidBody {
                        error: e.to_string(),
                    }),
                });
            }
        };

        let errors: Vec<String> = validator.iter_errors(&body).map(|e| e.to_string()).collect();
        let outcome = if errors.is_empty() {
            Outcome::Matched
        } else {
            tracing::debug!(
                schema = %self.schema_path.display(),
                violations = errors.len(),
                "response body does not match schema"
            );
            Outcome::Failed(ValidationFailure::Violations { errors })
        };

        Ok(Evaluation {
            schema_path: self.schema_path.clone(),
            body: body.to_string(),
            schema: schema_echo,
            outcome,
        })
    }

    fn load_schema(&self, strictness: Strictness) -> Result<Value, SchemaError> {
        let text = std::fs::read_to_string(&self.schema_path).map_err(|source| SchemaError::Read {
            path: self.schema_path.clone(),
            source,
        })?;
        let mut schema: Value = serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
            path: self.schema_path.clone(),
            source,
        })?;
        strictness.apply(&mut schema);
        redirect_file_pointers(&mut schema);
        tracing::debug!(schema = %self.schema_path.display(), ?strictness, "loaded schema");
        Ok(schema)
    }

    fn retriever_root(&self) -> PathBuf {
        match &self.schema_root {
            Some(root) => root.clone(),
            None => self
                .schema_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

/// Result of checking one response against one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Failed(ValidationFailure),
}

/// One completed check, with the body and schema echoed for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    schema_path: PathBuf,
    body: String,
    schema: String,
    outcome: Outcome,
}

impl Evaluation {
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, Outcome::Matched)
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match &self.outcome {
            Outcome::Matched => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }

    /// Compact JSON of the body, or the raw text when it did not parse.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Compact JSON of the schema after options were applied.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn failure_message(&self) -> String {
        let mut message = format!(
            "expected response body to match JSON schema {}\n{}",
            self.schema_path.display(),
            self.echo()
        );
        if let Some(failure) = self.failure() {
            message.push_str("\n--- errors\n");
            message.push_str(&failure.to_string());
        }
        message
    }

    pub fn failure_message_when_negated(&self) -> String {
        format!(
            "expected response body not to match JSON schema {}\n{}",
            self.schema_path.display(),
            self.echo()
        )
    }

    /// `Ok(())` when matched, otherwise the failure message.
    pub fn into_result(self) -> Result<(), String> {
        if self.is_match() {
            Ok(())
        } else {
            Err(self.failure_message())
        }
    }

    fn echo(&self) -> String {
        format!("--- body\n{}\n--- schema\n{}", self.body, self.schema)
    }
}
