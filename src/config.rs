use std::path::{Path, PathBuf};

/// Directory searched for named schemas when none is configured.
const DEFAULT_SCHEMA_ROOT: &str = "tests/support/api/schemas";

/// Matcher configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub schema_root: PathBuf,
    /// Default for [`MatcherOptions::strict`](crate::MatcherOptions::strict).
    pub strict: Option<bool>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            schema_root: PathBuf::from(DEFAULT_SCHEMA_ROOT),
            strict: None,
        }
    }
}

impl Configuration {
    pub fn new(schema_root: impl Into<PathBuf>) -> Self {
        Self {
            schema_root: schema_root.into(),
            strict: None,
        }
    }

    /// Load configuration from environment.
    ///
    /// - `JSON_MATCHERS_SCHEMA_ROOT` (optional, default `tests/support/api/schemas`)
    /// - `JSON_MATCHERS_STRICT` (optional): `true` or `false`
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let schema_root = lookup("JSON_MATCHERS_SCHEMA_ROOT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_ROOT));

        let strict = match lookup("JSON_MATCHERS_STRICT") {
            Some(val) => Some(
                val.trim()
                    .parse::<bool>()
                    .map_err(|_| "JSON_MATCHERS_STRICT must be `true` or `false`".to_string())?,
            ),
            None => None,
        };

        Ok(Self {
            schema_root,
            strict,
        })
    }

    /// Path of the schema called `name` under the schema root.
    pub fn schema_path(&self, name: &str) -> PathBuf {
        if Path::new(name).extension().is_some_and(|ext| ext == "json") {
            self.schema_root.join(name)
        } else {
            self.schema_root.join(format!("{name}.json"))
        }
    }
}
