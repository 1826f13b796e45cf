use std::path::PathBuf;

/// The schema document itself could not be used.
///
/// Always fatal: a broken schema is never reported as a non-matching
/// response.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema {} is not a valid JSON Schema: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

impl SchemaError {
    /// Path of the schema document that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => path,
        }
    }
}

/// Why a response did not match its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The body could not be parsed as JSON.
    InvalidBody { error: String },
    /// The body parsed but violates the schema.
    Violations { errors: Vec<String> },
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBody { error } => write!(f, "body is not valid JSON: {error}"),
            Self::Violations { errors } => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "- {error}")?;
                }
                Ok(())
            }
        }
    }
}
