//! Test assertions that validate HTTP response bodies against JSON Schema
//! documents stored on disk.
//!
//! A [`SchemaMatcher`] loads one schema file, parses a response body and
//! reports either a match, a non-match with a descriptive message, or a
//! [`SchemaError`] when the schema itself is unusable. Schema semantics and
//! `$ref` resolution are provided by the `jsonschema` crate.
//!
//! ```no_run
//! use json_matchers::SchemaMatcher;
//!
//! let mut matcher = SchemaMatcher::new("tests/support/api/schemas/user.json");
//! if !matcher.matches(r#"{"id": 1}"#).expect("schema is valid") {
//!     panic!("{}", matcher.failure_message());
//! }
//! ```

pub mod assertions;
pub mod config;
pub mod error;
pub mod matcher;
pub mod options;
pub mod response;
pub mod retriever;
pub mod strict;

pub use assertions::{
    assert_response_schema, assert_response_schema_with, match_response_schema,
    match_response_schema_with, refute_response_schema, refute_response_schema_with,
};
pub use config::Configuration;
pub use error::{SchemaError, ValidationFailure};
pub use jsonschema::Draft;
pub use matcher::{Evaluation, Outcome, SchemaMatcher};
pub use options::MatcherOptions;
pub use response::ResponseBody;
