//! Assertions for `#[test]` functions.
//!
//! Schemas are looked up by name under the configured schema root (see
//! [`Configuration::from_env`]). A failed assertion panics with the
//! matcher's failure message, so the body and schema show up in the test
//! output.

use crate::config::Configuration;
use crate::matcher::SchemaMatcher;
use crate::options::MatcherOptions;
use crate::response::ResponseBody;

/// Matcher for the schema called `name` under the configured schema root.
///
/// Panics if the environment configuration is invalid.
#[track_caller]
pub fn match_response_schema(name: &str) -> SchemaMatcher {
    match_response_schema_with(name, MatcherOptions::default())
}

/// Like [`match_response_schema`], with explicit options.
///
/// `options.strict` falls back to the configured default when unset.
#[track_caller]
pub fn match_response_schema_with(name: &str, mut options: MatcherOptions) -> SchemaMatcher {
    let config = match Configuration::from_env() {
        Ok(c) => c,
        Err(e) => panic!("json-matchers: configuration error: {e}"),
    };
    if options.strict.is_none() {
        options.strict = config.strict;
    }
    SchemaMatcher::with_options(config.schema_path(name), options).schema_root(config.schema_root)
}

/// Assert that `response` matches the schema called `name`.
#[track_caller]
pub fn assert_response_schema<R: ResponseBody + ?Sized>(name: &str, response: &R) {
    assert_response_schema_with(name, response, MatcherOptions::default());
}

#[track_caller]
pub fn assert_response_schema_with<R: ResponseBody + ?Sized>(
    name: &str,
    response: &R,
    options: MatcherOptions,
) {
    let mut matcher = match_response_schema_with(name, options);
    match matcher.matches(response) {
        Ok(true) => {}
        Ok(false) => panic!("{}", matcher.failure_message()),
        Err(e) => panic!("{e}"),
    }
}

/// Assert that `response` does not match the schema called `name`.
#[track_caller]
pub fn refute_response_schema<R: ResponseBody + ?Sized>(name: &str, response: &R) {
    refute_response_schema_with(name, response, MatcherOptions::default());
}

#[track_caller]
pub fn refute_response_schema_with<R: ResponseBody + ?Sized>(
    name: &str,
    response: &R,
    options: MatcherOptions,
) {
    let mut matcher = match_response_schema_with(name, options);
    match matcher.matches(response) {
        Ok(false) => {}
        Ok(true) => panic!("{}", matcher.failure_message_when_negated()),
        Err(e) => panic!("{e}"),
    }
}
