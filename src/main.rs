use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use json_matchers::{Configuration, Evaluation, MatcherOptions, SchemaMatcher, ValidationFailure};

/// Check a JSON document against a JSON Schema.
///
/// Exit status: 0 on match, 1 on mismatch, 2 when the schema, the
/// configuration or the input cannot be used.
#[derive(Parser)]
#[command(name = "json-matchers", version)]
#[command(
    after_help = "Environment:\n  JSON_MATCHERS_SCHEMA_ROOT   Directory of named schemas\n  JSON_MATCHERS_STRICT        Default for --strict (true/false)"
)]
struct Cli {
    /// Schema file path, or schema name under the schema root.
    schema: String,
    /// Body file to check. Reads stdin when omitted.
    body: Option<PathBuf>,
    /// Reject properties the schema does not declare.
    #[arg(long, conflicts_with = "no_strict")]
    strict: bool,
    /// Permit undeclared properties even under `additionalProperties: false`.
    #[arg(long)]
    no_strict: bool,
    /// Expect the body NOT to match.
    #[arg(long)]
    negate: bool,
    /// Print a JSON report on stdout.
    #[arg(long)]
    json: bool,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match Configuration::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("json-matchers: configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    let body = match read_body(cli.body.as_ref()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("json-matchers: cannot read body: {e}");
            return ExitCode::from(2);
        }
    };

    let mut options = MatcherOptions::new();
    options.strict = if cli.strict {
        Some(true)
    } else if cli.no_strict {
        Some(false)
    } else {
        config.strict
    };

    let schema_path = {
        let direct = PathBuf::from(&cli.schema);
        if direct.is_file() {
            direct
        } else {
            config.schema_path(&cli.schema)
        }
    };

    let mut matcher =
        SchemaMatcher::with_options(schema_path, options).schema_root(config.schema_root);
    let result = matcher.matches(body.as_slice());
    if let (true, Some(evaluation)) = (cli.json, matcher.last_evaluation()) {
        match serde_json::to_string(&Report::from(evaluation)) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "cannot serialize report"),
        }
    }

    match result {
        Ok(matched) if matched != cli.negate => ExitCode::SUCCESS,
        Ok(_) => {
            if cli.negate {
                eprintln!("{}", matcher.failure_message_when_negated());
            } else {
                eprintln!("{}", matcher.failure_message());
            }
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("json-matchers: {e}");
            ExitCode::from(2)
        }
    }
}

fn read_body(path: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(p) => std::fs::read(p),
        None => {
            let mut body = Vec::new();
            std::io::stdin().read_to_end(&mut body)?;
            Ok(body)
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_error: Option<&'a str>,
    errors: &'a [String],
}

impl<'a> From<&'a Evaluation> for Report<'a> {
    fn from(evaluation: &'a Evaluation) -> Self {
        let (body_error, errors) = match evaluation.failure() {
            None => (None, &[][..]),
            Some(ValidationFailure::InvalidBody { error }) => (Some(error.as_str()), &[][..]),
            Some(ValidationFailure::Violations { errors }) => (None, errors.as_slice()),
        };
        Self {
            matched: evaluation.is_match(),
            body_error,
            errors,
        }
    }
}
