//! `curies` command-line converter.
//!
//! ```text
//! curies <expand|compress|standardize-curie|standardize-uri|standardize-prefix> [INPUT...]
//! ```
//!
//! Reads one identifier per line from stdin when no inputs are given.
//!
//! Environment:
//! - `CURIES_SOURCE`: comma-separated predefined registry names or registry
//!   files, chained left to right (default `bioregistry`)
//! - `CURIES_FORMAT`: registry file format, inferred from the extension when unset
//! - `CURIES_VALIDATE`: `1` checks local identifiers against record patterns

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use curies_registry::{
    Converter, ConverterConfig, CurieError, CurieResult, PredefinedRegistry, RegistryFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SOURCE: &str = "bioregistry";
const USAGE: &str =
    "usage: curies <expand|compress|standardize-curie|standardize-uri|standardize-prefix> [INPUT...]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Expand,
    Compress,
    StandardizeCurie,
    StandardizeUri,
    StandardizePrefix,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expand" => Ok(Self::Expand),
            "compress" => Ok(Self::Compress),
            "standardize-curie" => Ok(Self::StandardizeCurie),
            "standardize-uri" => Ok(Self::StandardizeUri),
            "standardize-prefix" => Ok(Self::StandardizePrefix),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

impl Command {
    fn apply(self, converter: &Converter, input: &str) -> CurieResult<String> {
        match self {
            Self::Expand => converter.expand(input),
            Self::Compress => converter.compress(input),
            Self::StandardizeCurie => converter.standardize_curie(input),
            Self::StandardizeUri => converter.standardize_uri(input),
            Self::StandardizePrefix => converter.standardize_prefix(input),
        }
    }
}

/// Loads and chains every source named in `sources`.
fn load_converter(
    sources: &str,
    format: Option<RegistryFormat>,
    config: ConverterConfig,
) -> CurieResult<Converter> {
    let mut converter = Converter::with_config(config.clone());
    for source in sources.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let next = match source.parse::<PredefinedRegistry>() {
            Ok(registry) => registry.converter()?,
            Err(_) => Arc::new(Converter::from_path(source, format, config.clone())?),
        };
        tracing::info!("Loaded {} records from {}", next.len(), source);
        converter = converter.chain(&next)?;
    }
    Ok(converter)
}

fn read_stdin() -> io::Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            inputs.push(trimmed.to_string());
        }
    }
    Ok(inputs)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize tracing on stderr so stdout carries only results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let command = match args.next().map(|arg| arg.parse::<Command>()) {
        Some(Ok(command)) => command,
        Some(Err(message)) => {
            eprintln!("{message}\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
        None => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };
    let mut inputs: Vec<String> = args.collect();
    if inputs.is_empty() {
        inputs = read_stdin()?;
    }

    // Get registry configuration from env or use defaults
    let sources = std::env::var("CURIES_SOURCE").unwrap_or_else(|_| DEFAULT_SOURCE.to_string());
    let format = std::env::var("CURIES_FORMAT")
        .ok()
        .map(|f| f.parse::<RegistryFormat>())
        .transpose()?;
    let config = match std::env::var("CURIES_VALIDATE").as_deref() {
        Ok("1") | Ok("true") => ConverterConfig::validating(),
        _ => ConverterConfig::default(),
    };

    let converter = load_converter(&sources, format, config)?;
    tracing::info!("{}", converter);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    for input in &inputs {
        match command.apply(&converter, input) {
            Ok(result) => writeln!(out, "{result}")?,
            Err(e) => {
                failures += 1;
                eprintln!("{input}: {}", describe(&e));
            }
        }
    }
    out.flush()?;

    if failures > 0 {
        tracing::warn!("{} of {} inputs failed", failures, inputs.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(error: &CurieError) -> String {
    match error.root() {
        CurieError::PrefixNotFound { prefix } => format!("unknown prefix '{prefix}'"),
        CurieError::UriNotFound { .. } => "no registered URI prefix matches".to_string(),
        other => other.to_string(),
    }
}
