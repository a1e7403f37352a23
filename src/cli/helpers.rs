//! Shared helper functions for CLI commands
//!
//! Config, catalog and template loading used by more than one command, plus
//! the structured-output path shared by every `--format yaml|json` view.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::codegen::TemplateEngine;
use crate::core::{Config, ParamValue, SpaceCatalog};

/// Load configuration, honoring `--config`
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    match &global.config {
        Some(path) => Ok(Config::load_explicit(path)?),
        None => Ok(Config::load()),
    }
}

/// The format to render with once `auto` and config defaults are applied
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Text),
        f => f,
    }
}

/// Built-in spaces plus every catalog file named in the config
pub fn load_catalog(config: &Config) -> Result<SpaceCatalog> {
    let mut catalog = SpaceCatalog::builtin()?.clone();
    for path in &config.spaces {
        catalog.merge(SpaceCatalog::load_file(path)?)?;
    }
    Ok(catalog)
}

/// Template engine with the config's override directory layered on top
pub fn load_engine(config: &Config) -> Result<TemplateEngine> {
    let engine = match &config.templates_dir {
        Some(dir) => TemplateEngine::with_dir(dir),
        None => TemplateEngine::new(),
    };
    engine.map_err(|e| miette::miette!("{}", e))
}

/// Parse a `key=value` assignment given on the command line
pub fn parse_assignment(s: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }
    Ok((key.to_string(), ParamValue::parse_literal(value)))
}

/// Collect repeated `-s key=value` flags; later flags win
pub fn assignments_map(pairs: &[(String, ParamValue)]) -> BTreeMap<String, ParamValue> {
    pairs.iter().cloned().collect()
}

/// Print a value as YAML or JSON; returns false for text formats
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        OutputFormat::Auto | OutputFormat::Text => Ok(false),
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
