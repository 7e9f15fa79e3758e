// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for configuration failures.
//!
//! figment reports errors by dotted path; these are turned into miette
//! diagnostics that point into the TOML file and suggest the closest valid
//! key for typos.

#![allow(unused_assignments)] // emitted by the miette derive

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::LEGACY_ENV;

/// Keys scoring below this Jaro-Winkler similarity get no suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(decodebot::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a decodebot setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(decodebot::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(decodebot::config::missing_key), help("{}", missing_key_help(key)))]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(decodebot::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(decodebot::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Lists every place a missing key can be supplied, including the
/// historical env var when the key has one.
fn missing_key_help(key: &str) -> String {
    let prefixed = format!("DECODEBOT_{}", key.replace('.', "_").to_ascii_uppercase());
    match LEGACY_ENV.iter().find(|(_, path)| *path == key) {
        Some((legacy, _)) => {
            format!("set `{key}` in decodebot.toml, or export {legacy} or {prefixed}")
        }
        None => format!("set `{key}` in decodebot.toml, or export {prefixed}"),
    }
}

/// Converts every error carried by a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` pairs used to attach source spans
/// to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    let dotted = error.path.join(".");
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, field, toml_sources)
                .map_or((None, None), |(span, src)| (Some(span), Some(src)));
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, *expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: if dotted.is_empty() {
                field.to_string()
            } else {
                format!("{dotted}.{field}")
            },
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: dotted,
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Finds the offending key in the file figment read it from.
fn locate(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(path) => path.display().to_string(),
        figment::Source::Custom(name) => name.clone(),
        _ => return None,
    };
    let (path, content) = toml_sources.iter().find(|(p, _)| *p == origin)?;
    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `field` inside the table named by `path`.
///
/// Only lines between the matching `[section]` header and the next header
/// are searched. An empty `path` searches the top level.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = path.first().map(String::as_str);
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
        } else if current == wanted
            && let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }

    None
}

/// The valid key most similar to `unknown`, if any is close enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key.as_ref()), key.as_ref()))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_bot_secert_for_bot_secret() {
        let valid = ["url", "bot_secret", "max_retries"];
        assert_eq!(
            suggest_key("bot_secert", &valid),
            Some("bot_secret".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("zzzzzz", &["enabled", "host", "port"]), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[bot]\nlog_level = \"info\"\n\n[backend]\nulr = \"x\"\n";
        let path = vec!["backend".to_string()];
        let o = find_key_offset(content, &path, "ulr").unwrap();
        assert_eq!(&content[o..o + 3], "ulr");
    }

    #[test]
    fn find_key_offset_ignores_other_sections() {
        let content = "[webhook]\nprot = 1\n\n[scheduler]\nprot = 2\n";
        let path = vec!["scheduler".to_string()];
        let o = find_key_offset(content, &path, "prot").unwrap();
        assert_eq!(&content[o..o + 8], "prot = 2");
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[bot]\nulr = 1\n";
        let path = vec!["backend".to_string()];
        assert_eq!(find_key_offset(content, &path, "ulr"), None);
    }

    #[test]
    fn missing_key_help_names_env_vars() {
        let help = missing_key_help("telegram.bot_token");
        assert!(help.contains("BOT_TOKEN"));
        assert!(help.contains("DECODEBOT_TELEGRAM_BOT_TOKEN"));

        let help = missing_key_help("scheduler.batch_size");
        assert!(help.ends_with("export DECODEBOT_SCHEDULER_BATCH_SIZE"));
    }
}
