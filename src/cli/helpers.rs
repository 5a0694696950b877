//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use chrono::NaiveDate;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::OutputFormat;
use crate::core::entity::Tone;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters, not bytes, so accented labels are never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whether stdout is an interactive terminal
pub fn is_interactive() -> bool {
    Term::stdout().is_term()
}

/// Print a value as JSON or YAML; returns false for any other format
pub fn print_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
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
        _ => Ok(false),
    }
}

/// Apply the colour family of a status to its label
pub fn styled_label(label: &str, tone: Tone) -> String {
    match tone {
        Tone::Good => style(label).green().to_string(),
        Tone::Active => style(label).cyan().to_string(),
        Tone::Waiting => style(label).yellow().to_string(),
        Tone::Bad => style(label).red().bold().to_string(),
        Tone::Muted => style(label).dim().to_string(),
    }
}

/// Format an optional date, "-" when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Parse a `key=value` pair given on the command line
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Collect `key=value` pairs into a map (later keys win)
pub fn into_params(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

/// Ask for confirmation on a terminal; non-interactive runs need `--yes`
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !is_interactive() {
        return Err(miette::miette!(
            help = "pass --yes to skip the prompt",
            "confirmation required: {}",
            prompt
        ));
    }
    dialoguer::Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Use `value`, or ask for it on a terminal
///
/// Non-interactive runs get an empty string so the store reports the
/// missing field.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if is_interactive() => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic(),
        None => Ok(String::new()),
    }
}

/// Password given on the command line, or read without echo on a terminal
pub fn password_or_prompt(value: Option<String>, username: &str) -> Result<String> {
    match value {
        Some(p) => Ok(p),
        None if is_interactive() => Password::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Password for {}", username))
            .interact()
            .into_diagnostic(),
        None => Err(miette::miette!(
            help = "pass --password or set AEROCODE_PASSWORD",
            "no password given for '{}'",
            username
        )),
    }
}

/// Split a shell line into words, honouring single and double quotes
pub fn split_args(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => return Err("dangling escape".to_string()),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_word = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("Instalação Elétrica", 10), "Instala...");
        assert_eq!(truncate_str("CONCLUÍDA", 9), "CONCLUÍDA");
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("aircraft = E175").unwrap(),
            ("aircraft".to_string(), "E175".to_string())
        );
        assert_eq!(
            parse_key_value("period=2025-Q3=x").unwrap().1,
            "2025-Q3=x"
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_split_args_plain_and_quoted() {
        assert_eq!(
            split_args("part list --status em-estoque").unwrap(),
            vec!["part", "list", "--status", "em-estoque"]
        );
        assert_eq!(
            split_args(r#"acft new --model "Airbus A321" --code 'A321'"#).unwrap(),
            vec!["acft", "new", "--model", "Airbus A321", "--code", "A321"]
        );
    }

    #[test]
    fn test_split_args_empty_quotes_and_errors() {
        assert_eq!(split_args(r#"x """#).unwrap(), vec!["x", ""]);
        assert!(split_args("   ").unwrap().is_empty());
        assert!(split_args("say \"oops").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "-");
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2025, 6, 1)),
            "2025-06-01"
        );
    }
}
