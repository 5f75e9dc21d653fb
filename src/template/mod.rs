//! Placeholder substitution for deployment templates.
//!
//! A placeholder is `{{ <path> [| <filter> [arg]]... }}` where `<path>` is a
//! dot separated field path such as `.Build.Commit` or `repo.name`. Segments
//! are matched case-insensitively against the serialized context.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::PluginError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template context could not be built: {0}")]
    Context(#[from] serde_json::Error),
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
    #[error("malformed placeholder `{0}`")]
    Malformed(String),
    #[error("can't evaluate field `{0}`")]
    UnknownField(String),
    #[error("field `{0}` is not a scalar value")]
    NotScalar(String),
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),
    #[error("invalid argument for filter `{filter}`: {argument}")]
    FilterArgument { filter: String, argument: String },
}

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"(?s)\{\{.*?\}\}").unwrap();
    static ref FIELD_PATH: Regex =
        Regex::new(r"^\.?[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// Reads `path` and renders it against `context`.
pub fn open_and_render<C: Serialize>(path: &Path, context: &C) -> Result<String, PluginError> {
    let template = std::fs::read_to_string(path).map_err(|source| PluginError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(render_trim(&template, context)?)
}

/// Substitutes every placeholder and trims surrounding whitespace from the result.
pub fn render_trim<C: Serialize>(template: &str, context: &C) -> Result<String, RenderError> {
    let context = serde_json::to_value(context)?;
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for found in PLACEHOLDER.find_iter(template) {
        check_no_open(&template[last..found.start()], last)?;
        rendered.push_str(&template[last..found.start()]);
        let expression = &template[found.start() + 2..found.end() - 2];
        rendered.push_str(&evaluate(expression, &context)?);
        last = found.end();
    }
    check_no_open(&template[last..], last)?;
    rendered.push_str(&template[last..]);

    Ok(rendered.trim().to_string())
}

fn check_no_open(text: &str, offset: usize) -> Result<(), RenderError> {
    match text.find("{{") {
        Some(position) => Err(RenderError::Unterminated(offset + position)),
        None => Ok(()),
    }
}

fn evaluate(expression: &str, context: &Value) -> Result<String, RenderError> {
    let mut stages = expression.split('|').map(str::trim);
    let path = stages.next().unwrap_or_default();
    if !FIELD_PATH.is_match(path) {
        return Err(RenderError::Malformed(expression.trim().to_string()));
    }

    let mut value = lookup(path, context)?;
    for stage in stages {
        value = apply_filter(stage, value)?;
    }
    Ok(value)
}

fn lookup(path: &str, context: &Value) -> Result<String, RenderError> {
    let mut current = context;
    for segment in path.trim_start_matches('.').split('.') {
        current = current
            .as_object()
            .and_then(|fields| {
                fields
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(segment))
                    .map(|(_, value)| value)
            })
            .ok_or_else(|| RenderError::UnknownField(path.to_string()))?;
    }

    match current {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(RenderError::NotScalar(path.to_string())),
    }
}

fn apply_filter(stage: &str, value: String) -> Result<String, RenderError> {
    let (name, argument) = match stage.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, Some(argument.trim())),
        None => (stage, None),
    };
    let bad_argument = || RenderError::FilterArgument {
        filter: name.to_string(),
        argument: argument.unwrap_or_default().to_string(),
    };

    match (name, argument) {
        ("upper", None) => Ok(value.to_uppercase()),
        ("lower", None) => Ok(value.to_lowercase()),
        ("trim", None) => Ok(value.trim().to_string()),
        ("truncate", Some(length)) => {
            let length: usize = length.parse().map_err(|_| bad_argument())?;
            Ok(value.chars().take(length).collect())
        }
        ("default", Some(fallback)) => {
            let fallback = fallback
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .ok_or_else(bad_argument)?;
            if value.is_empty() {
                Ok(fallback.to_string())
            } else {
                Ok(value)
            }
        }
        ("upper" | "lower" | "trim" | "truncate" | "default", _) => Err(bad_argument()),
        _ => Err(RenderError::UnknownFilter(name.to_string())),
    }
}
