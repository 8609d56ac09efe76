//! Command-line templates with named placeholders.
//!
//! A template is a shell command string containing `{name}` placeholders, for
//! example `nmap -sCV {target}`. Rendering substitutes argument values verbatim:
//! nothing is quoted or escaped. This is the single place a command line is built
//! from client input, so any future quoting or allow-listing belongs here.
//!
//! A placeholder can also be bound to a fixed value when the template is built
//! (see [`CommandTemplate::with_fixed`]). Fixed values are substituted in the same
//! pass as arguments, so braces inside them are never read as placeholders.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while rendering a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// An argument named by a placeholder was not supplied.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// A command line with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    fixed: Vec<(String, String)>,
}

impl CommandTemplate {
    /// Wraps a template string.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fixed: Vec::new(),
        }
    }

    /// Binds the placeholder `name` to `value`.
    ///
    /// A bound placeholder is no longer reported by [`Self::placeholders`] and
    /// ignores any argument of the same name.
    #[must_use]
    pub fn with_fixed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.fixed.retain(|(bound, _)| *bound != name);
        self.fixed.push((name, value.into()));
        self
    }

    fn fixed_value(&self, name: &str) -> Option<&str> {
        self.fixed
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the names of the placeholders filled from arguments, in order of
    /// first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in placeholder_regex().captures_iter(&self.source) {
            if let Some(m) = caps.get(1) {
                if self.fixed_value(m.as_str()).is_none() && !names.contains(&m.as_str()) {
                    names.push(m.as_str());
                }
            }
        }
        names
    }

    /// Builds the command line by substituting each placeholder with its argument.
    ///
    /// String values are inserted as-is. Other JSON values are inserted as their
    /// JSON text, so `80` becomes `80` and `true` becomes `true`. Arguments that no
    /// placeholder refers to are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingArgument`] for the first placeholder whose
    /// argument is absent or `null`.
    pub fn render(&self, arguments: &Map<String, Value>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| arguments.get(*name).map_or(true, Value::is_null))
        {
            return Err(TemplateError::MissingArgument(missing.to_string()));
        }

        let rendered = placeholder_regex().replace_all(&self.source, |caps: &Captures<'_>| {
            self.fixed_value(&caps[1]).map_or_else(
                || arguments.get(&caps[1]).map(argument_text).unwrap_or_default(),
                str::to_string,
            )
        });

        Ok(rendered.into_owned())
    }
}

impl From<&str> for CommandTemplate {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for CommandTemplate {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

fn argument_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
