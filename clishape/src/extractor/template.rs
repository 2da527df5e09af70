//! Command templates and their parameters.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::ExtractorError;

/// Named values substituted into a command template.
///
/// ```
/// use clishape::extractor::Params;
///
/// let params = Params::new().with("vrf", "blue").with("intf_or_ip", "Vlan100");
/// assert_eq!(params.get("vrf"), Some("blue"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Names of the supplied parameters.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder(String),
}

/// A command string with `{name}` placeholders.
///
/// Tokens are separated by whitespace and a placeholder stands for exactly
/// one token, so templates can be rendered from [`Params`] and matched back
/// against a concrete command.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    template: String,
    tokens: Vec<Token>,
    matcher: Regex,
}

impl CommandTemplate {
    /// Parse a template.
    pub fn new(template: &str) -> Result<Self, ExtractorError> {
        let tokens: Vec<Token> = template
            .split_whitespace()
            .map(|token| {
                match token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
                    Some(name) if is_identifier(name) => Token::Placeholder(name.to_string()),
                    _ => Token::Literal(token.to_string()),
                }
            })
            .collect();

        let body: Vec<String> = tokens
            .iter()
            .map(|token| match token {
                Token::Literal(text) => regex::escape(text),
                Token::Placeholder(name) => format!(r"(?P<{}>\S+)", name),
            })
            .collect();
        let matcher = Regex::new(&format!(r"^\s*{}\s*$", body.join(r"\s+")))?;

        Ok(Self {
            template: tokens_to_string(&tokens),
            tokens,
            matcher,
        })
    }

    /// The template text, whitespace-normalized.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Placeholder(name) => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Whether the supplied parameter names are exactly this template's
    /// placeholders.
    pub fn accepts(&self, params: &Params) -> bool {
        let placeholders: Vec<&str> = self.placeholders().collect();
        placeholders.len() == params.len() && placeholders.iter().all(|p| params.get(p).is_some())
    }

    /// Render the template, or `None` if a placeholder has no value.
    pub fn render(&self, params: &Params) -> Option<String> {
        let parts = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Literal(text) => Some(text.as_str()),
                Token::Placeholder(name) => params.get(name),
            })
            .collect::<Option<Vec<&str>>>()?;
        Some(parts.join(" "))
    }

    /// Match a concrete command, extracting the placeholder values.
    pub fn matches(&self, command: &str) -> Option<Params> {
        let caps = self.matcher.captures(command)?;
        let mut params = Params::new();
        for name in self.placeholders() {
            params.insert(name, caps.name(name)?.as_str());
        }
        Some(params)
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn tokens_to_string(tokens: &[Token]) -> String {
    let parts: Vec<String> = tokens
        .iter()
        .map(|token| match token {
            Token::Literal(text) => text.clone(),
            Token::Placeholder(name) => format!("{{{}}}", name),
        })
        .collect();
    parts.join(" ")
}
