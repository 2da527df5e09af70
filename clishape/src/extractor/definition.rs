//! Extractor definitions: templates, rules and schema for one command.

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};

use super::executor::{acquire, Executor};
use super::template::{CommandTemplate, Params};
use crate::error::{ExtractorError, Result, ScanError};
use crate::scanner::{Rule, ScanContext, Scanner};
use crate::schema::Schema;
use crate::value::{Map, Value};

/// Everything needed to turn one command's output into a validated record.
///
/// Extractors are built once and then only read, so a single instance can
/// serve any number of concurrent scans.
#[derive(Clone)]
pub struct Extractor {
    /// Extractor name (e.g., "show_arp", "show_pce_ipv4_peer_detail").
    pub name: String,

    /// Human readable description.
    pub description: String,

    /// Command templates, in preference order.
    pub commands: Vec<CommandTemplate>,

    /// Rules applied to each line, in order.
    pub rules: Vec<Rule>,

    /// Shape every result must conform to.
    pub schema: Schema,

    /// Field names excluded from snapshot comparison.
    pub volatile: Vec<String>,
}

impl Extractor {
    /// Create an extractor with no commands, no rules and an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            commands: vec![],
            rules: vec![],
            schema: Schema::fixed(),
            volatile: vec![],
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a command template.
    pub fn with_command(mut self, template: &str) -> std::result::Result<Self, ExtractorError> {
        self.commands.push(CommandTemplate::new(template)?);
        Ok(self)
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Mark a field name as volatile.
    pub fn with_volatile(mut self, field: impl Into<String>) -> Self {
        self.volatile.push(field.into());
        self
    }

    /// Scan output without validating it.
    pub fn scan(&self, text: &str) -> std::result::Result<Map, ScanError> {
        Scanner::new(&self.rules).scan(text, ScanContext::new())
    }

    /// Scan output and validate the result against the schema.
    pub fn parse(&self, text: &str) -> Result<Map> {
        let map = self.scan(text)?;
        if let Err(e) = self.schema.validate_map(&map) {
            warn!("Extractor '{}' produced a non-conforming result: {}", self.name, e);
            return Err(e.into());
        }
        debug!("Extractor '{}' produced {} top-level keys", self.name, map.len());
        Ok(map)
    }

    /// Find the template whose placeholders are exactly the supplied parameters.
    pub fn template_for(&self, params: &Params) -> std::result::Result<&CommandTemplate, ExtractorError> {
        self.commands
            .iter()
            .find(|template| template.accepts(params))
            .ok_or_else(|| ExtractorError::NoTemplate {
                extractor: self.name.clone(),
                params: params.to_string(),
            })
    }

    /// Render the command for a parameter set.
    pub fn render(&self, params: &Params) -> Result<String> {
        let template = self.template_for(params)?;
        template.render(params).ok_or_else(|| {
            ExtractorError::NoTemplate {
                extractor: self.name.clone(),
                params: params.to_string(),
            }
            .into()
        })
    }

    /// Produce a validated result.
    ///
    /// If `output` is supplied it is parsed as-is and the executor is not
    /// touched. Otherwise the command is rendered from `params`, executed,
    /// and its output parsed.
    pub async fn run<E: Executor>(
        &self,
        executor: &mut E,
        params: &Params,
        output: Option<&str>,
    ) -> Result<Map> {
        match output {
            Some(text) => self.parse(text),
            None => {
                let command = self.render(params)?;
                let text = acquire(executor, &command).await?;
                self.parse(&text)
            }
        }
    }

    /// Match a concrete command against this extractor's templates.
    ///
    /// When several templates match, the one with the fewest placeholders
    /// wins, then declaration order.
    pub fn match_command(&self, command: &str) -> Option<Params> {
        self.commands
            .iter()
            .filter_map(|template| template.matches(command))
            .min_by_key(Params::len)
    }

    /// Copy a result without its volatile fields.
    ///
    /// Fields are removed wherever they occur, so two snapshots of a healthy
    /// device compare equal even when ages and running counters moved.
    pub fn strip_volatile(&self, map: &Map) -> Map {
        let volatile: HashSet<&str> = self.volatile.iter().map(String::as_str).collect();
        strip(map, &volatile)
    }
}

fn strip(map: &Map, volatile: &HashSet<&str>) -> Map {
    map.iter()
        .filter(|(key, _)| !volatile.contains(key.as_str()))
        .map(|(key, value)| {
            let value = match value {
                Value::Map(inner) => Value::Map(strip(inner, volatile)),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<&str> = self.commands.iter().map(CommandTemplate::as_str).collect();
        f.debug_struct("Extractor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("commands", &commands)
            .field("rules", &self.rules.len())
            .field("volatile", &self.volatile)
            .finish()
    }
}
