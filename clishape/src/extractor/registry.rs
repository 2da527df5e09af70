//! Global extractor registry for looking up extractors by name or command.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;

use super::definition::Extractor;
use super::template::Params;
use crate::error::{ExtractorError, Result};
use crate::extractors;

/// Global extractor registry.
static REGISTRY: Lazy<RwLock<ExtractorRegistry>> = Lazy::new(|| {
    let registry = ExtractorRegistry::with_builtins()
        .expect("built-in extractor definitions are valid");
    RwLock::new(registry)
});

/// Registry of extractor definitions, in registration order.
#[derive(Debug, Default)]
pub struct ExtractorRegistry {
    extractors: IndexMap<String, Arc<Extractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: IndexMap::new(),
        }
    }

    /// Create a registry holding every built-in extractor.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for extractor in extractors::builtin()? {
            registry.register(extractor)?;
        }
        debug!("Registered {} built-in extractors", registry.len());
        Ok(registry)
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<ExtractorRegistry> {
        &REGISTRY
    }

    /// Register an extractor.
    pub fn register(&mut self, extractor: Extractor) -> Result<()> {
        if self.extractors.contains_key(&extractor.name) {
            return Err(ExtractorError::AlreadyRegistered {
                name: extractor.name.clone(),
            }
            .into());
        }
        self.extractors
            .insert(extractor.name.clone(), Arc::new(extractor));
        Ok(())
    }

    /// Get an extractor by name.
    pub fn get(&self, name: &str) -> Option<Arc<Extractor>> {
        self.extractors.get(name).cloned()
    }

    /// Get an extractor by name, failing if it is not registered.
    pub fn require(&self, name: &str) -> Result<Arc<Extractor>> {
        self.get(name).ok_or_else(|| {
            ExtractorError::UnknownExtractor {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Check if an extractor is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.extractors.contains_key(name)
    }

    /// List all registered extractor names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extractors.keys().map(String::as_str)
    }

    /// Number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Find the extractor for a concrete command.
    ///
    /// Among all matching templates the one with the fewest placeholders
    /// wins, so `show arp summary` goes to the summary extractor rather than
    /// to `show arp {intf_or_ip}`. Ties go to the earlier registration.
    pub fn lookup(&self, command: &str) -> Result<(Arc<Extractor>, Params)> {
        self.extractors
            .values()
            .filter_map(|extractor| {
                extractor
                    .match_command(command)
                    .map(|params| (Arc::clone(extractor), params))
            })
            .min_by_key(|(_, params)| params.len())
            .ok_or_else(|| {
                ExtractorError::NoMatchingExtractor {
                    command: command.to_string(),
                }
                .into()
            })
    }
}
