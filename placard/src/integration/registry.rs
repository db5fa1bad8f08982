//! Engine discovery
//!
//! The host application owns a registry of installed extensions. The tracker
//! only ever asks it for an engine by name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::engine::{EngineHandle, ExpansionEngine};

/// Lookup of installed expansion engines by name
pub trait EngineRegistry: Send + Sync {
    /// Find an installed engine, `None` if it is not installed
    fn lookup(&self, name: &str) -> Option<EngineHandle>;
}

/// In-process registry backed by a map
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    engines: HashMap<String, EngineHandle>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an engine under its own name, replacing any previous one
    pub fn install(&mut self, engine: Arc<dyn ExpansionEngine>) {
        let name = engine.name().to_string();
        self.install_as(name, engine);
    }

    /// Install an engine under an explicit name without asking the engine
    pub fn install_as(&mut self, name: impl Into<String>, engine: Arc<dyn ExpansionEngine>) {
        let name = name.into();
        debug!(%name, "ExtensionRegistry::install_as: called");
        self.engines.insert(name, engine);
    }

    /// Remove an engine, returns it if it was installed
    pub fn uninstall(&mut self, name: &str) -> Option<EngineHandle> {
        debug!(%name, "ExtensionRegistry::uninstall: called");
        self.engines.remove(name)
    }

    /// Installed engine names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.keys().cloned().collect();
        names.sort();
        names
    }
}

impl EngineRegistry for ExtensionRegistry {
    fn lookup(&self, name: &str) -> Option<EngineHandle> {
        let found = self.engines.get(name).cloned();
        debug!(%name, found = found.is_some(), "ExtensionRegistry::lookup: called");
        found
    }
}
