//! In-process reference engine
//!
//! Expands `%namespace_key%` tokens. The `actor` namespace is built in
//! (`%actor_name%`, `%actor_id%`); every other namespace is served by a
//! resolver registered through [`ExpansionEngine::register`]. Tokens nobody
//! can answer are left exactly as written.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;
use tracing::{debug, info};

use super::engine::{Actor, EngineError, ExpansionDescriptor, ExpansionEngine, NamespaceResolver};

/// Name the local engine registers under
pub const LOCAL_ENGINE_NAME: &str = "LocalEngine";

const ACTOR_NAMESPACE: &str = "actor";

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z0-9-]+)_([^%\s]+)%").expect("token pattern is valid"));

struct Expansion {
    descriptor: ExpansionDescriptor,
    resolver: Arc<dyn NamespaceResolver>,
}

/// Reference implementation of [`ExpansionEngine`]
pub struct LocalEngine {
    enabled: AtomicBool,
    expansions: RwLock<HashMap<String, Expansion>>,
}

impl LocalEngine {
    pub fn new() -> Self {
        debug!("LocalEngine::new: called");
        Self {
            enabled: AtomicBool::new(true),
            expansions: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        debug!(%enabled, "LocalEngine::set_enabled: called");
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Registered namespace identifiers, sorted
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.expansions.read() {
            Ok(expansions) => expansions.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Reload the engine, dropping every registration that did not ask to persist.
    ///
    /// Returns the number of registrations dropped.
    pub fn reload(&self) -> usize {
        debug!("LocalEngine::reload: called");
        let Ok(mut expansions) = self.expansions.write() else {
            return 0;
        };
        let before = expansions.len();
        expansions.retain(|_, expansion| expansion.descriptor.persist);
        let dropped = before - expansions.len();
        info!("LocalEngine reloaded, dropped {} non-persistent expansion(s)", dropped);
        dropped
    }

    fn resolver(&self, namespace: &str) -> Result<Option<Arc<dyn NamespaceResolver>>, EngineError> {
        let expansions = self
            .expansions
            .read()
            .map_err(|_| EngineError::Failed("expansion table poisoned".to_string()))?;
        Ok(expansions
            .get(&namespace.to_lowercase())
            .map(|expansion| expansion.resolver.clone()))
    }

    // The table lock is released before the resolver runs, so a resolver may
    // call back into the engine.
    fn resolve(&self, actor: &Actor, namespace: &str, key: &str) -> Result<Option<String>, EngineError> {
        if namespace.eq_ignore_ascii_case(ACTOR_NAMESPACE) {
            return Ok(match key {
                "name" => Some(actor.name.clone()),
                "id" | "uuid" => Some(actor.id.to_string()),
                _ => None,
            });
        }
        Ok(self
            .resolver(namespace)?
            .and_then(|resolver| resolver.resolve(actor, key)))
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionEngine for LocalEngine {
    fn name(&self) -> &str {
        LOCAL_ENGINE_NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn substitute(&self, actor: &Actor, text: &str) -> Result<String, EngineError> {
        debug!(actor = %actor.name, text_len = text.len(), "LocalEngine::substitute: called");
        let mut expanded = String::with_capacity(text.len());
        let mut last = 0;
        for caps in TOKEN.captures_iter(text) {
            let Some(token) = caps.get(0) else { continue };
            expanded.push_str(&text[last..token.start()]);
            match self.resolve(actor, &caps[1], &caps[2])? {
                Some(value) => expanded.push_str(&value),
                None => expanded.push_str(token.as_str()),
            }
            last = token.end();
        }
        expanded.push_str(&text[last..]);
        Ok(expanded)
    }

    fn register(
        &self,
        descriptor: ExpansionDescriptor,
        resolver: Arc<dyn NamespaceResolver>,
    ) -> Result<(), EngineError> {
        let identifier = descriptor.identifier.to_lowercase();
        debug!(%identifier, "LocalEngine::register: called");

        if !descriptor.can_register {
            return Err(EngineError::RegistrationRefused {
                identifier,
                reason: "expansion is not eligible to register".to_string(),
            });
        }
        if identifier.is_empty() || identifier == ACTOR_NAMESPACE || identifier.contains('_') {
            return Err(EngineError::RegistrationRefused {
                identifier,
                reason: "identifier is reserved or invalid".to_string(),
            });
        }

        let mut expansions = self
            .expansions
            .write()
            .map_err(|_| EngineError::Failed("expansion table poisoned".to_string()))?;
        if expansions.contains_key(&identifier) {
            debug!(%identifier, "LocalEngine::register: replacing existing registration");
        }
        info!(
            "Registered expansion '{}' v{} by {}",
            descriptor.identifier, descriptor.version, descriptor.author
        );
        expansions.insert(identifier, Expansion { descriptor, resolver });
        Ok(())
    }

    fn unregister(&self, identifier: &str) -> bool {
        debug!(%identifier, "LocalEngine::unregister: called");
        match self.expansions.write() {
            Ok(mut expansions) => expansions.remove(&identifier.to_lowercase()).is_some(),
            Err(_) => false,
        }
    }
}
