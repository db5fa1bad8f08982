//! ExpansionEngine trait definition
//!
//! The external placeholder engine is an optional collaborator. Anything that
//! can expand `%namespace_key%` tokens for an actor can sit behind this trait.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Shared handle to an engine discovered in a registry
pub type EngineHandle = Arc<dyn ExpansionEngine>;

/// The actor a render is performed for (e.g. the viewer of a message)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
}

impl Actor {
    /// Create an actor with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(%name, "Actor::new: called");
        Self {
            id: Uuid::now_v7(),
            name,
        }
    }

    /// Create an actor with a known id
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Errors an expansion engine may raise
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Expansion failed: {0}")]
    Failed(String),

    #[error("Malformed placeholder: {token}")]
    MalformedPlaceholder { token: String },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Registration of '{identifier}' refused: {reason}")]
    RegistrationRefused { identifier: String, reason: String },
}

/// Identity and capability descriptor registered with an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionDescriptor {
    /// Namespace name, the `ns` in `%ns_key%`
    pub identifier: String,

    pub author: String,

    pub version: String,

    /// Keep the registration across engine reloads
    pub persist: bool,

    /// Always eligible to register
    #[serde(rename = "can-register")]
    pub can_register: bool,
}

impl Default for ExpansionDescriptor {
    fn default() -> Self {
        Self {
            identifier: "placard".to_string(),
            author: "placard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            persist: true,
            can_register: true,
        }
    }
}

/// Callback for engine-initiated lookups in a registered namespace
pub trait NamespaceResolver: Send + Sync {
    /// Resolve `key` (the part after `ns_`) for the actor, `None` if unknown
    fn resolve(&self, actor: &Actor, key: &str) -> Option<String>;
}

/// Resolver registered for our own namespace.
///
/// No dynamic state is exposed yet, so every key is unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlacardNamespace;

impl NamespaceResolver for PlacardNamespace {
    fn resolve(&self, actor: &Actor, key: &str) -> Option<String> {
        debug!(actor = %actor.name, %key, "PlacardNamespace::resolve: no such key");
        None
    }
}

/// An optional, independently managed placeholder expansion engine
pub trait ExpansionEngine: Send + Sync {
    /// Name the engine is registered under
    fn name(&self) -> &str;

    /// Is the engine installed and switched on
    fn is_enabled(&self) -> bool;

    /// Expand every token the engine knows in `text` for `actor`
    fn substitute(&self, actor: &Actor, text: &str) -> Result<String, EngineError>;

    /// Register a namespace with the engine
    fn register(&self, descriptor: ExpansionDescriptor, resolver: Arc<dyn NamespaceResolver>)
    -> Result<(), EngineError>;

    /// Remove a namespace, returns true if it was registered
    fn unregister(&self, identifier: &str) -> bool;
}
