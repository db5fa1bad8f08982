//! Placard - placeholder resolution and rich-text rendering
//!
//! Given a template, a set of static `{key}` substitutions and an optional
//! actor, placard produces fully resolved styled text. An optional external
//! engine can expand `%namespace_key%` tokens per actor; when it is missing,
//! disabled or failing, rendering carries on without it.
//!
//! # Pipeline
//!
//! ```text
//! template ──► static {key} pass ──► external expansion ──► markup ──► Text
//!                                     (only when active
//!                                      and an actor given)
//! ```
//!
//! # Modules
//!
//! - [`substitution`] - static substitution and the placeholder builder
//! - [`integration`] - engine collaborator, registry and availability tracker
//! - [`expansion`] - failure-isolating adapter around the engine
//! - [`richtext`] - markup parsing into `ratatui` styled text
//! - [`pipeline`] - the full render path
//! - [`permissions`] - permission node catalog
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```ignore
//! use placard::{IntegrationTracker, Pipeline, PlaceholderSet, RenderRequest};
//!
//! let mut tracker = IntegrationTracker::new(registry, "LocalEngine", Default::default());
//! tracker.initialize(true);
//!
//! let mut set = PlaceholderSet::new();
//! set.add("name", "Ada").add("count", 5);
//! let request = RenderRequest::new("<gold>Hello {name}</gold>, you have {count} points")
//!     .with_substitutions(set.build());
//! let text = Pipeline::new(&tracker).render(&request);
//! ```

pub mod cli;
pub mod config;
pub mod expansion;
pub mod integration;
pub mod permissions;
pub mod pipeline;
pub mod richtext;
pub mod substitution;

// Re-export commonly used types
pub use config::{Config, IntegrationConfig};
pub use expansion::expand;
pub use integration::{
    Actor, AvailabilityReason, EngineError, EngineHandle, EngineRegistry, ExpansionDescriptor, ExpansionEngine,
    ExtensionRegistry, IntegrationState, IntegrationTracker, LocalEngine, NamespaceResolver,
};
pub use permissions::Permission;
pub use pipeline::{Pipeline, RenderRequest};
pub use richtext::{render, render_plain, strip_tags};
pub use substitution::{PlaceholderSet, SubstitutionMap, apply_static};
