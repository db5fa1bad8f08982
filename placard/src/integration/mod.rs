//! Optional external expansion engine integration
//!
//! - [`engine`] - the engine collaborator trait, descriptor and actor identity
//! - [`registry`] - engine discovery by name
//! - [`tracker`] - availability state machine
//! - [`local`] - in-process reference engine

pub mod engine;
pub mod local;
pub mod registry;
mod state;
mod tracker;

use std::panic::{self, AssertUnwindSafe};

pub use engine::{
    Actor, EngineError, EngineHandle, ExpansionDescriptor, ExpansionEngine, NamespaceResolver, PlacardNamespace,
};
pub use local::LocalEngine;
pub use registry::{EngineRegistry, ExtensionRegistry};
pub use state::{AvailabilityReason, IntegrationState};
pub use tracker::IntegrationTracker;

/// Run a call into the engine, turning both errors and panics into a message.
///
/// The engine is foreign code; nothing it does may unwind into the caller.
/// The process panic hook still runs first, so a panicking engine is also
/// reported on stderr by the default hook. Replacing the hook here would race
/// with other threads; hosts that want silence install their own.
pub(crate) fn isolate<T>(operation: &str, call: impl FnOnce() -> Result<T, EngineError>) -> Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("engine panicked during {}: {}", operation, message))
        }
    }
}
