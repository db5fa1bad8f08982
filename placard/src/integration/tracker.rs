//! Integration availability tracker
//!
//! Single source of truth for whether external expansion may be used. The
//! tracker is constructed once at startup and passed by reference to every
//! render, so there is no ambient global state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::engine::{EngineHandle, ExpansionDescriptor, PlacardNamespace};
use super::isolate;
use super::registry::EngineRegistry;
use super::state::{AvailabilityReason, IntegrationState};

/// Decides and records whether the optional expansion engine is usable
pub struct IntegrationTracker {
    registry: Arc<dyn EngineRegistry>,
    engine_name: String,
    descriptor: ExpansionDescriptor,
    state: IntegrationState,
}

impl IntegrationTracker {
    /// Create an uninitialized tracker that will look up `engine_name` in `registry`
    pub fn new(registry: Arc<dyn EngineRegistry>, engine_name: impl Into<String>, descriptor: ExpansionDescriptor) -> Self {
        let engine_name = engine_name.into();
        debug!(%engine_name, identifier = %descriptor.identifier, "IntegrationTracker::new: called");
        Self {
            registry,
            engine_name,
            descriptor,
            state: IntegrationState::default(),
        }
    }

    /// Probe the engine and (re)register our namespace.
    ///
    /// Re-initializing drops the previous registration first, so the engine
    /// never holds a duplicate. Every failure collapses into an inactive state.
    pub fn initialize(&mut self, requested: bool) {
        debug!(%requested, engine = %self.engine_name, "IntegrationTracker::initialize: called");
        self.release_registration();

        if !requested {
            self.transition(IntegrationState::inactive(false, AvailabilityReason::DisabledByConfig));
            return;
        }

        let Some(engine) = self.registry.lookup(&self.engine_name) else {
            debug!("IntegrationTracker::initialize: engine not installed");
            self.transition(IntegrationState::inactive(
                true,
                AvailabilityReason::EngineNotFound {
                    name: self.engine_name.clone(),
                },
            ));
            return;
        };

        let enabled = isolate("is_enabled", || Ok(engine.is_enabled())).unwrap_or(false);
        if !enabled {
            debug!("IntegrationTracker::initialize: engine installed but not enabled");
            self.transition(IntegrationState::inactive(
                true,
                AvailabilityReason::EngineNotEnabled {
                    name: self.engine_name.clone(),
                },
            ));
            return;
        }

        let descriptor = self.descriptor.clone();
        match isolate("register", || engine.register(descriptor, Arc::new(PlacardNamespace))) {
            Ok(()) => {
                debug!(identifier = %self.descriptor.identifier, "IntegrationTracker::initialize: registered namespace");
                self.transition(IntegrationState::active(engine, self.engine_name.clone()));
            }
            Err(message) => {
                warn!("Failed to register '{}' with {}: {}", self.descriptor.identifier, self.engine_name, message);
                self.transition(IntegrationState::inactive(
                    true,
                    AvailabilityReason::RegistrationRefused {
                        name: self.engine_name.clone(),
                        message,
                    },
                ));
            }
        }
    }

    /// Tear down the integration. Idempotent, safe before `initialize`.
    pub fn shutdown(&mut self) {
        debug!(active = self.state.is_active(), "IntegrationTracker::shutdown: called");
        self.release_registration();
        let requested = self.state.is_requested();
        self.transition(IntegrationState::inactive(requested, AvailabilityReason::ShutDown));
    }

    /// Administratively switch the integration off without forgetting it was requested
    pub fn disable(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "IntegrationTracker::disable: called");
        self.release_registration();
        let requested = self.state.is_requested();
        self.transition(IntegrationState::inactive(requested, AvailabilityReason::Disabled { message }));
    }

    pub fn is_requested(&self) -> bool {
        self.state.is_requested()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// The engine handle, present only while active
    pub fn engine_handle(&self) -> Option<EngineHandle> {
        self.state.engine().cloned()
    }

    pub fn reason(&self) -> &AvailabilityReason {
        self.state.reason()
    }

    pub fn state(&self) -> &IntegrationState {
        &self.state
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    pub fn descriptor(&self) -> &ExpansionDescriptor {
        &self.descriptor
    }

    fn release_registration(&mut self) {
        if let Some(engine) = self.state.engine() {
            let identifier = self.descriptor.identifier.clone();
            let removed = isolate("unregister", || Ok(engine.unregister(&identifier))).unwrap_or(false);
            debug!(%identifier, %removed, "IntegrationTracker::release_registration: unregistered");
        }
    }

    fn transition(&mut self, next: IntegrationState) {
        info!("{}", next.reason());
        self.state = next;
    }
}

impl std::fmt::Debug for IntegrationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationTracker")
            .field("engine_name", &self.engine_name)
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::engine::mock::{MockBehavior, MockEngine};
    use crate::integration::registry::ExtensionRegistry;

    fn tracker_with(engine: Option<Arc<MockEngine>>) -> IntegrationTracker {
        let mut registry = ExtensionRegistry::new();
        if let Some(engine) = engine {
            registry.install(engine);
        }
        IntegrationTracker::new(Arc::new(registry), "Mock", ExpansionDescriptor::default())
    }

    #[test]
    fn test_initialize_not_requested() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        tracker.initialize(false);

        assert!(!tracker.is_requested());
        assert!(!tracker.is_active());
        assert!(tracker.engine_handle().is_none());
        assert_eq!(tracker.reason(), &AvailabilityReason::DisabledByConfig);
        assert!(engine.registrations().is_empty());
    }

    #[test]
    fn test_initialize_engine_missing() {
        let mut tracker = tracker_with(None);

        tracker.initialize(true);

        assert!(tracker.is_requested());
        assert!(!tracker.is_active());
        assert!(matches!(tracker.reason(), AvailabilityReason::EngineNotFound { .. }));
    }

    #[test]
    fn test_initialize_engine_not_enabled() {
        let mut tracker = tracker_with(Some(Arc::new(MockEngine::disabled("Mock"))));

        tracker.initialize(true);

        assert!(tracker.is_requested());
        assert!(!tracker.is_active());
        assert!(matches!(tracker.reason(), AvailabilityReason::EngineNotEnabled { .. }));
    }

    #[test]
    fn test_initialize_registration_refused() {
        let mut tracker = tracker_with(Some(Arc::new(MockEngine::refusing("Mock"))));

        tracker.initialize(true);

        assert!(tracker.is_requested());
        assert!(!tracker.is_active());
        assert!(tracker.engine_handle().is_none());
        assert!(matches!(tracker.reason(), AvailabilityReason::RegistrationRefused { .. }));
    }

    #[test]
    fn test_initialize_active_registers_descriptor() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        tracker.initialize(true);

        assert!(tracker.is_requested());
        assert!(tracker.is_active());
        assert!(tracker.engine_handle().is_some());
        let registrations = engine.registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0], ExpansionDescriptor::default());
    }

    #[test]
    fn test_reinitialize_does_not_duplicate_registration() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        tracker.initialize(true);
        tracker.initialize(true);
        tracker.initialize(true);

        assert!(tracker.is_active());
        assert_eq!(engine.registrations().len(), 1);
        assert_eq!(engine.unregister_calls(), 2);
    }

    #[test]
    fn test_reinitialize_false_after_active_unregisters() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        tracker.initialize(true);
        tracker.initialize(false);

        assert!(!tracker.is_active());
        assert!(!tracker.is_requested());
        assert!(engine.registrations().is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        // Before initialize
        tracker.shutdown();
        assert!(!tracker.is_active());

        tracker.initialize(true);
        tracker.shutdown();
        tracker.shutdown();

        assert!(!tracker.is_active());
        assert!(tracker.engine_handle().is_none());
        assert_eq!(tracker.reason(), &AvailabilityReason::ShutDown);
        assert!(engine.registrations().is_empty());
        assert_eq!(engine.unregister_calls(), 1);
    }

    #[test]
    fn test_initialize_never_asks_engine_for_its_name() {
        let engine = Arc::new(MockEngine::unnamed(MockBehavior::Append(String::new())));
        let mut registry = ExtensionRegistry::new();
        registry.install_as("Mock", engine.clone());
        let mut tracker = IntegrationTracker::new(Arc::new(registry), "Mock", ExpansionDescriptor::default());

        tracker.initialize(true);

        assert!(tracker.is_active());
        assert_eq!(tracker.reason(), &AvailabilityReason::Active { name: "Mock".to_string() });
        assert!(format!("{:?}", tracker).contains("engine: true"));
        tracker.shutdown();
        assert_eq!(engine.unregister_calls(), 1);
    }

    #[test]
    fn test_disable_keeps_requested() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append(String::new())));
        let mut tracker = tracker_with(Some(engine.clone()));

        tracker.initialize(true);
        tracker.disable("maintenance");

        assert!(tracker.is_requested());
        assert!(!tracker.is_active());
        assert!(engine.registrations().is_empty());
        assert!(tracker.reason().to_string().contains("maintenance"));
    }
}
