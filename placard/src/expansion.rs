//! External expansion adapter
//!
//! Hands leftover tokens to the external engine when the tracker says it is
//! active. Failures never leave this module: they are logged and the text
//! comes back as it went in.

use tracing::{debug, warn};

use crate::integration::{Actor, IntegrationTracker, isolate};

/// Expand `text` for `identity` through the external engine, if any.
///
/// Returns `text` unchanged when there is no identity, the integration is
/// inactive, or the engine fails.
pub fn expand(tracker: &IntegrationTracker, text: &str, identity: Option<&Actor>) -> String {
    let Some(actor) = identity else {
        debug!("expand: no identity, skipping");
        return text.to_string();
    };
    // Read the handle once so a concurrent reload cannot produce a torn result
    let Some(engine) = tracker.engine_handle() else {
        debug!("expand: integration inactive, skipping");
        return text.to_string();
    };

    debug!(actor = %actor.name, engine = %tracker.engine_name(), "expand: delegating to engine");
    match isolate("substitute", || engine.substitute(actor, text)) {
        Ok(expanded) => expanded,
        Err(message) => {
            warn!("Failed to expand placeholders with {}: {}", tracker.engine_name(), message);
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use crate::integration::engine::mock::{MockBehavior, MockEngine};
    use crate::integration::{ExpansionDescriptor, ExtensionRegistry};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contains(&self, needle: &str) -> bool {
            String::from_utf8_lossy(&self.0.lock().unwrap()).contains(needle)
        }

        fn warnings(&self) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains("WARN"))
                .count()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, Captured) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, captured)
    }

    fn active_tracker(engine: Arc<MockEngine>) -> IntegrationTracker {
        let mut registry = ExtensionRegistry::new();
        registry.install_as("Mock", engine);
        let mut tracker = IntegrationTracker::new(Arc::new(registry), "Mock", ExpansionDescriptor::default());
        tracker.initialize(true);
        assert!(tracker.is_active());
        tracker
    }

    #[test]
    fn test_no_identity_is_noop() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append("!".to_string())));
        let tracker = active_tracker(engine.clone());

        assert_eq!(expand(&tracker, "%actor_name%", None), "%actor_name%");
        assert_eq!(engine.substitute_calls(), 0);
    }

    #[test]
    fn test_inactive_is_noop() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append("!".to_string())));
        let mut tracker = active_tracker(engine.clone());
        tracker.shutdown();

        let actor = Actor::new("Ada");
        assert_eq!(expand(&tracker, "hi", Some(&actor)), "hi");
        assert_eq!(engine.substitute_calls(), 0);
    }

    #[test]
    fn test_active_delegates() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Append("!".to_string())));
        let tracker = active_tracker(engine.clone());

        let actor = Actor::new("Ada");
        assert_eq!(expand(&tracker, "hi", Some(&actor)), "hi!");
        assert_eq!(engine.substitute_calls(), 1);
    }

    #[test]
    fn test_failing_engine_returns_original_and_warns_once() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Fail("out of memory".to_string())));
        let tracker = active_tracker(engine);
        let actor = Actor::new("Ada");

        let (out, logs) = with_captured_logs(|| expand(&tracker, "%x%", Some(&actor)));

        assert_eq!(out, "%x%");
        assert_eq!(logs.warnings(), 1);
    }

    #[test]
    fn test_failure_warning_names_engine_without_asking_it() {
        let engine = Arc::new(MockEngine::unnamed(MockBehavior::Fail("boom".to_string())));
        let tracker = active_tracker(engine.clone());
        let actor = Actor::new("Ada");

        let (out, logs) = with_captured_logs(|| expand(&tracker, "%x%", Some(&actor)));

        assert_eq!(out, "%x%");
        assert_eq!(logs.warnings(), 1);
        assert!(logs.contains("Failed to expand placeholders with Mock: "));
        assert_eq!(engine.substitute_calls(), 1);
    }

    #[test]
    fn test_panicking_engine_is_isolated() {
        let engine = Arc::new(MockEngine::new("Mock", MockBehavior::Panic));
        let tracker = active_tracker(engine);
        let actor = Actor::new("Ada");

        let (out, logs) = with_captured_logs(|| expand(&tracker, "%x%", Some(&actor)));

        assert_eq!(out, "%x%");
        assert_eq!(logs.warnings(), 1);
    }
}
