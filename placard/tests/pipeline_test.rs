//! End-to-end tests for the render pipeline
//!
//! These exercise the public API the way a host application would: one
//! tracker built at startup, passed to every render.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use placard::{
    Actor, EngineError, ExpansionDescriptor, ExpansionEngine, ExtensionRegistry, IntegrationTracker, LocalEngine,
    NamespaceResolver, PlaceholderSet, Pipeline, RenderRequest, SubstitutionMap, apply_static, expand, render,
    render_plain,
};
use ratatui::text::Text;

/// Host-side engine that fails every substitution
struct BrokenEngine {
    calls: AtomicUsize,
}

impl ExpansionEngine for BrokenEngine {
    fn name(&self) -> &str {
        "Broken"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn substitute(&self, _actor: &Actor, _text: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::ResourceExhausted("stack overflow in placeholder".to_string()))
    }

    fn register(&self, _descriptor: ExpansionDescriptor, _resolver: Arc<dyn NamespaceResolver>) -> Result<(), EngineError> {
        Ok(())
    }

    fn unregister(&self, _identifier: &str) -> bool {
        true
    }
}

fn tracker_for(engine: Arc<dyn ExpansionEngine>, requested: bool) -> IntegrationTracker {
    let name = engine.name().to_string();
    let mut registry = ExtensionRegistry::new();
    registry.install(engine);
    let mut tracker = IntegrationTracker::new(Arc::new(registry), name, ExpansionDescriptor::default());
    tracker.initialize(requested);
    tracker
}

#[test]
fn test_greeting_scenario_with_inactive_tracker() {
    let mut tracker = tracker_for(Arc::new(LocalEngine::new()), true);
    tracker.shutdown();
    assert!(!tracker.is_active());

    let map: SubstitutionMap = [("name", "Ada"), ("count", "5")].into_iter().collect();
    let substituted = apply_static(Some("Hello {name}, you have {count} points"), &map);
    assert_eq!(substituted, "Hello Ada, you have 5 points");

    let actor = Actor::new("Ada");
    assert_eq!(expand(&tracker, &substituted, Some(&actor)), substituted);

    let text = render(Some(substituted.as_str()));
    assert_ne!(text, Text::default());
    assert_eq!(render_plain(Some(substituted.as_str())), "Hello Ada, you have 5 points");
}

#[test]
fn test_failing_engine_returns_text_unchanged() {
    let engine = Arc::new(BrokenEngine {
        calls: AtomicUsize::new(0),
    });
    let tracker = tracker_for(engine.clone(), true);
    assert!(tracker.is_active());

    let actor = Actor::new("Ada");
    assert_eq!(expand(&tracker, "%x%", Some(&actor)), "%x%");
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

    let request = RenderRequest::new("<red>%x%</red>").with_identity(actor);
    assert_eq!(Pipeline::new(&tracker).render_plain(&request), "%x%");
}

#[test]
fn test_initialize_false_ignores_installed_engine() {
    let tracker = tracker_for(Arc::new(LocalEngine::new()), false);
    assert!(!tracker.is_active());
    assert!(!tracker.is_requested());
}

#[test]
fn test_initialize_true_without_engine() {
    let mut tracker = IntegrationTracker::new(
        Arc::new(ExtensionRegistry::new()),
        "LocalEngine",
        ExpansionDescriptor::default(),
    );
    tracker.initialize(true);
    assert!(tracker.is_requested());
    assert!(!tracker.is_active());

    for _ in 0..3 {
        tracker.shutdown();
        assert!(!tracker.is_active());
    }
}

#[test]
fn test_reinitialize_keeps_single_registration() {
    let engine = Arc::new(LocalEngine::new());
    let mut tracker = tracker_for(engine.clone(), true);
    tracker.initialize(true);

    assert_eq!(engine.namespaces(), vec!["placard".to_string()]);

    tracker.shutdown();
    assert!(engine.namespaces().is_empty());
}

#[test]
fn test_engine_disabled_after_install() {
    let engine = Arc::new(LocalEngine::new());
    engine.set_enabled(false);
    let tracker = tracker_for(engine, true);

    assert!(tracker.is_requested());
    assert!(!tracker.is_active());
    assert!(tracker.reason().to_string().contains("not enabled"));
}

#[test]
fn test_full_pipeline_with_local_engine() {
    let tracker = tracker_for(Arc::new(LocalEngine::new()), true);
    let mut set = PlaceholderSet::new();
    set.add("greeting", "Welcome back");

    let request = RenderRequest::new("<gold>{greeting}</gold>, <b>%actor_name%</b>!")
        .with_substitutions(set.build())
        .with_identity(Actor::new("Ada"));

    let pipeline = Pipeline::new(&tracker);
    assert_eq!(pipeline.resolve(&request), "<gold>Welcome back</gold>, <b>Ada</b>!");
    assert_eq!(pipeline.render_plain(&request), "Welcome back, Ada!");

    let text = pipeline.render(&request);
    assert_eq!(text.lines.len(), 1);
    assert_eq!(text.lines[0].spans.len(), 4);
}
