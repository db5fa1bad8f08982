//! Render pipeline
//!
//! static substitution -> external expansion (when active) -> markup.

use ratatui::text::Text;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expansion::expand;
use crate::integration::{Actor, IntegrationTracker};
use crate::richtext;
use crate::substitution::{SubstitutionMap, apply_static};

/// One unit of rendering work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub template: Option<String>,
    #[serde(default)]
    pub substitutions: SubstitutionMap,
    /// Present only when per-actor expansion is wanted
    pub identity: Option<Actor>,
}

impl RenderRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn with_substitutions(mut self, substitutions: SubstitutionMap) -> Self {
        self.substitutions = substitutions;
        self
    }

    pub fn with_identity(mut self, identity: Actor) -> Self {
        self.identity = Some(identity);
        self
    }
}

/// Runs render requests against an explicitly passed tracker
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    tracker: &'a IntegrationTracker,
}

impl<'a> Pipeline<'a> {
    pub fn new(tracker: &'a IntegrationTracker) -> Self {
        Self { tracker }
    }

    /// Substitute and expand, without parsing markup
    pub fn resolve(&self, request: &RenderRequest) -> String {
        debug!(
            entries = request.substitutions.len(),
            has_identity = request.identity.is_some(),
            "Pipeline::resolve: called"
        );
        let substituted = apply_static(request.template.as_deref(), &request.substitutions);
        expand(self.tracker, &substituted, request.identity.as_ref())
    }

    /// Full pipeline into styled text
    pub fn render(&self, request: &RenderRequest) -> Text<'static> {
        let resolved = self.resolve(request);
        richtext::render(Some(resolved.as_str()))
    }

    /// Full pipeline flattened to plain text
    pub fn render_plain(&self, request: &RenderRequest) -> String {
        let resolved = self.resolve(request);
        richtext::render_plain(Some(resolved.as_str()))
    }
}
