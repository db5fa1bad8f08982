//! Integration state and diagnostics

use std::fmt;

use super::engine::EngineHandle;

/// Why the integration is (or is not) active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityReason {
    Uninitialized,
    DisabledByConfig,
    EngineNotFound { name: String },
    EngineNotEnabled { name: String },
    RegistrationRefused { name: String, message: String },
    Disabled { message: String },
    ShutDown,
    Active { name: String },
}

impl fmt::Display for AvailabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "integration not initialized"),
            Self::DisabledByConfig => write!(f, "integration disabled via configuration"),
            Self::EngineNotFound { name } => write!(f, "{} not found, integration disabled", name),
            Self::EngineNotEnabled { name } => {
                write!(f, "{} is installed but not enabled, integration disabled", name)
            }
            Self::RegistrationRefused { name, message } => {
                write!(f, "{} refused registration ({}), integration disabled", name, message)
            }
            Self::Disabled { message } => write!(f, "integration disabled: {}", message),
            Self::ShutDown => write!(f, "integration shut down"),
            Self::Active { name } => write!(f, "{} found and enabled, integration active", name),
        }
    }
}

/// Tri-state availability record.
///
/// `active` implies `requested`, and `engine` is present exactly when `active`.
/// The fields are private so only the tracker's transitions can touch them.
#[derive(Clone)]
pub struct IntegrationState {
    requested: bool,
    active: bool,
    engine: Option<EngineHandle>,
    reason: AvailabilityReason,
}

impl IntegrationState {
    pub(crate) fn inactive(requested: bool, reason: AvailabilityReason) -> Self {
        Self {
            requested,
            active: false,
            engine: None,
            reason,
        }
    }

    /// `name` is the name the engine was looked up under
    pub(crate) fn active(engine: EngineHandle, name: String) -> Self {
        Self {
            requested: true,
            active: true,
            engine: Some(engine),
            reason: AvailabilityReason::Active { name },
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn engine(&self) -> Option<&EngineHandle> {
        self.engine.as_ref()
    }

    pub fn reason(&self) -> &AvailabilityReason {
        &self.reason
    }
}

impl Default for IntegrationState {
    fn default() -> Self {
        Self::inactive(false, AvailabilityReason::Uninitialized)
    }
}

impl fmt::Debug for IntegrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationState")
            .field("requested", &self.requested)
            .field("active", &self.active)
            .field("engine", &self.engine.is_some())
            .field("reason", &self.reason)
            .finish()
    }
}
