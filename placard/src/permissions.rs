//! Permission nodes checked by command authorization

use std::fmt;
use std::str::FromStr;

/// Every permission node placard knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    UserHelp,
    UserRender,
    AdminReload,
    AdminStatus,
}

impl Permission {
    pub fn all() -> &'static [Permission] {
        &[
            Permission::UserHelp,
            Permission::UserRender,
            Permission::AdminReload,
            Permission::AdminStatus,
        ]
    }

    /// Full dotted node string
    pub fn node(&self) -> &'static str {
        match self {
            Self::UserHelp => "placard.user.help",
            Self::UserRender => "placard.user.render",
            Self::AdminReload => "placard.admin.reload",
            Self::AdminStatus => "placard.admin.status",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::AdminReload | Self::AdminStatus)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.node() == s)
            .ok_or_else(|| format!("Unknown permission node: {}", s))
    }
}
