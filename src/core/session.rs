//! Session and role-based gating
//!
//! Credentials are a fixed mock table and the gate is advisory: it decides
//! which commands run, nothing more.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::core::entity::{Labeled, Tone};
use crate::core::error::{AeroError, AeroResult};

/// Permission level of a user, ordered from least to most privileged
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum AccessLevel {
    #[serde(rename = "OPERADOR")]
    #[value(alias = "operador")]
    Operator,
    #[serde(rename = "ENGENHEIRO")]
    #[value(alias = "engenheiro")]
    Engineer,
    #[serde(rename = "ADMINISTRADOR")]
    #[value(alias = "administrador", alias = "admin")]
    Administrator,
}

impl AccessLevel {
    /// Position in the hierarchy (administrator 3, engineer 2, operator 1)
    pub fn rank(&self) -> u8 {
        match self {
            AccessLevel::Operator => 1,
            AccessLevel::Engineer => 2,
            AccessLevel::Administrator => 3,
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Operator
    }
}

impl Labeled for AccessLevel {
    const ALL: &'static [Self] = &[
        AccessLevel::Administrator,
        AccessLevel::Engineer,
        AccessLevel::Operator,
    ];

    fn label(&self) -> &'static str {
        match self {
            AccessLevel::Administrator => "ADMINISTRADOR",
            AccessLevel::Engineer => "ENGENHEIRO",
            AccessLevel::Operator => "OPERADOR",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            AccessLevel::Administrator => Tone::Bad,
            AccessLevel::Engineer => Tone::Active,
            AccessLevel::Operator => Tone::Muted,
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| <AccessLevel as ValueEnum>::from_str(s, true).ok())
            .ok_or_else(|| format!("Unknown access level: {}", s))
    }
}

/// Functional areas, each visible from a minimum level up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Aircraft,
    Parts,
    Stages,
    Tests,
    Reports,
    Administration,
}

impl Module {
    pub const ALL: [Module; 6] = [
        Module::Aircraft,
        Module::Parts,
        Module::Stages,
        Module::Tests,
        Module::Reports,
        Module::Administration,
    ];

    pub fn min_level(&self) -> AccessLevel {
        match self {
            Module::Aircraft => AccessLevel::Engineer,
            Module::Parts => AccessLevel::Operator,
            Module::Stages => AccessLevel::Operator,
            Module::Tests => AccessLevel::Engineer,
            Module::Reports => AccessLevel::Engineer,
            Module::Administration => AccessLevel::Administrator,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Module::Aircraft => "aircraft",
            Module::Parts => "parts",
            Module::Stages => "production stages",
            Module::Tests => "tests",
            Module::Reports => "reports",
            Module::Administration => "user administration",
        }
    }
}

/// Actions that are gated independently of module visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Create/edit aircraft, parts and stages; record tests; generate reports
    Manage,
    /// Start and finish production stages
    ExecuteStage,
    /// Create and edit employees
    AdministerUsers,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::Manage,
        Permission::ExecuteStage,
        Permission::AdministerUsers,
    ];

    pub fn allows(&self, level: AccessLevel) -> bool {
        match self {
            Permission::Manage => {
                matches!(level, AccessLevel::Administrator | AccessLevel::Engineer)
            }
            // Administrators supervise stages but do not run them
            Permission::ExecuteStage => {
                matches!(level, AccessLevel::Engineer | AccessLevel::Operator)
            }
            Permission::AdministerUsers => level == AccessLevel::Administrator,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::Manage => "manage production records",
            Permission::ExecuteStage => "execute production stages",
            Permission::AdministerUsers => "administer users",
        }
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub level: AccessLevel,
}

/// Mock credential table: (username, password, user)
const CREDENTIALS: &[(&str, &str, u32, &str, AccessLevel)] = &[
    ("admin", "123", 1, "Adm. Global", AccessLevel::Administrator),
    ("engenheiro", "123", 2, "Eng. Chefe", AccessLevel::Engineer),
    ("operador", "123", 3, "Op. Produção", AccessLevel::Operator),
];

/// Holds the current user, if any
#[derive(Debug, Default, Clone)]
pub struct Session {
    user: Option<User>,
    latency: Duration,
}

impl Session {
    /// Create a session whose login waits `latency` before answering
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            user: None,
            latency,
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> AeroResult<&User> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let found = CREDENTIALS
            .iter()
            .find(|(u, p, ..)| *u == username && *p == password);

        match found {
            Some(&(_, _, id, name, level)) => {
                info!(user = name, level = %level, "logged in");
                Ok(self.user.insert(User {
                    id,
                    name: name.to_string(),
                    level,
                }))
            }
            None => {
                warn!(user = username, "login rejected");
                Err(AeroError::InvalidCredentials)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.name, "logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The current user, or `NotAuthenticated`
    pub fn require_user(&self) -> AeroResult<&User> {
        self.user.as_ref().ok_or(AeroError::NotAuthenticated)
    }

    pub fn can_access(&self, module: Module) -> bool {
        self.user
            .as_ref()
            .map_or(false, |u| u.level.rank() >= module.min_level().rank())
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.user
            .as_ref()
            .map_or(false, |u| permission.allows(u.level))
    }

    /// Fail unless the current user may open `module`
    pub fn require_module(&self, module: Module) -> AeroResult<&User> {
        let user = self.require_user()?;
        if user.level.rank() >= module.min_level().rank() {
            Ok(user)
        } else {
            Err(AeroError::PermissionDenied {
                user: user.name.clone(),
                level: user.level.to_string(),
                action: format!("open {}", module.name()),
            })
        }
    }

    /// Fail unless the current user holds `permission`
    pub fn require(&self, permission: Permission) -> AeroResult<&User> {
        let user = self.require_user()?;
        if permission.allows(user.level) {
            Ok(user)
        } else {
            Err(AeroError::PermissionDenied {
                user: user.name.clone(),
                level: user.level.to_string(),
                action: permission.description().to_string(),
            })
        }
    }
}
