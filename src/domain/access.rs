use super::ports::RolePreferences;
use crate::error::{PagosError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Role {
    Admin,
    Autorizador,
    #[default]
    Solicitante,
}

impl Role {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Autorizador => "autorizador",
            Self::Solicitante => "solicitante",
        }
    }

    /// Maps a stored tag to a role. Missing or unknown tags fall back to `Solicitante`.
    pub fn from_stored(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn permissions(&self) -> Permissions {
        match self {
            Self::Admin => Permissions {
                can_create: true,
                can_authorize: true,
                can_pay: true,
                can_delete: true,
            },
            Self::Autorizador => Permissions {
                can_create: true,
                can_authorize: true,
                can_pay: false,
                can_delete: true,
            },
            Self::Solicitante => Permissions {
                can_create: true,
                can_authorize: false,
                can_pay: false,
                can_delete: false,
            },
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = PagosError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "autorizador" => Ok(Self::Autorizador),
            "solicitante" => Ok(Self::Solicitante),
            other => Err(PagosError::InvalidValue(format!("unknown role '{other}'"))),
        }
    }
}

/// Immutable capability snapshot for one role.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Permissions {
    pub can_create: bool,
    pub can_authorize: bool,
    pub can_pay: bool,
    /// Deleting is tied to the authorize capability.
    pub can_delete: bool,
}

impl Permissions {
    pub fn role_label(&self) -> &'static str {
        if self.can_pay {
            "Administrador"
        } else if self.can_authorize {
            "Autorizador"
        } else {
            "Solicitante"
        }
    }

    pub fn active(&self) -> Vec<&'static str> {
        let mut active = Vec::new();
        if self.can_create {
            active.push("Solicitar");
        }
        if self.can_authorize {
            active.push("Autorizar");
        }
        if self.can_pay {
            active.push("Pagar");
        }
        active
    }
}

/// Derives permissions from the stored role on every query.
pub struct AccessPolicy<P: RolePreferences> {
    prefs: P,
}

impl<P: RolePreferences> AccessPolicy<P> {
    pub fn new(prefs: P) -> Self {
        Self { prefs }
    }

    pub fn role(&self) -> Result<Role> {
        let stored = self.prefs.load_role()?;
        Ok(Role::from_stored(stored.as_deref()))
    }

    pub fn permissions(&self) -> Result<Permissions> {
        Ok(self.role()?.permissions())
    }

    pub fn set_role(&self, role: Role) -> Result<Permissions> {
        self.prefs.save_role(role.tag())?;
        Ok(role.permissions())
    }

    /// Fails with `Forbidden` unless `allowed` holds for the current role.
    pub fn require(&self, action: &'static str, allowed: fn(&Permissions) -> bool) -> Result<()> {
        let role = self.role()?;
        if allowed(&role.permissions()) {
            Ok(())
        } else {
            Err(PagosError::Forbidden {
                role: role.tag().to_string(),
                action,
            })
        }
    }
}
