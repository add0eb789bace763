// security/src/roles.rs

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use models::{Role, WireStatus};

use crate::AuthError;

pub mod perms {
    pub const SUPERUSER: &str = "superuser";
    pub const AMBULANCES_WRITE: &str = "ambulances:write";
    pub const USERS_MANAGE_ROLES: &str = "users:manage-roles";
    pub const LEAVE_DECIDE: &str = "leave:decide";
    pub const LEAVE_REQUEST: &str = "leave:request";
    pub const REVIEWS_MODERATE: &str = "reviews:moderate";
    pub const REVIEWS_WRITE: &str = "reviews:write";
    pub const EMERGENCIES_RESPOND: &str = "emergencies:respond";
    pub const EMERGENCIES_CALL: &str = "emergencies:call";
    pub const BOOKINGS_RESPOND: &str = "bookings:respond";
    pub const BOOKINGS_CREATE: &str = "bookings:create";
    pub const APPOINTMENTS_MANAGE: &str = "appointments:manage";
    pub const SURGERY_REVIEW: &str = "surgery:review";
    pub const SURGERY_REQUEST: &str = "surgery:request";
    pub const PHARMACY_ORDER: &str = "pharmacy:order";
}

/// Top-level route subtree guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Doctor,
    Driver,
    Patient,
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Portal::Admin => write!(f, "admin"),
            Portal::Doctor => write!(f, "doctor"),
            Portal::Driver => write!(f, "driver"),
            Portal::Patient => write!(f, "patient"),
        }
    }
}

impl FromStr for Portal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Portal::Admin),
            "doctor" => Ok(Portal::Doctor),
            "driver" => Ok(Portal::Driver),
            "patient" => Ok(Portal::Patient),
            _ => Err(anyhow!("Unknown portal: {}. Available: admin, doctor, driver, patient", s)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RoleConfig {
    #[serde(default)]
    pub portals: Vec<Portal>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RolesConfig {
    /// Keyed by wire role name (`ADMIN`, `DOCTOR`, ...).
    pub roles: HashMap<String, RoleConfig>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        let entry = |portals: &[Portal], permissions: &[&str]| RoleConfig {
            portals: portals.to_vec(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        };
        let mut roles = HashMap::new();
        roles.insert("ADMIN".to_string(), entry(&[Portal::Admin], &[perms::SUPERUSER]));
        roles.insert(
            "DOCTOR".to_string(),
            entry(
                &[Portal::Doctor],
                &[perms::APPOINTMENTS_MANAGE, perms::SURGERY_REVIEW, perms::LEAVE_REQUEST],
            ),
        );
        roles.insert(
            "DRIVER".to_string(),
            entry(&[Portal::Driver], &[perms::EMERGENCIES_RESPOND, perms::BOOKINGS_RESPOND]),
        );
        roles.insert(
            "PATIENT".to_string(),
            entry(
                &[Portal::Patient],
                &[
                    perms::EMERGENCIES_CALL,
                    perms::BOOKINGS_CREATE,
                    perms::REVIEWS_WRITE,
                    perms::SURGERY_REQUEST,
                    perms::PHARMACY_ORDER,
                ],
            ),
        );
        RolesConfig { roles }
    }
}

impl RolesConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut config: RolesConfig = serde_yaml::from_str(content)?;
        config.roles = config
            .roles
            .into_iter()
            .map(|(name, cfg)| (name.trim().to_ascii_uppercase(), cfg))
            .collect();
        Ok(config)
    }

    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roles config {}", path))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse roles config {}", path))
    }

    pub fn get_role_config(&self, role: &Role) -> Option<&RoleConfig> {
        self.roles.get(role.as_wire())
    }

    pub fn has_permission(&self, role: &Role, permission_name: &str) -> bool {
        self.get_role_config(role).map_or(false, |role_cfg| {
            role_cfg.permissions.iter().any(|p| p == permission_name || p == perms::SUPERUSER)
        })
    }

    pub fn can_enter(&self, role: &Role, portal: Portal) -> bool {
        self.get_role_config(role)
            .map_or(false, |role_cfg| role_cfg.portals.contains(&portal))
    }

    pub fn guard(&self, role: &Role, portal: Portal) -> Result<(), AuthError> {
        if self.can_enter(role, portal) {
            Ok(())
        } else {
            Err(AuthError::PortalDenied { role: role.clone(), portal })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_gate_each_role_to_its_portal() {
        let config = RolesConfig::default();
        assert!(config.can_enter(&Role::Driver, Portal::Driver));
        assert!(!config.can_enter(&Role::Driver, Portal::Admin));
        assert!(config.guard(&Role::Patient, Portal::Doctor).is_err());
        assert!(!config.can_enter(&Role::Unknown("NURSE".into()), Portal::Patient));
    }

    #[test]
    fn superuser_grants_everything() {
        let config = RolesConfig::default();
        assert!(config.has_permission(&Role::Admin, perms::USERS_MANAGE_ROLES));
        assert!(!config.has_permission(&Role::Doctor, perms::USERS_MANAGE_ROLES));
        assert!(config.has_permission(&Role::Doctor, perms::LEAVE_REQUEST));
    }

    #[test]
    fn yaml_override_normalises_role_names() {
        let yaml = r#"
roles:
  nurse:
    portals: [doctor]
    permissions: ["appointments:manage"]
"#;
        let config = RolesConfig::from_yaml_str(yaml).unwrap();
        let nurse = Role::parse("NURSE");
        assert!(config.can_enter(&nurse, Portal::Doctor));
        assert!(config.has_permission(&nurse, perms::APPOINTMENTS_MANAGE));
        assert!(!config.can_enter(&Role::Admin, Portal::Admin));
    }
}
