// server/src/cli/config.rs

// Resolves everything a command needs: API settings, the HTTP client, the
// stored session and the role table.

use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use std::sync::Arc;

use models::Role;
use rest_api::{ApiConfig, RestClient, load_api_config};
use security::{AuthError, Portal, RolesConfig, Session, TokenStore};

use crate::cli::commands::CliArgs;

pub struct CliContext {
    pub api: ApiConfig,
    pub client: Arc<RestClient>,
    pub store: TokenStore,
    pub roles: RolesConfig,
}

impl CliContext {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let mut api = load_api_config(args.config.as_deref())?;
        if let Some(url) = &args.api_url {
            api.base_url = url.clone();
        }
        debug!("Using backend {}", api.normalized_base_url());

        let roles = match &args.roles {
            Some(path) => RolesConfig::from_yaml_file(&path.to_string_lossy())?,
            None => RolesConfig::default(),
        };
        let client = RestClient::new(&api).context("Failed to build HTTP client")?;
        let store = TokenStore::default_location()?;
        Ok(CliContext { api, client: Arc::new(client), store, roles })
    }

    /// The stored session, if it has not expired.
    pub fn session(&self) -> Result<Session> {
        let session = self.store.load()?.ok_or(AuthError::NotSignedIn)?;
        session.ensure_fresh(Utc::now())?;
        Ok(session)
    }

    /// The stored session, checked against the portals a command belongs to.
    pub fn enter(&self, portals: &[Portal]) -> Result<Session> {
        let session = self.session()?;
        check_portals(&self.roles, session.role(), portals)?;
        Ok(session)
    }
}

/// Passes when `role` may open at least one of `portals`.
pub fn check_portals(roles: &RolesConfig, role: &Role, portals: &[Portal]) -> Result<(), AuthError> {
    match portals.iter().find(|p| roles.can_enter(role, **p)) {
        Some(_) => Ok(()),
        None => {
            let portal = portals.first().copied().unwrap_or(Portal::Patient);
            Err(AuthError::PortalDenied { role: role.clone(), portal })
        }
    }
}
