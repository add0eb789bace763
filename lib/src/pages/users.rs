// lib/src/pages/users.rs

use log::{info, warn};

use models::{Role, User};
use rest_api::UserApi;
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::pages::list::ListPage;

#[derive(Debug, Clone, PartialEq)]
pub enum RoleChangeOutcome {
    /// The selected role equals the current one; nothing was sent.
    Unchanged,
    Updated(User),
}

/// Admin user table with in-place role editing. The new role is shown at
/// once and put back if the server refuses it.
#[derive(Debug, Default)]
pub struct RoleEditor {
    pub list: ListPage<User>,
}

impl RoleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: UserApi + ?Sized,
    {
        self.list.load(api.list_users(session)).await
    }

    pub fn users(&self) -> &[User] {
        self.list.items()
    }

    pub async fn change_role<A>(
        &mut self,
        api: &A,
        session: &Session,
        user_id: i64,
        role: Role,
    ) -> PortalResult<RoleChangeOutcome>
    where
        A: UserApi + ?Sized,
    {
        let previous = {
            let user = self.list.find_mut(user_id).ok_or(PortalError::NotLoaded(user_id))?;
            if user.role == role {
                return Ok(RoleChangeOutcome::Unchanged);
            }
            std::mem::replace(&mut user.role, role.clone())
        };

        match api.update_user_role(session, user_id, role.clone()).await {
            Ok(updated) => {
                info!("User {} role {} -> {}", user_id, previous, updated.role);
                self.list.replace(updated.clone());
                self.list.set_notice(Notice::success(format!("Role updated to {}", updated.role)));
                Ok(RoleChangeOutcome::Updated(updated))
            }
            Err(err) => {
                warn!("Role change for user {} failed, restoring {}", user_id, previous);
                if let Some(user) = self.list.find_mut(user_id) {
                    user.role = previous;
                }
                Err(self.list.fail(err.into()))
            }
        }
    }
}
