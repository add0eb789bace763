// lib/src/pages/ambulances.rs

use log::info;

use models::{Ambulance, AmbulanceForm, FieldErrors};
use rest_api::{AmbulanceApi, AmbulanceFilter};
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::pages::list::ListPage;

/// Admin fleet table with its create/edit form.
#[derive(Debug, Default)]
pub struct AmbulancePage {
    pub filter: AmbulanceFilter,
    pub list: ListPage<Ambulance>,
    /// Inline form errors from the last save attempt.
    pub form_errors: Option<FieldErrors>,
}

impl AmbulancePage {
    pub fn new(filter: AmbulanceFilter) -> Self {
        AmbulancePage { filter, ..Default::default() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: AmbulanceApi + ?Sized,
    {
        self.list.load(api.list_ambulances(session, &self.filter)).await
    }

    /// Creates (`editing == None`) or updates an ambulance, then reloads the
    /// table.
    pub async fn save<A>(
        &mut self,
        api: &A,
        session: &Session,
        form: &AmbulanceForm,
        editing: Option<i64>,
    ) -> PortalResult<Ambulance>
    where
        A: AmbulanceApi + ?Sized,
    {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                self.form_errors = Some(errors.clone());
                return Err(PortalError::Validation(errors));
            }
        };
        self.form_errors = None;

        let saved = match editing {
            Some(id) => api.update_ambulance(session, id, &payload).await,
            None => api.create_ambulance(session, &payload).await,
        }
        .map_err(|e| self.list.fail(e.into()))?;

        info!("Saved ambulance {} ({})", saved.id, saved.license_plate);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success(format!("Ambulance {} saved", saved.license_plate)));
        Ok(saved)
    }

    pub async fn delete<A>(&mut self, api: &A, session: &Session, id: i64) -> PortalResult<()>
    where
        A: AmbulanceApi + ?Sized,
    {
        api.delete_ambulance(session, id).await.map_err(|e| self.list.fail(e.into()))?;
        self.list.remove(id);
        self.list.set_notice(Notice::success("Ambulance removed"));
        Ok(())
    }
}
