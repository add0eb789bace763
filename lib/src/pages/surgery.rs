// lib/src/pages/surgery.rs

use log::info;

use models::{Action, SurgeryConsultation, SurgeryStatus};
use rest_api::{DoctorApi, SurgeryApi, SurgeryFilter};
use security::Session;

use crate::doctor_directory::DoctorDirectory;
use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::pages::detail::check_action;
use crate::pages::list::ListPage;

/// Doctor-side queue of surgery consultation requests.
#[derive(Debug, Default)]
pub struct SurgeryPage {
    pub filter: SurgeryFilter,
    pub list: ListPage<SurgeryConsultation>,
}

impl SurgeryPage {
    pub fn new(filter: SurgeryFilter) -> Self {
        SurgeryPage { filter, list: ListPage::new() }
    }

    /// Most urgent first, then oldest request first.
    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: SurgeryApi + ?Sized,
    {
        let count = self.list.load(api.list_surgery_consultations(session, &self.filter)).await?;
        self.list.sort_by(|a, b| {
            b.urgency.rank().cmp(&a.urgency.rank()).then(a.created_at.cmp(&b.created_at))
        });
        Ok(count)
    }

    pub async fn load_for_doctor<A>(
        &mut self,
        api: &A,
        directory: &DoctorDirectory,
        session: &Session,
    ) -> PortalResult<usize>
    where
        A: SurgeryApi + DoctorApi + ?Sized,
    {
        let doctor_id = directory.require_doctor_id(api, session).await.map_err(|e| self.list.fail(e))?;
        self.filter.doctor_id = Some(doctor_id);
        self.load(api, session).await
    }

    pub async fn perform<A>(
        &mut self,
        api: &A,
        session: &Session,
        id: i64,
        action: Action,
        confirmed: bool,
    ) -> PortalResult<()>
    where
        A: SurgeryApi + ?Sized,
    {
        let row = self.list.find(id).ok_or(PortalError::NotLoaded(id))?;
        let to = check_action(&row.status, action, confirmed).map_err(|e| self.list.fail(e))?;
        api.update_surgery_status(session, id, SurgeryStatus::parse(to))
            .await
            .map_err(|e| self.list.fail(e.into()))?;
        info!("Surgery consultation {}: {}", id, action);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success(format!("Consultation #{}: {} done", id, action.label())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Lifecycle;
    use rest_api::MockSurgeryApi;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({
            "token": "t",
            "user": { "id": 6, "email": "doc@b.vn", "role": "DOCTOR", "doctorId": 3 }
        }))
        .unwrap()
    }

    fn consultation(id: i64, status: &str, urgency: &str) -> SurgeryConsultation {
        serde_json::from_value(json!({ "id": id, "status": status, "urgency": urgency, "doctorId": 3 })).unwrap()
    }

    #[tokio::test]
    async fn urgent_requests_come_first() {
        let mut api = MockSurgeryApi::new();
        api.expect_list_surgery_consultations()
            .returning(|_, _| Ok(vec![consultation(1, "PENDING", "LOW"), consultation(2, "PENDING", "CRITICAL")]));

        let mut page = SurgeryPage::default();
        page.load(&api, &session()).await.unwrap();
        assert_eq!(page.list.items().iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn approve_then_schedule() {
        let mut api = MockSurgeryApi::new();
        let mut loads = 0;
        api.expect_list_surgery_consultations().times(2).returning(move |_, _| {
            loads += 1;
            let status = if loads == 1 { "PENDING" } else { "APPROVED" };
            Ok(vec![consultation(4, status, "HIGH")])
        });
        api.expect_update_surgery_status()
            .withf(|_, id, status| *id == 4 && *status == SurgeryStatus::Approved)
            .times(1)
            .returning(|_, id, _| Ok(consultation(id, "APPROVED", "HIGH")));

        let mut page = SurgeryPage::default();
        page.load(&api, &session()).await.unwrap();
        assert!(matches!(
            page.perform(&api, &session(), 4, Action::Schedule, false).await,
            Err(PortalError::ActionNotAllowed { .. })
        ));
        page.perform(&api, &session(), 4, Action::Approve, false).await.unwrap();
        assert_eq!(page.list.items()[0].status.allowed_actions(), vec![Action::Schedule, Action::Cancel]);
    }
}
