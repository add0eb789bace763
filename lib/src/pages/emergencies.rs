// lib/src/pages/emergencies.rs

use std::cmp::Ordering;

use log::info;

use models::{Emergency, NewEmergency, WireStatus};
use rest_api::{EmergencyApi, EmergencyFilter};
use security::Session;

use crate::errors::PortalResult;
use crate::notice::Notice;
use crate::pages::list::ListPage;

/// Most urgent first, newest first within a priority.
pub fn triage_order(a: &Emergency, b: &Emergency) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

#[derive(Debug, Default)]
pub struct EmergencyListPage {
    pub filter: EmergencyFilter,
    pub list: ListPage<Emergency>,
}

impl EmergencyListPage {
    pub fn new(filter: EmergencyFilter) -> Self {
        EmergencyListPage { filter, list: ListPage::new() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: EmergencyApi + ?Sized,
    {
        let count = self.list.load(api.list_emergencies(session, &self.filter)).await?;
        self.list.sort_by(triage_order);
        Ok(count)
    }

    /// The driver portal's own feed.
    pub async fn load_assigned<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: EmergencyApi + ?Sized,
    {
        let count = self.list.load(api.my_driver_emergencies(session)).await?;
        self.list.sort_by(triage_order);
        Ok(count)
    }

    pub fn items(&self) -> &[Emergency] {
        self.list.items()
    }
}

/// Patient-side emergency call. Invalid input never reaches the server.
pub async fn report_emergency<A>(api: &A, session: &Session, call: &NewEmergency) -> PortalResult<(Emergency, Notice)>
where
    A: EmergencyApi + ?Sized,
{
    call.validate()?;
    let created = api.create_emergency(session, call).await?;
    info!("Emergency {} reported ({})", created.id, created.priority.as_wire());
    let notice = Notice::success(format!("Emergency #{} sent, help is on the way", created.id));
    Ok((created, notice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PortalError;
    use models::{EmergencyStatus, Priority};
    use rest_api::MockEmergencyApi;
    use serde_json::json;

    fn emergency(id: i64, priority: &str, created: &str) -> Emergency {
        serde_json::from_value(json!({ "id": id, "status": "PENDING", "priority": priority, "createdAt": created }))
            .unwrap()
    }

    fn session() -> Session {
        serde_json::from_value(json!({ "token": "t", "user": { "id": 1, "email": "a@b.vn", "role": "ADMIN" } }))
            .unwrap()
    }

    #[tokio::test]
    async fn list_is_sorted_by_priority_then_recency() {
        let mut api = MockEmergencyApi::new();
        api.expect_list_emergencies().returning(|_, _| {
            Ok(vec![
                emergency(1, "LOW", "2024-07-01T08:00:00"),
                emergency(2, "CRITICAL", "2024-07-01T07:00:00"),
                emergency(3, "CRITICAL", "2024-07-01T09:00:00"),
                emergency(4, "SOMETHING_NEW", "2024-07-01T10:00:00"),
            ])
        });
        let mut page = EmergencyListPage::default();
        page.load(&api, &session()).await.unwrap();
        let ids: Vec<i64> = page.items().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
        assert_eq!(page.items()[0].status, EmergencyStatus::Pending);
    }

    #[tokio::test]
    async fn invalid_call_is_rejected_locally() {
        let api = MockEmergencyApi::new();
        let call = NewEmergency {
            patient_name: String::new(),
            patient_phone: "0909".into(),
            address: "1 Tran Hung Dao".into(),
            latitude: None,
            longitude: None,
            description: None,
            priority: Priority::High,
            clinic_id: None,
        };
        let err = report_emergency(&api, &session(), &call).await.unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }
}
