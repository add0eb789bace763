// lib/src/pages/detail.rs

// Detail view for records that move through the shared lifecycle table.
// Buttons come from the table; the server decides what actually happens, so
// every successful action is followed by a refetch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use models::lifecycle::{self, Lifecycle};
use models::{Action, AmbulanceBooking, BookingStatus, Emergency, EmergencyStatus, Identified};
use rest_api::{ApiResult, BookingApi, EmergencyApi};
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::polling::{PollState, PollingHub, Subscription};

/// Record carrying a lifecycle status.
pub trait Tracked: Identified + Clone + Send + Sync + 'static {
    type Status: Lifecycle + Clone + Send + Sync;

    /// Prefix used for poll keys and notices.
    const NAME: &'static str;

    fn status(&self) -> &Self::Status;
}

impl Tracked for Emergency {
    type Status = EmergencyStatus;
    const NAME: &'static str = "emergency";

    fn status(&self) -> &EmergencyStatus {
        &self.status
    }
}

impl Tracked for AmbulanceBooking {
    type Status = BookingStatus;
    const NAME: &'static str = "booking";

    fn status(&self) -> &BookingStatus {
        &self.status
    }
}

/// Fetch-by-id plus the status-changing calls for one kind of record.
#[async_trait]
pub trait TransitionApi<E: Tracked>: Send + Sync {
    async fn fetch(&self, session: &Session, id: i64) -> ApiResult<E>;

    /// Runs `action`; `to` is the wire status the table expects afterwards.
    async fn transition(&self, session: &Session, id: i64, action: Action, to: &'static str) -> ApiResult<E>;
}

#[async_trait]
impl<T: EmergencyApi + ?Sized> TransitionApi<Emergency> for T {
    async fn fetch(&self, session: &Session, id: i64) -> ApiResult<Emergency> {
        self.get_emergency(session, id).await
    }

    async fn transition(&self, session: &Session, id: i64, action: Action, to: &'static str) -> ApiResult<Emergency> {
        match action {
            Action::Accept => self.accept_emergency(session, id).await,
            _ => self.update_emergency_status(session, id, EmergencyStatus::parse(to)).await,
        }
    }
}

#[async_trait]
impl<T: BookingApi + ?Sized> TransitionApi<AmbulanceBooking> for T {
    async fn fetch(&self, session: &Session, id: i64) -> ApiResult<AmbulanceBooking> {
        self.get_booking(session, id).await
    }

    async fn transition(
        &self,
        session: &Session,
        id: i64,
        action: Action,
        to: &'static str,
    ) -> ApiResult<AmbulanceBooking> {
        match action {
            Action::Accept => self.accept_booking(session, id).await,
            _ => self.update_booking_status(session, id, BookingStatus::parse(to)).await,
        }
    }
}

/// Checks `action` against the last fetched `status` and returns the target
/// wire status.
pub fn check_action<S: Lifecycle>(status: &S, action: Action, confirmed: bool) -> PortalResult<&'static str> {
    let to = lifecycle::target(S::KIND, action, status.as_wire()).ok_or_else(|| {
        PortalError::ActionNotAllowed { kind: S::KIND, action, status: status.label().into_owned() }
    })?;
    if lifecycle::requires_confirmation(S::KIND, action) && !confirmed {
        return Err(PortalError::ConfirmationRequired { action });
    }
    Ok(to)
}

#[derive(Debug, Clone)]
pub struct DetailPage<E> {
    id: i64,
    record: Option<E>,
    notice: Option<Notice>,
    busy: bool,
}

impl<E: Tracked> DetailPage<E> {
    pub fn new(id: i64) -> Self {
        DetailPage { id, record: None, notice: None, busy: false }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn record(&self) -> Option<&E> {
        self.record.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<&E>
    where
        A: TransitionApi<E> + ?Sized,
    {
        match api.fetch(session, self.id).await {
            Ok(record) => Ok(self.record.insert(record)),
            Err(err) => {
                let err = PortalError::from(err);
                self.notice = Some(Notice::from_error(&err));
                Err(err)
            }
        }
    }

    /// Buttons to show for the last fetched status.
    pub fn actions(&self) -> Vec<Action> {
        self.record.as_ref().map(|r| r.status().allowed_actions()).unwrap_or_default()
    }

    /// Performs `action` and refetches. Destructive actions need `confirmed`.
    pub async fn perform<A>(&mut self, api: &A, session: &Session, action: Action, confirmed: bool) -> PortalResult<&E>
    where
        A: TransitionApi<E> + ?Sized,
    {
        if self.record.is_none() {
            self.load(api, session).await?;
        }
        let to = match self.record.as_ref().map(|r| check_action(r.status(), action, confirmed)) {
            Some(Ok(to)) => to,
            Some(Err(err)) => {
                self.notice = Some(Notice::from_error(&err));
                return Err(err);
            }
            None => return Err(PortalError::NotLoaded(self.id)),
        };

        self.busy = true;
        let result = api.transition(session, self.id, action, to).await;
        self.busy = false;
        if let Err(err) = result {
            let err = PortalError::from(err);
            self.notice = Some(Notice::from_error(&err));
            return Err(err);
        }
        info!("{} {}: {} done", E::NAME, self.id, action);
        self.notice = Some(Notice::success(format!("{} done", action.label())));
        self.load(api, session).await
    }

    /// Starts, or joins, the background refresh for this record.
    pub fn poll<A>(&self, hub: &PollingHub<E>, api: Arc<A>, session: &Session, interval: Duration) -> Subscription<E>
    where
        A: TransitionApi<E> + 'static,
    {
        let id = self.id;
        let session = session.clone();
        hub.subscribe(format!("{}:{}", E::NAME, id), interval, move || {
            let api = Arc::clone(&api);
            let session = session.clone();
            async move { api.fetch(&session, id).await.map_err(PortalError::from) }
        })
    }

    /// Takes the latest polled copy, if any. Poll failures stay silent.
    pub fn apply_poll(&mut self, state: &PollState<E>) {
        if let Some(value) = &state.value {
            self.record = Some(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::{ApiError, MockBookingApi, MockEmergencyApi};

    fn emergency(id: i64, status: EmergencyStatus) -> Emergency {
        serde_json::from_value(serde_json::json!({ "id": id, "status": status })).unwrap()
    }

    fn booking(id: i64, status: BookingStatus) -> AmbulanceBooking {
        serde_json::from_value(serde_json::json!({ "id": id, "status": status })).unwrap()
    }

    fn session() -> Session {
        serde_json::from_value(serde_json::json!({
            "token": "tok",
            "user": { "id": 4, "email": "driver@clinic.vn", "role": "DRIVER" }
        }))
        .unwrap()
    }

    #[test]
    fn table_decides_the_check() {
        assert_eq!(check_action(&EmergencyStatus::Assigned, Action::MarkEnRoute, false).unwrap(), "EN_ROUTE");
        assert!(matches!(
            check_action(&EmergencyStatus::Arrived, Action::Complete, false),
            Err(PortalError::ConfirmationRequired { action: Action::Complete })
        ));
        assert!(matches!(
            check_action(&BookingStatus::Completed, Action::Cancel, true),
            Err(PortalError::ActionNotAllowed { .. })
        ));
    }

    #[tokio::test]
    async fn action_then_refetch() {
        let mut api = MockEmergencyApi::new();
        let mut fetches = 0;
        api.expect_get_emergency().times(2).returning(move |_, id| {
            fetches += 1;
            let status = if fetches == 1 { EmergencyStatus::Assigned } else { EmergencyStatus::EnRoute };
            Ok(emergency(id, status))
        });
        api.expect_update_emergency_status()
            .withf(|_, id, status| *id == 5 && *status == EmergencyStatus::EnRoute)
            .times(1)
            .returning(|_, id, status| Ok(emergency(id, status)));

        let mut page: DetailPage<Emergency> = DetailPage::new(5);
        page.load(&api, &session()).await.unwrap();
        assert_eq!(page.actions(), vec![Action::Accept, Action::MarkEnRoute, Action::Cancel]);

        let record = page.perform(&api, &session(), Action::MarkEnRoute, false).await.unwrap();
        assert_eq!(record.status, EmergencyStatus::EnRoute);
        assert_eq!(page.actions(), vec![Action::MarkArrived]);
    }

    #[tokio::test]
    async fn blocked_action_never_reaches_the_server() {
        let mut api = MockBookingApi::new();
        api.expect_get_booking().returning(|_, id| Ok(booking(id, BookingStatus::Pending)));

        let mut page: DetailPage<AmbulanceBooking> = DetailPage::new(9);
        let err = page.perform(&api, &session(), Action::Complete, true).await.unwrap_err();
        assert!(matches!(err, PortalError::ActionNotAllowed { .. }));
        assert!(page.notice().is_some());
    }

    #[tokio::test]
    async fn accept_uses_the_accept_endpoint_and_failure_keeps_state() {
        let mut api = MockBookingApi::new();
        api.expect_get_booking().times(1).returning(|_, id| Ok(booking(id, BookingStatus::Pending)));
        api.expect_accept_booking()
            .times(1)
            .returning(|_, _| Err(ApiError::Forbidden { message: "Belongs to another clinic".into() }));

        let mut page: DetailPage<AmbulanceBooking> = DetailPage::new(2);
        page.load(&api, &session()).await.unwrap();
        let err = page.perform(&api, &session(), Action::Accept, false).await.unwrap_err();
        assert_eq!(err.kind(), rest_api::ErrorKind::Permission);
        assert_eq!(page.record().map(|b| b.status.clone()), Some(BookingStatus::Pending));
        assert!(!page.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn detail_polls_every_interval() {
        let mut api = MockEmergencyApi::new();
        api.expect_get_emergency().returning(|_, id| Ok(emergency(id, EmergencyStatus::Arrived)));
        let api = Arc::new(api);

        let hub = PollingHub::new();
        let mut page: DetailPage<Emergency> = DetailPage::new(11);
        let mut sub = page.poll(&hub, api, &session(), Duration::from_secs(10));
        assert!(sub.changed().await);
        page.apply_poll(&sub.state());
        assert_eq!(page.actions(), vec![Action::Complete]);
        assert_eq!(hub.active_keys(), vec!["emergency:11".to_string()]);
    }
}
