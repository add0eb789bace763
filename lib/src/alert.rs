// lib/src/alert.rs

// Incoming-emergency alert for drivers: watches the driver's emergency feed and
// raises one interrupting alert per newly seen actionable emergency.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info};

use models::Emergency;
use models::lifecycle::emergency::is_actionable;
use rest_api::EmergencyApi;
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::polling::{PollingHub, Subscription};

/// Where the UI should go after an alert is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    EmergencyDetail(i64),
}

/// Pure alert state. Ids are remembered once shown, so an emergency alerts at
/// most once; others that arrive while an alert is open wait their turn.
/// Remembered ids are forgotten once they drop out of the driver's feed.
#[derive(Debug, Default)]
pub struct AlertTracker {
    shown: HashSet<i64>,
    visible: Option<Emergency>,
    latest: Vec<Emergency>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one poll result. Returns the emergency to alert about when a new
    /// alert becomes visible.
    pub fn observe(&mut self, emergencies: &[Emergency]) -> Option<Emergency> {
        self.latest = emergencies.to_vec();
        self.shown.retain(|id| emergencies.iter().any(|e| e.id == *id));
        if let Some(current) = &self.visible {
            match emergencies.iter().find(|e| e.id == current.id) {
                Some(fresh) if is_actionable(&fresh.status) => {
                    self.visible = Some(fresh.clone());
                    return None;
                }
                _ => {
                    debug!("Emergency {} is no longer actionable, closing its alert", current.id);
                    self.visible = None;
                }
            }
        }
        self.raise_next()
    }

    /// Hides the alert without acting on it; the same id will not alert again.
    pub fn dismiss(&mut self) -> Option<Emergency> {
        self.visible = None;
        self.raise_next()
    }

    /// Called once the visible emergency has been accepted.
    pub fn accepted(&mut self) -> Option<Emergency> {
        self.dismiss()
    }

    /// Marks `id` as handled elsewhere so it never raises an alert.
    pub fn acknowledge(&mut self, id: i64) {
        self.shown.insert(id);
    }

    pub fn visible(&self) -> Option<&Emergency> {
        self.visible.as_ref()
    }

    pub fn has_shown(&self, id: i64) -> bool {
        self.shown.contains(&id)
    }

    fn raise_next(&mut self) -> Option<Emergency> {
        let next = self
            .latest
            .iter()
            .filter(|e| is_actionable(&e.status) && !self.shown.contains(&e.id))
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned()?;
        self.shown.insert(next.id);
        self.visible = Some(next.clone());
        Some(next)
    }
}

/// Presents the alert (modal, banner, terminal block).
pub trait AlertSink: Send + Sync {
    fn show(&self, emergency: &Emergency);
    fn hide(&self);
}

/// Audible cue played when an alert appears.
pub trait Chime: Send + Sync {
    fn ring(&self);
}

pub const ALERT_POLL_KEY: &str = "driver-emergencies";

pub struct AlertMonitor<A> {
    api: Arc<A>,
    session: Session,
    tracker: Mutex<AlertTracker>,
    sink: Arc<dyn AlertSink>,
    chime: Arc<dyn Chime>,
}

impl<A> AlertMonitor<A>
where
    A: EmergencyApi + 'static,
{
    pub fn new(api: Arc<A>, session: Session, sink: Arc<dyn AlertSink>, chime: Arc<dyn Chime>) -> Self {
        AlertMonitor { api, session, tracker: Mutex::new(AlertTracker::new()), sink, chime }
    }

    fn tracker(&self) -> MutexGuard<'_, AlertTracker> {
        match self.tracker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn visible(&self) -> Option<Emergency> {
        self.tracker().visible().cloned()
    }

    /// Applies a fetched list and drives the sink and chime.
    pub fn apply(&self, emergencies: &[Emergency]) -> Option<Emergency> {
        let (had_alert, raised, has_alert) = {
            let mut tracker = self.tracker();
            let had_alert = tracker.visible().is_some();
            let raised = tracker.observe(emergencies);
            (had_alert, raised, tracker.visible().is_some())
        };
        match &raised {
            Some(emergency) => self.present(emergency),
            None if had_alert && !has_alert => self.sink.hide(),
            None => {}
        }
        raised
    }

    /// One fetch of the driver's feed followed by [`apply`](Self::apply).
    pub async fn poll_once(&self) -> PortalResult<Option<Emergency>> {
        let emergencies = self.api.my_driver_emergencies(&self.session).await?;
        Ok(self.apply(&emergencies))
    }

    /// Accepts emergency `id` and points the UI at its detail view. On failure
    /// the alert stays open.
    pub async fn accept(&self, id: i64) -> PortalResult<Navigation> {
        self.api.accept_emergency(&self.session, id).await?;
        info!("Accepted emergency {}", id);
        let closed = {
            let mut tracker = self.tracker();
            if tracker.visible().is_some_and(|e| e.id == id) {
                Some(tracker.accepted())
            } else {
                tracker.acknowledge(id);
                None
            }
        };
        if let Some(next) = closed {
            self.after_close(next);
        }
        Ok(Navigation::EmergencyDetail(id))
    }

    pub fn dismiss(&self) {
        let next = self.tracker().dismiss();
        self.after_close(next);
    }

    fn after_close(&self, next: Option<Emergency>) {
        self.sink.hide();
        if let Some(emergency) = next {
            self.present(&emergency);
        }
    }

    fn present(&self, emergency: &Emergency) {
        info!("Incoming emergency {} ({})", emergency.id, emergency.status);
        self.sink.show(emergency);
        self.chime.ring();
    }

    /// Joins the shared driver-feed poller.
    pub fn subscribe(&self, hub: &PollingHub<Vec<Emergency>>, interval: Duration) -> Subscription<Vec<Emergency>> {
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let key = format!("{}:{}", ALERT_POLL_KEY, session.user.id);
        hub.subscribe(key, interval, move || {
            let api = Arc::clone(&api);
            let session = session.clone();
            async move { api.my_driver_emergencies(&session).await.map_err(PortalError::from) }
        })
    }

    /// Applies every successful poll until the subscription ends.
    pub async fn watch(&self, mut subscription: Subscription<Vec<Emergency>>) {
        let mut last_seen_fetch = 0;
        while subscription.changed().await {
            let state = subscription.state();
            if state.fetches == last_seen_fetch {
                continue;
            }
            last_seen_fetch = state.fetches;
            if state.last_error.is_some() {
                continue;
            }
            if let Some(emergencies) = state.value {
                self.apply(&emergencies);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{EmergencyStatus, Priority, Role};
    use rest_api::{ApiError, MockEmergencyApi};
    use security::SessionUser;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn emergency(id: i64, status: EmergencyStatus, minute: u32) -> Emergency {
        Emergency {
            id,
            patient_id: None,
            patient_name: Some(format!("Patient {}", id)),
            patient_phone: None,
            address: Some("12 Le Loi".into()),
            latitude: None,
            longitude: None,
            description: None,
            status,
            priority: Priority::High,
            clinic_id: None,
            clinic_name: None,
            doctor_id: None,
            doctor_name: None,
            ambulance_id: None,
            ambulance_license_plate: None,
            driver_id: Some(4),
            created_at: NaiveDate::from_ymd_opt(2024, 7, 1).and_then(|d| d.and_hms_opt(9, minute, 0)),
            dispatched_at: None,
            arrived_at: None,
            completed_at: None,
        }
    }

    fn session() -> Session {
        Session::new(
            "tok",
            SessionUser { id: 4, email: "driver@clinic.vn".into(), full_name: None, role: Role::Driver, doctor_id: None },
        )
    }

    #[test]
    fn alerts_once_per_id_and_dismiss_does_not_reopen() {
        let mut tracker = AlertTracker::new();
        let feed = vec![emergency(10, EmergencyStatus::Assigned, 0)];

        let raised = tracker.observe(&feed);
        assert_eq!(raised.map(|e| e.id), Some(10));
        assert!(tracker.observe(&feed).is_none());

        assert!(tracker.dismiss().is_none());
        assert!(tracker.visible().is_none());
        assert!(tracker.observe(&feed).is_none());
        assert!(tracker.visible().is_none());
    }

    #[test]
    fn ids_leaving_the_feed_are_forgotten() {
        let mut tracker = AlertTracker::new();
        let feed = vec![emergency(10, EmergencyStatus::Assigned, 0), emergency(11, EmergencyStatus::Pending, 1)];
        assert_eq!(tracker.observe(&feed).map(|e| e.id), Some(11));
        assert_eq!(tracker.dismiss().map(|e| e.id), Some(10));
        assert!(tracker.dismiss().is_none());

        assert!(tracker.observe(&feed[..1]).is_none());
        assert!(tracker.has_shown(10));
        assert!(!tracker.has_shown(11));

        assert!(tracker.observe(&[]).is_none());
        assert!(!tracker.has_shown(10));
    }

    #[test]
    fn non_actionable_statuses_never_alert() {
        let mut tracker = AlertTracker::new();
        let feed = vec![
            emergency(1, EmergencyStatus::EnRoute, 0),
            emergency(2, EmergencyStatus::Completed, 1),
            emergency(3, EmergencyStatus::Unknown("ON_HOLD".into()), 2),
        ];
        assert!(tracker.observe(&feed).is_none());
    }

    #[test]
    fn second_arrival_waits_for_the_first_alert_to_close() {
        let mut tracker = AlertTracker::new();
        assert_eq!(tracker.observe(&[emergency(1, EmergencyStatus::Pending, 0)]).map(|e| e.id), Some(1));

        let both = vec![emergency(1, EmergencyStatus::Pending, 0), emergency(2, EmergencyStatus::NeedsAttention, 5)];
        assert!(tracker.observe(&both).is_none());
        assert_eq!(tracker.visible().map(|e| e.id), Some(1));

        assert_eq!(tracker.dismiss().map(|e| e.id), Some(2));
        assert!(tracker.has_shown(1) && tracker.has_shown(2));
        assert!(tracker.dismiss().is_none());
    }

    #[test]
    fn newest_unseen_is_raised_first() {
        let mut tracker = AlertTracker::new();
        let feed = vec![emergency(5, EmergencyStatus::Pending, 10), emergency(6, EmergencyStatus::Pending, 3)];
        assert_eq!(tracker.observe(&feed).map(|e| e.id), Some(5));
        assert_eq!(tracker.dismiss().map(|e| e.id), Some(6));
    }

    #[test]
    fn alert_closes_when_someone_else_takes_the_emergency() {
        let mut tracker = AlertTracker::new();
        tracker.observe(&[emergency(8, EmergencyStatus::Pending, 0)]);
        assert!(tracker.observe(&[emergency(8, EmergencyStatus::EnRoute, 0)]).is_none());
        assert!(tracker.visible().is_none());
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<i64>>,
        hides: AtomicUsize,
    }

    impl AlertSink for RecordingSink {
        fn show(&self, emergency: &Emergency) {
            self.shown.lock().unwrap().push(emergency.id);
        }

        fn hide(&self) {
            self.hides.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct CountingChime(AtomicUsize);

    impl Chime for CountingChime {
        fn ring(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn accept_calls_the_endpoint_and_navigates() {
        let mut api = MockEmergencyApi::new();
        api.expect_my_driver_emergencies()
            .times(1)
            .returning(|_| Ok(vec![emergency(21, EmergencyStatus::Assigned, 0)]));
        api.expect_accept_emergency()
            .withf(|_, id| *id == 21)
            .times(1)
            .returning(|_, id| Ok(emergency(id, EmergencyStatus::Assigned, 0)));

        let sink = Arc::new(RecordingSink::default());
        let chime = Arc::new(CountingChime::default());
        let monitor = AlertMonitor::new(Arc::new(api), session(), sink.clone(), chime.clone());

        let raised = monitor.poll_once().await.unwrap();
        assert_eq!(raised.map(|e| e.id), Some(21));
        assert_eq!(chime.0.load(Ordering::SeqCst), 1);

        let nav = monitor.accept(21).await.unwrap();
        assert_eq!(nav, Navigation::EmergencyDetail(21));
        assert!(monitor.visible().is_none());
        assert_eq!(*sink.shown.lock().unwrap(), vec![21]);
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_accept_keeps_the_alert_open() {
        let mut api = MockEmergencyApi::new();
        api.expect_accept_emergency()
            .returning(|_, _| Err(ApiError::Forbidden { message: "Already taken".into() }));

        let sink = Arc::new(RecordingSink::default());
        let monitor = AlertMonitor::new(Arc::new(api), session(), sink.clone(), Arc::new(CountingChime::default()));
        monitor.apply(&[emergency(3, EmergencyStatus::Pending, 0)]);

        assert!(monitor.accept(3).await.is_err());
        assert_eq!(monitor.visible().map(|e| e.id), Some(3));
        assert_eq!(sink.hides.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_applies_polls_from_the_shared_hub() {
        let mut api = MockEmergencyApi::new();
        api.expect_my_driver_emergencies()
            .returning(|_| Ok(vec![emergency(30, EmergencyStatus::Pending, 0)]));
        let sink = Arc::new(RecordingSink::default());
        let chime = Arc::new(CountingChime::default());
        let monitor = Arc::new(AlertMonitor::new(Arc::new(api), session(), sink.clone(), chime.clone()));

        let hub = PollingHub::new();
        let subscription = monitor.subscribe(&hub, Duration::from_secs(5));
        assert_eq!(hub.subscriber_count("driver-emergencies:4"), 1);

        let watcher = Arc::clone(&monitor);
        let task = tokio::spawn(async move { watcher.watch(subscription).await });
        tokio::time::sleep(Duration::from_secs(16)).await;
        task.abort();

        assert_eq!(*sink.shown.lock().unwrap(), vec![30]);
        assert_eq!(chime.0.load(Ordering::SeqCst), 1);
    }
}
