// lib/src/doctor_directory.rs

use std::collections::HashMap;

use log::{debug, info};
use tokio::sync::Mutex;

use rest_api::{DoctorApi, DoctorFilter};
use security::Session;

use crate::errors::{PortalError, PortalResult};

/// Resolves the signed-in account to its doctor record id. The answer, a
/// miss included, is remembered per user so the doctor list is fetched at
/// most once.
#[derive(Debug, Default)]
pub struct DoctorDirectory {
    resolved: Mutex<HashMap<i64, Option<i64>>>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn doctor_id<A>(&self, api: &A, session: &Session) -> PortalResult<Option<i64>>
    where
        A: DoctorApi + ?Sized,
    {
        if let Some(id) = session.user.doctor_id {
            return Ok(Some(id));
        }

        // Held across the fetch so concurrent callers wait for one lookup.
        let mut resolved = self.resolved.lock().await;
        if let Some(cached) = resolved.get(&session.user.id) {
            return Ok(*cached);
        }

        let doctors = api.list_doctors(session, &DoctorFilter::default()).await?;
        let email = Some(session.user.email.as_str());
        let found = doctors
            .iter()
            .find(|d| d.user_id == Some(session.user.id))
            .or_else(|| doctors.iter().find(|d| d.belongs_to(session.user.id, email)))
            .map(|d| d.id);
        match found {
            Some(id) => info!("User {} resolved to doctor {}", session.user.id, id),
            None => debug!("User {} has no doctor record", session.user.id),
        }
        resolved.insert(session.user.id, found);
        Ok(found)
    }

    /// Like [`doctor_id`](Self::doctor_id) but a miss is an error.
    pub async fn require_doctor_id<A>(&self, api: &A, session: &Session) -> PortalResult<i64>
    where
        A: DoctorApi + ?Sized,
    {
        self.doctor_id(api, session).await?.ok_or(PortalError::NotADoctor)
    }

    /// Drops remembered answers, e.g. after signing out.
    pub async fn forget(&self) {
        self.resolved.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Doctor, Role};
    use rest_api::MockDoctorApi;
    use security::SessionUser;

    fn doctor(id: i64, user_id: Option<i64>, email: Option<&str>) -> Doctor {
        Doctor {
            id,
            user_id,
            full_name: Some(format!("Dr {}", id)),
            email: email.map(str::to_string),
            phone: None,
            specialty: Some("Cardiology".into()),
            clinic_id: None,
            clinic_name: None,
            experience_years: None,
            consultation_fee: None,
        }
    }

    fn session(user_id: i64, email: &str, doctor_id: Option<i64>) -> Session {
        Session::new(
            "tok",
            SessionUser { id: user_id, email: email.into(), full_name: None, role: Role::Doctor, doctor_id },
        )
    }

    #[tokio::test]
    async fn claim_in_session_skips_the_lookup() {
        let api = MockDoctorApi::new();
        let directory = DoctorDirectory::new();
        let id = directory.doctor_id(&api, &session(1, "a@b.vn", Some(77))).await.unwrap();
        assert_eq!(id, Some(77));
    }

    #[tokio::test]
    async fn matches_user_id_then_email_and_memoises() {
        let mut api = MockDoctorApi::new();
        api.expect_list_doctors().times(1).returning(|_, _| {
            Ok(vec![doctor(1, Some(99), None), doctor(2, None, Some("Lan.Nguyen@Clinic.vn"))])
        });
        let directory = DoctorDirectory::new();
        let me = session(5, "lan.nguyen@clinic.vn", None);

        assert_eq!(directory.doctor_id(&api, &me).await.unwrap(), Some(2));
        assert_eq!(directory.doctor_id(&api, &me).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn user_id_match_wins_over_email() {
        let mut api = MockDoctorApi::new();
        api.expect_list_doctors()
            .returning(|_, _| Ok(vec![doctor(1, None, Some("x@clinic.vn")), doctor(2, Some(8), None)]));
        let directory = DoctorDirectory::new();
        assert_eq!(directory.doctor_id(&api, &session(8, "x@clinic.vn", None)).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn a_miss_is_remembered_too() {
        let mut api = MockDoctorApi::new();
        api.expect_list_doctors().times(1).returning(|_, _| Ok(vec![doctor(1, Some(2), None)]));
        let directory = DoctorDirectory::new();
        let me = session(3, "patient@mail.vn", None);

        assert!(matches!(directory.require_doctor_id(&api, &me).await, Err(PortalError::NotADoctor)));
        assert_eq!(directory.doctor_id(&api, &me).await.unwrap(), None);
    }
}
