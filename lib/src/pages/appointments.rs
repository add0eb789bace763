// lib/src/pages/appointments.rs

use chrono::NaiveDateTime;
use log::info;

use models::{Action, Appointment, AppointmentStatus, NewAppointment};
use rest_api::{AppointmentApi, AppointmentFilter, DoctorApi};
use security::Session;

use crate::doctor_directory::DoctorDirectory;
use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::pages::detail::check_action;
use crate::pages::list::ListPage;

#[derive(Debug, Default)]
pub struct AppointmentPage {
    pub filter: AppointmentFilter,
    pub list: ListPage<Appointment>,
}

impl AppointmentPage {
    pub fn new(filter: AppointmentFilter) -> Self {
        AppointmentPage { filter, list: ListPage::new() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: AppointmentApi + ?Sized,
    {
        let count = self.list.load(api.list_appointments(session, &self.filter)).await?;
        self.list.sort_by(|a, b| a.appointment_time.cmp(&b.appointment_time));
        Ok(count)
    }

    /// Doctor portal view: narrows the filter to the signed-in doctor first.
    pub async fn load_for_doctor<A>(
        &mut self,
        api: &A,
        directory: &DoctorDirectory,
        session: &Session,
    ) -> PortalResult<usize>
    where
        A: AppointmentApi + DoctorApi + ?Sized,
    {
        let doctor_id = directory.require_doctor_id(api, session).await.map_err(|e| self.list.fail(e))?;
        self.filter.doctor_id = Some(doctor_id);
        self.load(api, session).await
    }

    /// Confirms, completes or cancels one row, then reloads the table.
    pub async fn perform<A>(
        &mut self,
        api: &A,
        session: &Session,
        id: i64,
        action: Action,
        confirmed: bool,
    ) -> PortalResult<()>
    where
        A: AppointmentApi + ?Sized,
    {
        let row = self.list.find(id).ok_or(PortalError::NotLoaded(id))?;
        let to = check_action(&row.status, action, confirmed).map_err(|e| self.list.fail(e))?;
        api.update_appointment_status(session, id, AppointmentStatus::parse(to))
            .await
            .map_err(|e| self.list.fail(e.into()))?;
        info!("Appointment {}: {}", id, action);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success(format!("Appointment #{}: {} done", id, action.label())));
        Ok(())
    }
}

pub async fn book_appointment<A>(
    api: &A,
    session: &Session,
    request: &NewAppointment,
    now: NaiveDateTime,
) -> PortalResult<Appointment>
where
    A: AppointmentApi + ?Sized,
{
    request.validate(now)?;
    Ok(api.create_appointment(session, request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::{ApiResult, AppointmentApi, DoctorApi, DoctorFilter, MockAppointmentApi, MockDoctorApi};
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({ "token": "t", "user": { "id": 6, "email": "doc@b.vn", "role": "DOCTOR" } }))
            .unwrap()
    }

    fn appointment(id: i64, status: &str, hour: u32) -> Appointment {
        serde_json::from_value(json!({
            "id": id,
            "status": status,
            "doctorId": 3,
            "appointmentTime": format!("2024-07-02T{:02}:00:00", hour)
        }))
        .unwrap()
    }

    /// Both traits behind one handle, the way `RestClient` serves them.
    struct Backend {
        appointments: MockAppointmentApi,
        doctors: MockDoctorApi,
    }

    #[async_trait::async_trait]
    impl AppointmentApi for Backend {
        async fn list_appointments(&self, s: &Session, f: &AppointmentFilter) -> ApiResult<Vec<Appointment>> {
            self.appointments.list_appointments(s, f).await
        }
        async fn create_appointment(&self, s: &Session, a: &NewAppointment) -> ApiResult<Appointment> {
            self.appointments.create_appointment(s, a).await
        }
        async fn update_appointment_status(&self, s: &Session, id: i64, st: AppointmentStatus) -> ApiResult<Appointment> {
            self.appointments.update_appointment_status(s, id, st).await
        }
    }

    #[async_trait::async_trait]
    impl DoctorApi for Backend {
        async fn list_doctors(&self, s: &Session, f: &DoctorFilter) -> ApiResult<Vec<models::Doctor>> {
            self.doctors.list_doctors(s, f).await
        }
        async fn get_doctor(&self, s: &Session, id: i64) -> ApiResult<models::Doctor> {
            self.doctors.get_doctor(s, id).await
        }
    }

    #[tokio::test]
    async fn doctor_view_filters_by_resolved_doctor_id() {
        let mut doctors = MockDoctorApi::new();
        doctors.expect_list_doctors()
            .times(1)
            .returning(|_, _| Ok(vec![serde_json::from_value(json!({ "id": 3, "userId": 6 })).unwrap()]));
        let mut appointments = MockAppointmentApi::new();
        appointments
            .expect_list_appointments()
            .withf(|_, f| f.doctor_id == Some(3))
            .times(2)
            .returning(|_, _| Ok(vec![appointment(2, "PENDING", 14), appointment(1, "CONFIRMED", 9)]));
        let backend = Backend { appointments, doctors };

        let directory = DoctorDirectory::new();
        let mut page = AppointmentPage::default();
        page.load_for_doctor(&backend, &directory, &session()).await.unwrap();
        page.load_for_doctor(&backend, &directory, &session()).await.unwrap();
        assert_eq!(page.list.items().iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn cancel_needs_confirmation_and_then_reloads() {
        let mut api = MockAppointmentApi::new();
        api.expect_list_appointments().times(2).returning(|_, _| Ok(vec![appointment(1, "PENDING", 9)]));
        api.expect_update_appointment_status()
            .withf(|_, id, st| *id == 1 && *st == AppointmentStatus::Cancelled)
            .times(1)
            .returning(|_, id, _| Ok(appointment(id, "CANCELLED", 9)));

        let mut page = AppointmentPage::default();
        page.load(&api, &session()).await.unwrap();
        assert!(matches!(
            page.perform(&api, &session(), 1, Action::Cancel, false).await,
            Err(PortalError::ConfirmationRequired { .. })
        ));
        page.perform(&api, &session(), 1, Action::Cancel, true).await.unwrap();
    }
}
