// lib/src/pages/leave.rs

use chrono::NaiveDate;
use log::info;

use models::{Action, LeaveDecision, LeaveRequest, LeaveStatus, NewLeaveRequest, WireStatus};
use rest_api::{DoctorApi, LeaveFilter, LeaveRequestApi};
use security::Session;

use crate::doctor_directory::DoctorDirectory;
use crate::errors::{PortalError, PortalResult};
use crate::notice::Notice;
use crate::pages::detail::check_action;
use crate::pages::list::ListPage;

/// Leave form as typed by a doctor; the doctor id is filled in on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveForm {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LeavePage {
    pub filter: LeaveFilter,
    pub list: ListPage<LeaveRequest>,
}

impl LeavePage {
    pub fn new(filter: LeaveFilter) -> Self {
        LeavePage { filter, list: ListPage::new() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: LeaveRequestApi + ?Sized,
    {
        let count = self.list.load(api.list_leave_requests(session, &self.filter)).await?;
        self.list.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(count)
    }

    /// Doctor side: files a request for the signed-in doctor and reloads
    /// that doctor's requests.
    pub async fn request<A>(
        &mut self,
        api: &A,
        directory: &DoctorDirectory,
        session: &Session,
        form: &LeaveForm,
        today: NaiveDate,
    ) -> PortalResult<LeaveRequest>
    where
        A: LeaveRequestApi + DoctorApi + ?Sized,
    {
        let doctor_id = directory.require_doctor_id(api, session).await.map_err(|e| self.list.fail(e))?;
        let request = NewLeaveRequest {
            doctor_id,
            start_date: form.start_date,
            end_date: form.end_date,
            reason: form.reason.trim().to_string(),
        };
        request.validate(today).map_err(|e| self.list.fail(e.into()))?;

        let created = api.create_leave_request(session, &request).await.map_err(|e| self.list.fail(e.into()))?;
        info!("Leave request {} filed for doctor {} ({} days)", created.id, doctor_id, created.days());
        self.filter.doctor_id = Some(doctor_id);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success("Leave request submitted"));
        Ok(created)
    }

    /// Admin side: approves or rejects a pending request. Rejection needs
    /// `confirmed`.
    pub async fn decide<A>(
        &mut self,
        api: &A,
        session: &Session,
        id: i64,
        action: Action,
        note: Option<String>,
        confirmed: bool,
    ) -> PortalResult<LeaveRequest>
    where
        A: LeaveRequestApi + ?Sized,
    {
        let row = self.list.find(id).ok_or(PortalError::NotLoaded(id))?;
        let to = check_action(&row.status, action, confirmed).map_err(|e| self.list.fail(e))?;
        let decision = LeaveDecision {
            status: LeaveStatus::parse(to),
            admin_note: note.filter(|n| !n.trim().is_empty()),
        };
        let decided = api
            .decide_leave_request(session, id, &decision)
            .await
            .map_err(|e| self.list.fail(e.into()))?;
        info!("Leave request {} -> {}", id, decided.status);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success(format!("Leave request #{} {}", id, decision.status.label())));
        Ok(decided)
    }
}
