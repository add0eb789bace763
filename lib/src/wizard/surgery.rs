// lib/src/wizard/surgery.rs

use chrono::NaiveDate;
use log::info;

use models::{FieldErrors, NewSurgeryConsultation, Priority, SurgeryConsultation, ValidationError};
use rest_api::SurgeryApi;
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::wizard::WizardStep;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SurgeryStep {
    #[default]
    Info,
    Consultation,
    Appointment,
    Schedule,
}

impl WizardStep for SurgeryStep {
    const ALL: &'static [Self] =
        &[SurgeryStep::Info, SurgeryStep::Consultation, SurgeryStep::Appointment, SurgeryStep::Schedule];

    fn title(&self) -> &'static str {
        match self {
            SurgeryStep::Info => "Surgery details",
            SurgeryStep::Consultation => "Consultation request",
            SurgeryStep::Appointment => "Preferred date",
            SurgeryStep::Schedule => "Confirmation",
        }
    }
}

/// Patient-side surgery request. Fields are filled step by step; the
/// consultation is created on the appointment step.
#[derive(Debug, Clone, Default)]
pub struct SurgeryWizard {
    step: SurgeryStep,
    pub surgery_type: String,
    pub medical_history: String,
    pub description: String,
    pub urgency: Priority,
    pub doctor_id: Option<i64>,
    pub preferred_date: Option<NaiveDate>,
    consultation: Option<SurgeryConsultation>,
}

impl SurgeryWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> SurgeryStep {
        self.step
    }

    pub fn consultation(&self) -> Option<&SurgeryConsultation> {
        self.consultation.as_ref()
    }

    pub fn next(&mut self) -> PortalResult<SurgeryStep> {
        let next = match self.step {
            SurgeryStep::Info => {
                let mut errors = FieldErrors::new();
                errors.require("surgeryType", &self.surgery_type);
                errors.into_result(())?;
                SurgeryStep::Consultation
            }
            SurgeryStep::Consultation => {
                let mut errors = FieldErrors::new();
                errors.require("description", &self.description);
                errors.into_result(())?;
                SurgeryStep::Appointment
            }
            SurgeryStep::Appointment => {
                return Err(PortalError::Wizard("Submit the request to continue".into()));
            }
            SurgeryStep::Schedule => {
                return Err(PortalError::Wizard("The request has already been sent".into()));
            }
        };
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> PortalResult<SurgeryStep> {
        let previous = match self.step {
            SurgeryStep::Info | SurgeryStep::Consultation => SurgeryStep::Info,
            SurgeryStep::Appointment => SurgeryStep::Consultation,
            SurgeryStep::Schedule => {
                return Err(PortalError::Wizard("A submitted request cannot be edited".into()));
            }
        };
        self.step = previous;
        Ok(previous)
    }

    pub fn request(&self) -> Result<NewSurgeryConsultation, FieldErrors> {
        let preferred_date = self.preferred_date.ok_or(ValidationError::Required("preferredDate"))?;
        let history = self.medical_history.trim();
        Ok(NewSurgeryConsultation {
            surgery_type: self.surgery_type.trim().to_string(),
            description: self.description.trim().to_string(),
            urgency: self.urgency.clone(),
            doctor_id: self.doctor_id,
            preferred_date,
            medical_history: (!history.is_empty()).then(|| history.to_string()),
        })
    }

    /// Creates the consultation and moves to the confirmation step.
    pub async fn submit<A>(&mut self, api: &A, session: &Session, today: NaiveDate) -> PortalResult<&SurgeryConsultation>
    where
        A: SurgeryApi + ?Sized,
    {
        if self.step != SurgeryStep::Appointment {
            return Err(PortalError::Wizard(format!("Cannot submit from the {} step", self.step.title())));
        }
        let request = self.request()?;
        request.validate(today)?;

        let created = api.create_surgery_consultation(session, &request).await?;
        if created.id <= 0 {
            return Err(PortalError::Wizard("The server did not return a request number".into()));
        }
        info!("Surgery consultation {} requested ({})", created.id, request.surgery_type);
        self.step = SurgeryStep::Schedule;
        Ok(self.consultation.insert(created))
    }
}
