// lib/src/wizard/mod.rs

// Linear multi-step forms. Steps only move forward through validation and
// the final step is reached only through the create call.

pub mod pharmacy;
pub mod surgery;

pub use pharmacy::{PharmacyStep, PharmacyWizard};
pub use surgery::{SurgeryStep, SurgeryWizard};

/// Position and caption of a wizard step, for progress indicators.
pub trait WizardStep: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn title(&self) -> &'static str;

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or_default()
    }

    fn is_last(&self) -> bool {
        self.index() + 1 == Self::ALL.len()
    }
}
