// models/src/medical/doctor.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        crate::display::or_placeholder(self.full_name.as_deref())
    }

    /// Whether this record belongs to the account `user_id` / `email`.
    pub fn belongs_to(&self, user_id: i64, email: Option<&str>) -> bool {
        if self.user_id == Some(user_id) {
            return true;
        }
        match (self.email.as_deref(), email) {
            (Some(mine), Some(theirs)) => {
                !mine.trim().is_empty() && mine.trim().eq_ignore_ascii_case(theirs.trim())
            }
            _ => false,
        }
    }

    /// Case-insensitive match on name or specialty.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [self.full_name.as_deref(), self.specialty.as_deref(), self.clinic_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(user_id: Option<i64>, email: Option<&str>) -> Doctor {
        Doctor {
            id: 9,
            user_id,
            full_name: Some("Le Thi C".into()),
            email: email.map(str::to_string),
            phone: None,
            specialty: Some("Cardiology".into()),
            clinic_id: None,
            clinic_name: None,
            experience_years: None,
            consultation_fee: None,
        }
    }

    #[test]
    fn ownership_matches_user_id_then_email() {
        assert!(doctor(Some(5), None).belongs_to(5, None));
        assert!(doctor(None, Some("Doc@Clinic.vn")).belongs_to(5, Some("doc@clinic.vn ")));
        assert!(!doctor(None, Some("")).belongs_to(5, Some("")));
        assert!(!doctor(Some(6), None).belongs_to(5, Some("x@y.z")));
    }

    #[test]
    fn search_covers_name_and_specialty() {
        let d = doctor(None, None);
        assert!(d.matches_search("cardio"));
        assert!(d.matches_search("LE THI"));
        assert!(!d.matches_search("derma"));
        assert!(d.matches_search(""));
    }
}
