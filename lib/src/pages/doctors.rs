// lib/src/pages/doctors.rs

use models::Doctor;
use rest_api::{DoctorApi, DoctorFilter};
use security::Session;

use crate::errors::PortalResult;
use crate::pages::list::ListPage;

#[derive(Debug, Default)]
pub struct DoctorListPage {
    pub filter: DoctorFilter,
    pub search: String,
    pub list: ListPage<Doctor>,
}

impl DoctorListPage {
    pub fn new(filter: DoctorFilter) -> Self {
        DoctorListPage { filter, ..Default::default() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: DoctorApi + ?Sized,
    {
        self.list.load(api.list_doctors(session, &self.filter)).await
    }

    /// Rows matching the search box (name, specialty or clinic).
    pub fn visible(&self) -> Vec<&Doctor> {
        self.list.items().iter().filter(|d| d.matches_search(&self.search)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::MockDoctorApi;
    use serde_json::json;

    #[tokio::test]
    async fn search_narrows_the_loaded_rows() {
        let mut api = MockDoctorApi::new();
        api.expect_list_doctors().returning(|_, _| {
            Ok(vec![
                serde_json::from_value(json!({ "id": 1, "fullName": "Nguyen Lan", "specialty": "Cardiology" })).unwrap(),
                serde_json::from_value(json!({ "id": 2, "fullName": "Tran Minh", "specialty": "Pediatrics" })).unwrap(),
            ])
        });
        let session: Session =
            serde_json::from_value(json!({ "token": "t", "user": { "id": 1, "email": "p@b.vn", "role": "PATIENT" } }))
                .unwrap();

        let mut page = DoctorListPage::default();
        page.load(&api, &session).await.unwrap();
        assert_eq!(page.visible().len(), 2);
        page.search = "cardio".into();
        assert_eq!(page.visible().iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
    }
}
