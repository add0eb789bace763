// lib/src/pages/bookings.rs

use chrono::NaiveDateTime;
use log::info;

use models::{AmbulanceBooking, NewAmbulanceBooking};
use rest_api::{BookingApi, BookingFilter};
use security::Session;

use crate::errors::PortalResult;
use crate::notice::Notice;
use crate::pages::list::ListPage;

/// Booking table. The filter goes to the server as query parameters and the
/// rows are shown exactly as returned.
#[derive(Debug, Default)]
pub struct BookingListPage {
    pub filter: BookingFilter,
    pub list: ListPage<AmbulanceBooking>,
}

impl BookingListPage {
    pub fn new(filter: BookingFilter) -> Self {
        BookingListPage { filter, list: ListPage::new() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: BookingApi + ?Sized,
    {
        self.list.load(api.list_bookings(session, &self.filter)).await
    }

    pub fn items(&self) -> &[AmbulanceBooking] {
        self.list.items()
    }
}

pub async fn book_ambulance<A>(
    api: &A,
    session: &Session,
    booking: &NewAmbulanceBooking,
    now: NaiveDateTime,
) -> PortalResult<(AmbulanceBooking, Notice)>
where
    A: BookingApi + ?Sized,
{
    booking.validate(now)?;
    let created = api.create_booking(session, booking).await?;
    info!("Ambulance booking {} created", created.id);
    let notice = Notice::success(format!("Booking #{} received", created.id));
    Ok((created, notice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::BookingStatus;
    use rest_api::MockBookingApi;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({ "token": "t", "user": { "id": 1, "email": "a@b.vn", "role": "ADMIN" } }))
            .unwrap()
    }

    #[tokio::test]
    async fn rows_are_not_refiltered_client_side() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .withf(|_, filter| filter.status == Some(BookingStatus::Pending))
            .times(1)
            .returning(|_, _| {
                // A server that ignores the filter still gets its rows shown.
                Ok(vec![
                    serde_json::from_value(json!({ "id": 1, "status": "PENDING" })).unwrap(),
                    serde_json::from_value(json!({ "id": 2, "status": "COMPLETED" })).unwrap(),
                ])
            });

        let mut page = BookingListPage::new(BookingFilter { status: Some(BookingStatus::Pending), ..Default::default() });
        assert_eq!(page.load(&api, &session()).await.unwrap(), 2);
        assert_eq!(page.items()[1].status, BookingStatus::Completed);
    }
}
