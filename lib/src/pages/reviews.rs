// lib/src/pages/reviews.rs

use log::info;

use models::review::average_rating;
use models::{NewReview, Review};
use rest_api::{ReviewApi, ReviewFilter};
use security::Session;

use crate::errors::PortalResult;
use crate::notice::Notice;
use crate::pages::list::ListPage;

#[derive(Debug, Default)]
pub struct ReviewPage {
    pub filter: ReviewFilter,
    pub list: ListPage<Review>,
}

impl ReviewPage {
    pub fn new(filter: ReviewFilter) -> Self {
        ReviewPage { filter, list: ListPage::new() }
    }

    pub async fn load<A>(&mut self, api: &A, session: &Session) -> PortalResult<usize>
    where
        A: ReviewApi + ?Sized,
    {
        let count = self.list.load(api.list_reviews(session, &self.filter)).await?;
        self.list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(count)
    }

    pub fn average_rating(&self) -> Option<f64> {
        average_rating(self.list.items())
    }

    /// Patient side. The comment is trimmed before validation.
    pub async fn submit<A>(&mut self, api: &A, session: &Session, review: NewReview) -> PortalResult<Review>
    where
        A: ReviewApi + ?Sized,
    {
        let review = NewReview { comment: review.comment.trim().to_string(), ..review };
        review.validate().map_err(|e| self.list.fail(e.into()))?;
        let created = api.create_review(session, &review).await.map_err(|e| self.list.fail(e.into()))?;
        info!("Review {} for doctor {} ({} stars)", created.id, review.doctor_id, created.rating);
        self.load(api, session).await?;
        self.list.set_notice(Notice::success("Thank you for your review"));
        Ok(created)
    }

    /// Admin side.
    pub async fn delete<A>(&mut self, api: &A, session: &Session, id: i64) -> PortalResult<()>
    where
        A: ReviewApi + ?Sized,
    {
        api.delete_review(session, id).await.map_err(|e| self.list.fail(e.into()))?;
        self.list.remove(id);
        self.list.set_notice(Notice::success("Review deleted"));
        Ok(())
    }
}
