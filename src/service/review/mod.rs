mod model;

pub use model::*;

use serde_json::json;

use super::{http::ApiRequest, ApiClient};
use crate::error::ClientResult;

impl ApiClient {
    pub async fn list_reviews(&self, service_id: &str) -> ClientResult<Vec<Review>> {
        self.execute(ApiRequest::get(["api", "reviews", service_id])).await
    }

    pub async fn create_review(&self, service_id: &str, text: &str, rating: u8) -> ClientResult<Review> {
        let session = self.require_session().await?;
        let review = NewReview::new(text, rating)?;

        let request = ApiRequest::post(
            ["api", "reviews"],
            json!({
                "serviceId": service_id,
                "userId": session.identity.id,
                "text": review.text,
                "rating": review.rating,
            }),
        );
        self.execute_as(&session, request).await
    }
}
