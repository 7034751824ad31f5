mod model;

pub use model::*;

use serde_json::json;

use super::{http::ApiRequest, ApiClient};
use crate::error::ClientResult;

impl ApiClient {
    /// Reserves a service for the signed-in user. Payment is a separate step, see
    /// [`ApiClient::initiate_payment`].
    pub async fn create_booking(&self, service_id: &str) -> ClientResult<BookingReceipt> {
        let session = self.require_session().await?;

        let request = ApiRequest::post(
            ["api", "bookings"],
            json!({ "serviceId": service_id, "userId": session.identity.id }),
        );
        let receipt: BookingReceipt = self.execute_as(&session, request).await?;
        info!("Booking created for service {} (order {})", service_id, receipt.order_id);
        Ok(receipt)
    }
}
