use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of a booking request. `order_id` is the payment order the booking waits on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingReceipt {
    #[serde(rename = "orderId", alias = "order_id")]
    pub order_id: String,
    #[serde(default, rename = "bookingId", alias = "_id", skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Amount in the smallest currency unit, as issued by the payment provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
