use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::service::booking::BookingReceipt;

/// A payment waiting on the external widget. Created locally from a booking receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHandle {
    pub id: Uuid,
    pub order_id: String,
    pub booking_id: Option<String>,
    pub amount: Option<u64>,
    pub currency: Option<String>,
    pub initiated_at: DateTime<Utc>,
}

impl PaymentHandle {
    pub fn for_receipt(receipt: &BookingReceipt) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: receipt.order_id.clone(),
            booking_id: receipt.booking_id.clone(),
            amount: receipt.amount,
            currency: receipt.currency.clone(),
            initiated_at: Utc::now(),
        }
    }
}

/// Fields the payment widget hands back once the customer has paid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentProof {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfirmation {
    #[serde(default, alias = "verified")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
