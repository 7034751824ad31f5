use rust_i18n::t;

use crate::service::{http::TransportError, PaymentError};
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// The HTTP stack could not be built, so nothing was ever sent.
    #[error("Client setup failed: {0}")]
    Setup(TransportError),

    /// Raised locally, before any request goes out.
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Authentication rejected")]
    AuthenticationRejected,

    #[error("Server rejected request ({status}): {body}")]
    ServerRejected { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Payment for order {order_id} not completed: {reason}")]
    PaymentIncomplete { order_id: String, reason: PaymentError },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Message fit for showing to whoever triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => t!("errors.network").to_string(),
            ClientError::Setup(e) => t!("errors.setup", reason = e).to_string(),
            ClientError::AuthenticationRequired => t!("errors.authentication_required").to_string(),
            ClientError::AuthenticationRejected => t!("errors.authentication_rejected").to_string(),
            ClientError::ServerRejected { status, body } => match server_message(body) {
                Some(message) => t!("errors.server_rejected_with_message", status = status, message = message).to_string(),
                None => t!("errors.server_rejected", status = status).to_string(),
            },
            ClientError::Validation(reason) => t!("errors.validation", reason = reason).to_string(),
            ClientError::Decode(_) => t!("errors.decode").to_string(),
            ClientError::PaymentIncomplete { order_id, .. } => {
                t!("errors.payment_incomplete", order_id = order_id).to_string()
            }
            ClientError::Storage(_) => t!("errors.storage").to_string(),
        }
    }
}

/// Pulls a human readable message out of an error body, if the backend sent one.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

pub type ClientResult<T> = Result<T, ClientError>;
