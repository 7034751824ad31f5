#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment dismissed by user")]
    Dismissed,
    #[error("Payment failed: {0}")]
    Failed(String),
    /// The widget reported payment but the backend did not confirm it.
    #[error("Payment not verified: {0}")]
    Unverified(String),
}
