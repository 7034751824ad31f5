mod error;
mod model;

pub use error::PaymentError;
pub use model::*;

use async_trait::async_trait;

use super::{booking::BookingReceipt, http::ApiRequest, ApiClient};
use crate::error::{ClientError, ClientResult};

/// The external payment widget. Given a handle it eventually yields proof of payment, or fails.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn collect(&self, handle: &PaymentHandle) -> Result<PaymentProof, PaymentError>;
}

impl ApiClient {
    /// First phase: turn a booking's order reference into something the widget can be opened with.
    pub fn initiate_payment(&self, receipt: &BookingReceipt) -> PaymentHandle {
        let handle = PaymentHandle::for_receipt(receipt);
        info!("Payment {} initiated for order {}", handle.id, handle.order_id);
        handle
    }

    /// Second phase: check the proof belongs to the handle, then have the server verify it.
    pub async fn confirm_payment(
        &self,
        handle: PaymentHandle,
        proof: PaymentProof,
    ) -> ClientResult<PaymentConfirmation> {
        if proof.razorpay_order_id != handle.order_id {
            warn!(
                "Payment {} got proof for order {}, expected {}",
                handle.id, proof.razorpay_order_id, handle.order_id
            );
            return Err(ClientError::Validation("payment proof does not match the order".into()));
        }

        let confirmation = self.verify_payment(&proof).await?;
        if confirmation.success {
            info!("Payment {} for order {} verified", handle.id, handle.order_id);
        } else {
            warn!("Payment {} for order {} not confirmed by server", handle.id, handle.order_id);
        }
        Ok(confirmation)
    }

    /// Forwards proof fields to the backend as-is.
    pub async fn verify_payment(&self, proof: &PaymentProof) -> ClientResult<PaymentConfirmation> {
        for (field, value) in [
            ("razorpay_order_id", &proof.razorpay_order_id),
            ("razorpay_payment_id", &proof.razorpay_payment_id),
            ("razorpay_signature", &proof.razorpay_signature),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Validation(format!("{} is required", field)));
            }
        }

        let body = serde_json::to_value(proof).map_err(|e| ClientError::Validation(e.to_string()))?;
        let confirmation: Option<PaymentConfirmation> =
            self.execute(ApiRequest::post(["api", "payments", "verify"], body)).await?;
        Ok(confirmation.unwrap_or_default())
    }

    /// Books a service and drives the payment through `gateway`.
    ///
    /// Once the booking exists, every failure is reported as [`ClientError::PaymentIncomplete`]:
    /// the booking stays on the server unpaid and the error carries its order reference so the
    /// caller can retry [`ApiClient::verify_payment`] or cancel.
    pub async fn checkout(
        &self,
        service_id: &str,
        gateway: &dyn PaymentGateway,
    ) -> ClientResult<PaymentConfirmation> {
        let receipt = self.create_booking(service_id).await?;
        let handle = self.initiate_payment(&receipt);

        let order_id = handle.order_id.clone();
        let proof = match gateway.collect(&handle).await {
            Ok(proof) => proof,
            Err(reason) => return Err(incomplete(order_id, reason)),
        };

        match self.confirm_payment(handle, proof).await {
            Ok(confirmation) if confirmation.success => Ok(confirmation),
            Ok(confirmation) => {
                let message = confirmation
                    .message
                    .unwrap_or_else(|| "server did not confirm the payment".to_string());
                Err(incomplete(order_id, PaymentError::Unverified(message)))
            }
            Err(e) => Err(incomplete(order_id, PaymentError::Unverified(e.to_string()))),
        }
    }
}

fn incomplete(order_id: String, reason: PaymentError) -> ClientError {
    warn!("Payment for order {} not completed: {}", order_id, reason);
    ClientError::PaymentIncomplete { order_id, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::session::Role,
        utils::test::{identity, signed_in_client, test_client},
    };
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedGateway {
        outcome: Result<&'static str, PaymentError>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn paying(payment_id: &'static str) -> Self {
            Self {
                outcome: Ok(payment_id),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: PaymentError) -> Self {
            Self {
                outcome: Err(error),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn collect(&self, handle: &PaymentHandle) -> Result<PaymentProof, PaymentError> {
            self.seen.lock().unwrap().push(handle.order_id.clone());
            let payment_id = self.outcome.clone()?;
            Ok(PaymentProof {
                razorpay_order_id: handle.order_id.clone(),
                razorpay_payment_id: payment_id.to_string(),
                razorpay_signature: "sig".to_string(),
            })
        }
    }

    fn proof(order_id: &str) -> PaymentProof {
        PaymentProof {
            razorpay_order_id: order_id.to_string(),
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_signature: "sig".to_string(),
        }
    }

    fn receipt(order_id: &str) -> BookingReceipt {
        serde_json::from_value(json!({"orderId": order_id, "amount": 25000, "currency": "INR"})).unwrap()
    }

    #[tokio::test]
    async fn test_initiate_payment_copies_order_details() {
        let (client, http, _) = test_client();

        let handle = client.initiate_payment(&receipt("order_1"));

        assert_eq!(handle.order_id, "order_1");
        assert_eq!(handle.amount, Some(25000));
        assert_eq!(handle.currency.as_deref(), Some("INR"));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_payment_forwards_proof() {
        let (client, http, _) = test_client();
        http.push_json(200, json!({"success": true, "message": "Payment verified"}));

        let handle = client.initiate_payment(&receipt("order_1"));
        let confirmation = client.confirm_payment(handle, proof("order_1")).await.unwrap();

        assert!(confirmation.success);
        let request = &http.requests()[0];
        assert_eq!(request.path(), "/api/payments/verify");
        assert_eq!(
            request.body,
            Some(json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "sig"
            }))
        );
    }

    #[tokio::test]
    async fn test_confirm_payment_rejects_foreign_proof() {
        let (client, http, _) = test_client();

        let handle = client.initiate_payment(&receipt("order_1"));
        let err = client.confirm_payment(handle, proof("order_2")).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_verify_payment_with_empty_body() {
        let (client, http, _) = test_client();
        http.push_text(200, "");

        let confirmation = client.verify_payment(&proof("order_1")).await.unwrap();
        assert_eq!(confirmation, PaymentConfirmation::default());
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(201, json!({"orderId": "order_7"}));
        http.push_json(200, json!({"success": true}));
        let gateway = ScriptedGateway::paying("pay_7");

        let confirmation = client.checkout("s1", &gateway).await.unwrap();

        assert!(confirmation.success);
        assert_eq!(*gateway.seen.lock().unwrap(), vec!["order_7".to_string()]);
        let requests = http.requests();
        assert_eq!(requests[0].path(), "/api/bookings");
        assert_eq!(requests[1].path(), "/api/payments/verify");
        assert_eq!(requests[1].body.as_ref().unwrap()["razorpay_payment_id"], "pay_7");
    }

    #[tokio::test]
    async fn test_abandoned_checkout_keeps_booking_and_reports_order() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(201, json!({"orderId": "order_8"}));
        let gateway = ScriptedGateway::failing(PaymentError::Dismissed);

        let err = client.checkout("s1", &gateway).await.unwrap_err();

        match err {
            ClientError::PaymentIncomplete { ref order_id, ref reason } => {
                assert_eq!(order_id, "order_8");
                assert_eq!(*reason, PaymentError::Dismissed);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // no verification and no rollback request
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_requires_identity() {
        let (client, http, _) = test_client();
        let gateway = ScriptedGateway::paying("pay_1");

        let err = client.checkout("s1", &gateway).await.unwrap_err();

        assert!(matches!(err, ClientError::AuthenticationRequired));
        assert!(gateway.seen.lock().unwrap().is_empty());
        assert_eq!(http.request_count(), 0);
    }

    fn assert_incomplete(err: ClientError, expected_order: &str) -> PaymentError {
        match err {
            ClientError::PaymentIncomplete { order_id, reason } => {
                assert_eq!(order_id, expected_order);
                reason
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_checkout_verify_unreachable_keeps_order() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(201, json!({"orderId": "order_8"}));
        http.push_network_failure();

        let err = client.checkout("s1", &ScriptedGateway::paying("pay_8")).await.unwrap_err();

        let reason = assert_incomplete(err, "order_8");
        assert!(matches!(reason, PaymentError::Unverified(_)));
        assert_eq!(http.request_count(), 2);
    }

    #[tokio::test]
    async fn test_checkout_verify_rejected_keeps_order() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(201, json!({"orderId": "order_9"}));
        http.push_text(500, r#"{"message":"gateway down"}"#);

        let err = client.checkout("s1", &ScriptedGateway::paying("pay_9")).await.unwrap_err();

        assert!(matches!(assert_incomplete(err, "order_9"), PaymentError::Unverified(_)));
    }

    #[tokio::test]
    async fn test_checkout_unsuccessful_verification_keeps_order() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(201, json!({"orderId": "order_10"}));
        http.push_json(200, json!({"success": false, "message": "Signature mismatch"}));

        let err = client.checkout("s1", &ScriptedGateway::paying("pay_10")).await.unwrap_err();

        assert_eq!(
            assert_incomplete(err, "order_10"),
            PaymentError::Unverified("Signature mismatch".to_string())
        );
    }
}
