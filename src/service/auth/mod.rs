mod model;

pub use model::*;

use serde_json::json;

use super::{
    http::ApiRequest,
    session::{Identity, Session},
    ApiClient,
};
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// Resolves a persisted token into an identity with a single request.
    ///
    /// Never fails: whatever goes wrong, the client ends up either authenticated or logged out.
    pub async fn restore_session(&self) -> RestoreOutcome {
        let token = match self.session.restore().await {
            Ok(Some(token)) => token,
            Ok(None) => return RestoreOutcome::NoToken,
            Err(e) => {
                error!("Failed to read persisted token: {}", e);
                return RestoreOutcome::NoToken;
            }
        };

        info!("Restoring session from persisted token");
        let result = self
            .send(ApiRequest::get(["api", "user"]), Some(token.clone()))
            .await
            .and_then(|body| super::decode::<UserEnvelope>(&body));

        match result {
            Ok(envelope) => {
                let identity = Identity::from(envelope);
                let session = Session {
                    token,
                    identity: identity.clone(),
                };
                match self.session.resume(session).await {
                    Ok(true) => RestoreOutcome::Restored(identity),
                    Ok(false) => RestoreOutcome::Superseded,
                    Err(e) => {
                        error!("Failed to re-read persisted token: {}", e);
                        RestoreOutcome::NoToken
                    }
                }
            }
            Err(ClientError::Network(e)) => {
                warn!("Could not verify persisted token: {}", e);
                RestoreOutcome::Offline
            }
            Err(e) => {
                warn!("Persisted token rejected: {}", e);
                match self.session.invalidate(&token).await {
                    Ok(true) => RestoreOutcome::Discarded,
                    // a 401 was already discarded by send; anything stored now belongs to a newer login
                    Ok(false) => match self.session.restore().await {
                        Ok(None) => RestoreOutcome::Discarded,
                        _ => RestoreOutcome::Superseded,
                    },
                    Err(e) => {
                        error!("Failed to discard persisted token: {}", e);
                        RestoreOutcome::Discarded
                    }
                }
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let credentials = Credentials::new(email, password)?;
        let request = ApiRequest::post(
            ["api", "login"],
            json!({ "email": credentials.email, "password": credentials.password }),
        );

        self.authenticate(request).await
    }

    pub async fn signup(&self, fields: &SignupFields) -> ClientResult<AuthResponse> {
        fields.validate()?;
        let request = ApiRequest::post(
            ["api", "signup"],
            json!({
                "name": fields.name.trim(),
                "email": fields.email.trim(),
                "password": fields.password,
                "role": fields.role,
            }),
        );

        self.authenticate(request).await
    }

    /// Forgets the session locally. The server is not told; the token stays valid there until it expires.
    pub async fn logout(&self) -> ClientResult<()> {
        info!("Logging out");
        self.session.clear().await?;
        Ok(())
    }

    async fn authenticate(&self, request: ApiRequest) -> ClientResult<AuthResponse> {
        let body = self.send(request, None).await.map_err(|e| match e {
            // Every client-side refusal looks the same so accounts cannot be probed.
            ClientError::ServerRejected { status, .. } if (400..500).contains(&status) => {
                ClientError::AuthenticationRejected
            }
            other => other,
        })?;

        let response: AuthResponse = super::decode(&body)?;
        self.session
            .set(Session {
                token: response.token.clone(),
                identity: response.user.clone(),
            })
            .await?;

        Ok(response)
    }
}
