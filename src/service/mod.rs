use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::{
    config::AppConfig,
    error::{ClientError, ClientResult},
    storage::FileStore,
};

mod auth;
mod booking;
pub mod http;
mod listing;
mod payment;
mod review;
mod session;

pub use auth::*;
pub use booking::*;
pub use http::{ApiRequest, ApiResponse, HttpClient, HttpService, TransportError};
pub use listing::*;
pub use payment::*;
pub use review::*;
pub use session::*;

/// Session-aware client for the marketplace backend.
///
/// Every public operation issues at most one request and never retries. Operations that need an
/// identity fail with [`ClientError::AuthenticationRequired`] before anything is sent.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    session: SessionContext,
    searches: Arc<watch::Sender<u64>>,
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>, session: SessionContext) -> Self {
        let (searches, _) = watch::channel(0);

        Self {
            http,
            session,
            searches: Arc::new(searches),
        }
    }

    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        info!("Initializing ApiClient for {}", config.api.base_url);
        let http = HttpService::new(&config.api).map_err(ClientError::Setup)?;
        let store = FileStore::new(config.storage.token_path.clone());
        let session = SessionContext::new(Arc::new(store), config.storage.token_key.clone());
        info!("ApiClient initialized");

        Ok(Self::new(Arc::new(http), session))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.session.identity().await
    }

    async fn require_session(&self) -> ClientResult<Session> {
        self.session.current().await.ok_or(ClientError::AuthenticationRequired)
    }

    async fn require_provider(&self) -> ClientResult<Session> {
        let session = self.require_session().await?;
        if !session.identity.is_provider() {
            warn!("User {} is not a provider", session.identity.id);
            return Err(ClientError::AuthenticationRequired);
        }
        Ok(session)
    }

    /// Sends with the current token, if any.
    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let token = self.session.token().await;
        let body = self.send(request, token).await?;
        decode(&body)
    }

    async fn execute_as<T: DeserializeOwned>(&self, session: &Session, request: ApiRequest) -> ClientResult<T> {
        let body = self.send(request, Some(session.token.clone())).await?;
        decode(&body)
    }

    async fn send(&self, request: ApiRequest, token: Option<CredentialToken>) -> ClientResult<String> {
        let label = request.to_string();
        debug!("Sending {}", label);

        let request = request.with_bearer(token.as_ref().map(|t| t.as_str().to_string()));
        let response = self.http.send(request).await.map_err(|e| {
            warn!("{} failed: {}", label, e);
            ClientError::from(e)
        })?;

        let status = response.status;
        if status.is_success() {
            debug!("{} -> {}", label, status);
            return Ok(response.body);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} -> 401", label);
            if let Some(token) = &token {
                if let Err(e) = self.session.invalidate(token).await {
                    error!("Failed to discard rejected token: {}", e);
                }
            }
            return Err(ClientError::AuthenticationRejected);
        }

        warn!("{} -> {}", label, status);
        Err(ClientError::ServerRejected {
            status: status.as_u16(),
            body: response.body,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{identity, signed_in_client, test_client};
    use serde_json::Value;

    #[tokio::test]
    async fn test_bearer_attached_when_session_present() {
        let (client, http, _) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_json(200, serde_json::json!([]));

        let _: Value = client.execute(ApiRequest::get(["api", "services"])).await.unwrap();

        assert_eq!(http.requests()[0].bearer.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_no_bearer_when_anonymous() {
        let (client, http, _) = test_client();
        http.push_json(200, serde_json::json!([]));

        let _: Value = client.execute(ApiRequest::get(["api", "services"])).await.unwrap();

        assert!(http.requests()[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_ends_session() {
        let (client, http, store) = signed_in_client(identity("u1", Role::User), "t1").await;
        http.push_text(401, r#"{"message":"jwt expired"}"#);

        let err = client
            .execute::<Value>(ApiRequest::get(["api", "services"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::AuthenticationRejected));
        assert!(client.identity().await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_error_classification() {
        let (client, http, _) = test_client();
        http.push_text(503, "unavailable");
        http.push_network_failure();
        http.push_text(200, "<html>");

        let err = client.execute::<Value>(ApiRequest::get(["api", "services"])).await.unwrap_err();
        assert!(matches!(err, ClientError::ServerRejected { status: 503, ref body } if body == "unavailable"));

        let err = client.execute::<Value>(ApiRequest::get(["api", "services"])).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));

        let err = client.execute::<Value>(ApiRequest::get(["api", "services"])).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_treats_empty_body_as_null() {
        let value: Option<Value> = decode("  ").unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_from_config_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.token_path = dir.path().join("session.json");

        let client = ApiClient::from_config(&config).unwrap();

        assert!(client.identity().await.is_none());
        assert!(!config.storage.token_path.exists());
    }
}
