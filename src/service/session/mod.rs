mod model;

pub use model::*;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{StorageError, TokenStore};

/// Owns the current identity and the persisted credential token.
///
/// Invariant: the in-memory session is only ever set after its token reached the store, and it
/// is cleared before the stored token is removed, so no identity outlives its token.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    token_key: String,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>, token_key: impl Into<String>) -> Self {
        Self {
            store,
            token_key: token_key.into(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads the persisted token without touching the in-memory session.
    pub async fn restore(&self) -> Result<Option<CredentialToken>, StorageError> {
        let token = self.store.get(&self.token_key).await?;
        Ok(token.filter(|t| !t.trim().is_empty()).map(CredentialToken::new))
    }

    pub async fn set(&self, session: Session) -> Result<(), StorageError> {
        let mut current = self.current.write().await;
        self.store.set(&self.token_key, session.token.as_str()).await?;
        info!("Session established for user {} ({})", session.identity.id, session.identity.role);
        *current = Some(session);
        Ok(())
    }

    /// Adopts a session whose token was read back from the store, without writing it again.
    ///
    /// Declines when another session was set meanwhile or the stored token changed.
    pub(crate) async fn resume(&self, session: Session) -> Result<bool, StorageError> {
        let mut current = self.current.write().await;
        if current.is_some() || !self.holds(&session.token).await? {
            debug!("Not resuming user {}, session changed meanwhile", session.identity.id);
            return Ok(false);
        }
        info!("Session resumed for user {} ({})", session.identity.id, session.identity.role);
        *current = Some(session);
        Ok(true)
    }

    /// Forgets the identity and the persisted token.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut current = self.current.write().await;
        if let Some(session) = current.take() {
            info!("Session cleared for user {}", session.identity.id);
        }
        self.store.del(&self.token_key).await
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.current.read().await.as_ref().map(|s| s.identity.clone())
    }

    pub async fn token(&self) -> Option<CredentialToken> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Drops the session and the stored token, but only while they still carry `token`, so a
    /// stale rejection cannot log out a session established in the meantime.
    pub(crate) async fn invalidate(&self, token: &CredentialToken) -> Result<bool, StorageError> {
        let mut current = self.current.write().await;
        let owned = match current.as_ref() {
            Some(session) => &session.token == token,
            None => self.holds(token).await?,
        };
        if !owned {
            return Ok(false);
        }

        match current.take() {
            Some(session) => warn!("Token rejected by server, ending session for user {}", session.identity.id),
            None => warn!("Discarding rejected persisted token"),
        }
        self.store.del(&self.token_key).await?;
        Ok(true)
    }

    async fn holds(&self, token: &CredentialToken) -> Result<bool, StorageError> {
        let stored = self.store.get(&self.token_key).await?;
        Ok(stored.as_deref() == Some(token.as_str()))
    }
}
