use serde::Deserialize;

use crate::{
    error::{ClientError, ClientResult},
    service::session::{CredentialToken, Identity, Role},
    utils,
};

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> ClientResult<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation("email and password are required".into()));
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct SignupFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignupFields {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("name is required".into()));
        }
        if !utils::validate_email(self.email.trim()) {
            return Err(ClientError::Validation("email address is not valid".into()));
        }
        if !utils::validate_password(&self.password) {
            return Err(ClientError::Validation(format!(
                "password must be at least {} characters",
                utils::MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Body of a successful login or signup.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: CredentialToken,
    pub user: Identity,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum UserEnvelope {
    Wrapped { user: Identity },
    Bare(Identity),
}

impl From<UserEnvelope> for Identity {
    fn from(envelope: UserEnvelope) -> Self {
        match envelope {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(identity) => identity,
        }
    }
}

/// What happened to a persisted token at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    Restored(Identity),
    NoToken,
    /// The server refused the token; it has been deleted.
    Discarded,
    /// The server could not be reached; the token is kept for the next start.
    Offline,
    /// Another login finished first; the restored token was left alone.
    Superseded,
}
