use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Provider,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "customer" => Ok(Role::User),
            "provider" => Ok(Role::Provider),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Provider => write!(f, "provider"),
        }
    }
}

/// The authenticated user or provider, as the backend describes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    pub fn is_provider(&self) -> bool {
        self.role == Role::Provider
    }
}

/// Opaque bearer credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialToken(String);

impl CredentialToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: CredentialToken,
    pub identity: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_accepts_mongo_and_plain_ids() {
        let a: Identity = serde_json::from_value(json!({"_id": "u1", "name": "Asha", "role": "provider"})).unwrap();
        let b: Identity = serde_json::from_value(json!({"id": "u2", "name": "Ravi"})).unwrap();

        assert_eq!(a.id, "u1");
        assert!(a.is_provider());
        assert_eq!(b.id, "u2");
        assert_eq!(b.role, Role::User);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Provider".parse::<Role>().unwrap(), Role::Provider);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Provider.to_string(), "provider");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = CredentialToken::new("secret-token");
        assert_eq!(format!("{:?}", token), "CredentialToken(***)");
        assert_eq!(token.as_str(), "secret-token");
    }
}
