use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub text: String,
    pub rating: u8,
    #[serde(default, alias = "user", alias = "userId", skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(String),
    Profile {
        #[serde(rename = "_id", alias = "id", default)]
        id: Option<String>,
        name: String,
    },
}

impl AuthorRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            AuthorRef::Id(_) => None,
            AuthorRef::Profile { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub text: String,
    pub rating: u8,
}

impl NewReview {
    pub fn new(text: &str, rating: u8) -> ClientResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("review text is required".into()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ClientError::Validation(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        Ok(Self {
            text: text.to_string(),
            rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_bounds() {
        assert!(NewReview::new("Great", 0).is_err());
        assert!(NewReview::new("Great", 6).is_err());
        assert!(NewReview::new("  ", 3).is_err());
        assert_eq!(NewReview::new(" Great ", 5).unwrap().text, "Great");
        assert!(NewReview::new("Ok", 1).is_ok());
    }

    #[test]
    fn test_review_author_shapes() {
        let by_id: Review = serde_json::from_value(json!({"_id": "r1", "text": "Good", "rating": 4, "userId": "u1"})).unwrap();
        let by_profile: Review = serde_json::from_value(
            json!({"_id": "r2", "text": "Fine", "rating": 3, "user": {"_id": "u2", "name": "Meera"}}),
        )
        .unwrap();
        let anonymous: Review = serde_json::from_value(json!({"_id": "r3", "text": "Meh", "rating": 2})).unwrap();

        assert_eq!(by_id.author, Some(AuthorRef::Id("u1".to_string())));
        assert_eq!(by_profile.author.unwrap().name(), Some("Meera"));
        assert!(anonymous.author.is_none());
    }
}
