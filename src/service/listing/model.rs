use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{ClientError, ClientResult},
    utils::non_blank,
};

/// A bookable offering published by a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    /// Hourly rate in whole currency units.
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The backend sends either a bare provider id or a populated provider document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProviderRef {
    Id(String),
    Profile(ProviderProfile),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderProfile {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl ProviderRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            ProviderRef::Id(id) => Some(id),
            ProviderRef::Profile(profile) => profile.id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ProviderRef::Id(_) => None,
            ProviderRef::Profile(profile) => Some(&profile.name),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Plumber,
    Electrician,
    Tutor,
    Carpenter,
    Cleaner,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Plumber,
        Category::Electrician,
        Category::Tutor,
        Category::Carpenter,
        Category::Cleaner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plumber => "Plumber",
            Category::Electrician => "Electrician",
            Category::Tutor => "Tutor",
            Category::Carpenter => "Carpenter",
            Category::Cleaner => "Cleaner",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search criteria for the listing endpoint. Blank fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl ServiceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("search", &self.search),
            ("category", &self.category),
            ("location", &self.location),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value.as_deref()).map(|v| (key.to_string(), v)))
        .collect()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewServiceListing {
    pub title: String,
    pub category: String,
    pub location: String,
    pub price: u64,
}

impl NewServiceListing {
    pub fn validate(&self) -> ClientResult<()> {
        for (field, value) in [
            ("title", &self.title),
            ("category", &self.category),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Validation(format!("{} is required", field)));
            }
        }
        if self.price == 0 {
            return Err(ClientError::Validation("price must be greater than zero".into()));
        }
        Ok(())
    }
}
