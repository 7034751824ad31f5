//! Session and request client for the Local Service Finder marketplace.
//!
//! [`ApiClient`] holds at most one signed-in identity, persists its credential token through a
//! [`storage::TokenStore`], and maps every user action onto exactly one backend request.

#[macro_use]
extern crate log;

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod error;
pub mod service;
pub mod storage;
mod utils;

pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
pub use service::{
    ApiClient, AuthResponse, BookingReceipt, Category, CredentialToken, Identity, NewServiceListing, PaymentConfirmation,
    PaymentError, PaymentGateway, PaymentHandle, PaymentProof, RestoreOutcome, Review, Role, Service, ServiceFilter,
    SessionContext, SignupFields,
};
