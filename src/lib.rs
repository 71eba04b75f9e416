//! Typed Rust client for the Fast2SMS HTTP API.
//!
//! Message parameters accumulate on the client through a fluent interface,
//! are validated against route-specific rules, assembled into the flat form
//! payload Fast2SMS expects, and submitted; the heterogeneous JSON response
//! shapes come back as typed [`Fast2smsResponse`] variants. After every
//! terminal outcome the parameter store resets to its configured defaults.
//!
//! ```rust,no_run
//! use fast2sms::{Fast2smsClient, Fast2smsConfig, SmsRoute};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fast2sms::Fast2smsError> {
//!     let mut client = Fast2smsClient::new(Fast2smsConfig::new("api-key"))?;
//!     let response = client
//!         .to("9999999999")
//!         .message("hello from Rust")
//!         .route(SmsRoute::Quick)
//!         .send()
//!         .await?;
//!     println!("{}", response.message());
//!     Ok(())
//! }
//! ```
//!
//! For tests, the [`fake`] module intercepts every submission in memory and
//! exposes assertion queries over what would have been sent.
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod fake;
mod transport;

pub use client::{
    EventListener, Fast2smsClient, Fast2smsClientBuilder, Fast2smsConfig, Fast2smsError,
};
pub use domain::{
    DltManagerResponse, DltManagerType, DltSender, Fast2smsResponse, PhoneNumber, RawBody,
    Recipients, ResponseBase, ScheduleTime, SmsLanguage, SmsParameters, SmsRoute, SmsSendResponse,
    ValidationError, VariableValues, WalletBalanceResponse,
};
pub use transport::MalformedResponseError;
