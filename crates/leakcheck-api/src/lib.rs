//! LeakCheck API - Async client for the LeakCheck breach lookup service.
//!
//! One [`LeakCheckClient`] covers every API generation the service has
//! exposed. The [`ApiVariant`] chosen at construction decides how the key is
//! validated and sent, which endpoints are available and how responses are
//! interpreted.
//!
//! # Modules
//!
//! - [`client`] - Public facade and its configuration
//! - [`variant`] - API generations and endpoint kinds
//! - [`query`] - Input validation and request construction
//! - [`transport`] - HTTP client, proxy and `User-Agent` handling
//! - [`response`] - Envelope interpretation and "not found" translation
//! - [`error`] - Error types using thiserror
//!
//! # Example
//!
//! ```rust,no_run
//! use leakcheck_api::{ApiVariant, ClientConfig, LeakCheckClient, LookupRequest, LookupType};
//!
//! # async fn run() -> leakcheck_api::Result<()> {
//! let config = ClientConfig::new(ApiVariant::V2).with_default_store()?;
//! let client = LeakCheckClient::new(config)?;
//!
//! let records = client
//!     .lookup(LookupRequest::new("example@example.com").with_type(LookupType::Email))
//!     .await?;
//! println!("{} records", records.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod error;
pub mod query;
pub mod response;
pub mod transport;
pub mod variant;

// Re-export commonly used types
pub use client::{ClientConfig, LeakCheckClient};
pub use error::{LeakCheckError, Result};
pub use query::{LookupRequest, Method, PreparedRequest, MAX_LIMIT, MAX_OFFSET};
pub use response::{LimitsInfo, LookupResponse, Record, NOT_FOUND};
pub use transport::{
    ClientIdentity, RawResponse, Transport, CLIENT_NAME, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
pub use variant::{ApiVariant, Endpoint, KeyPlacement, ParseVariantError};

pub use leakcheck_core::{ApiKey, ConfigError, CredentialSources, CredentialStore, LookupType};
