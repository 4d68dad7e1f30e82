//! LeakCheck Core - Foundation crate for the LeakCheck client.
//!
//! This crate provides the shared types, configuration errors and credential
//! resolution that the API client and the CLI both depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - JSON credential file and source precedence
//! - [`types`] - Shared newtypes and enums (`ApiKey`, `KeyPolicy`, `LookupType`)
//!
//! # Example
//!
//! ```rust,no_run
//! use leakcheck_core::{CredentialSources, CredentialStore, KeyPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = CredentialSources::new().with_store(CredentialStore::default_location()?);
//! let credentials = sources.resolve(KeyPolicy::AtLeast(40))?;
//!
//! if credentials.api_key.is_some() {
//!     println!("API key configured");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    CredentialSources, CredentialStore, Credentials, StoredCredentials, CONFIG_FILE_NAME,
    ENV_API_KEY, ENV_PROXY,
};
pub use error::{ConfigError, ConfigResult};
pub use types::{ApiKey, KeyPolicy, LookupType, ParseLookupTypeError, API_KEY_LEN};
