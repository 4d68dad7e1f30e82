//! Credential configuration for the LeakCheck client.
//!
//! Credentials (an API key and an optional proxy) come from three sources,
//! consulted in this fixed order for every API variant:
//!
//! 1. an explicit value passed by the caller,
//! 2. the `LEAKCHECK_APIKEY` / `LEAKCHECK_PROXY` environment variables,
//! 3. the persisted JSON credential file (`~/PyLCAPI.json` by default).
//!
//! The key and the proxy are resolved independently. Environment and file
//! values are trimmed; an explicit key is used verbatim. Empty strings, which is
//! what a freshly created credential file contains, count as unset.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ApiKey, KeyPolicy};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed file name of the persisted credential file.
pub const CONFIG_FILE_NAME: &str = "PyLCAPI.json";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LEAKCHECK_APIKEY";

/// Environment variable holding the proxy URL.
pub const ENV_PROXY: &str = "LEAKCHECK_PROXY";

/// On-disk shape of the credential file: `{ "key": "", "proxy": "" }`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredCredentials {
    /// API key, empty when unset
    pub key: String,
    /// Proxy URL, empty when unset
    pub proxy: String,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// Location of the persisted credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Use the credential file in the user's home directory.
    pub fn default_location() -> ConfigResult<Self> {
        let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::at(dirs.home_dir().join(CONFIG_FILE_NAME)))
    }

    /// Use a credential file at an explicit path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential file, creating it with empty placeholders if absent.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, created, or parsed.
    pub fn load_or_init(&self) -> ConfigResult<StoredCredentials> {
        if self.path.exists() {
            tracing::debug!("Loading credentials from {}", self.path.display());
            let contents = fs::read_to_string(&self.path)?;
            serde_json::from_str(&contents).map_err(ConfigError::Parse)
        } else {
            tracing::debug!(
                "Credential file not found, creating placeholder at {}",
                self.path.display()
            );
            let placeholder = StoredCredentials::default();
            self.save(&placeholder)?;
            Ok(placeholder)
        }
    }

    /// Save credentials to disk.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credentials: &StoredCredentials) -> ConfigResult<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(credentials).map_err(ConfigError::Serialize)?;
        fs::write(&self.path, contents)?;
        tracing::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// Credentials resolved for one client instance.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// API key, if any source provided one
    pub api_key: Option<ApiKey>,
    /// Proxy URL, if any source provided one
    pub proxy: Option<String>,
}

impl Credentials {
    /// Get the key, failing when none was resolved.
    pub fn require_key(&self) -> ConfigResult<&ApiKey> {
        self.api_key.as_ref().ok_or(ConfigError::MissingKey)
    }
}

/// The sources consulted when resolving [`Credentials`].
#[derive(Clone)]
pub struct CredentialSources {
    key: Option<String>,
    proxy: Option<String>,
    store: Option<CredentialStore>,
    use_env: bool,
}

impl fmt::Debug for CredentialSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSources")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("store", &self.store)
            .field("use_env", &self.use_env)
            .finish()
    }
}

impl Default for CredentialSources {
    fn default() -> Self {
        Self {
            key: None,
            proxy: None,
            store: None,
            use_env: true,
        }
    }
}

impl CredentialSources {
    /// No explicit values, no credential file; the environment is consulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the environment variables entirely.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Set an explicit API key (highest precedence).
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an explicit proxy (highest precedence).
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Consult a credential file as the last source.
    #[must_use]
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolve credentials using the process environment.
    pub fn resolve(&self, policy: KeyPolicy) -> ConfigResult<Credentials> {
        let use_env = self.use_env;
        self.resolve_with(policy, |name| {
            if use_env {
                std::env::var(name).ok()
            } else {
                None
            }
        })
    }

    /// Resolve credentials with a custom environment lookup.
    ///
    /// The credential file is only read when the key or the proxy is still
    /// unresolved after the explicit values and the environment.
    ///
    /// # Errors
    /// Returns error if the credential file is unreadable or the resolved
    /// key violates `policy`.
    pub fn resolve_with<F>(&self, policy: KeyPolicy, env: F) -> ConfigResult<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut key = pick_explicit(self.key.clone())
            .or_else(|| pick(env(ENV_API_KEY), "environment"));
        let mut proxy = non_empty(self.proxy.clone()).or_else(|| non_empty(env(ENV_PROXY)));

        if key.is_none() || proxy.is_none() {
            if let Some(store) = &self.store {
                let stored = store.load_or_init()?;
                key = key.or_else(|| pick(Some(stored.key), "config file"));
                proxy = proxy.or_else(|| non_empty(Some(stored.proxy)));
            }
        }

        let api_key = match key {
            Some(raw) => {
                let key = ApiKey::new(raw)?;
                policy.check(&key)?;
                Some(key)
            }
            None => None,
        };

        if let Some(proxy) = &proxy {
            tracing::debug!("Using proxy {proxy}");
        }

        Ok(Credentials { api_key, proxy })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// An explicit key is taken verbatim so that stray whitespace fails validation.
fn pick_explicit(value: Option<String>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    tracing::debug!("API key resolved from argument");
    Some(value)
}

fn pick(value: Option<String>, source: &str) -> Option<String> {
    let value = non_empty(value)?;
    tracing::debug!("API key resolved from {source}");
    Some(value)
}
