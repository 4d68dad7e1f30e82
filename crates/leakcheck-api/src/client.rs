//! The public client facade.

use crate::error::{LeakCheckError, Result};
use crate::query::{self, LookupRequest};
use crate::response::{self, LimitsInfo, Record};
use crate::transport::{
    ClientIdentity, RawResponse, Transport, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use crate::variant::{ApiVariant, Endpoint};
use leakcheck_core::{ApiKey, ConfigError, CredentialSources, CredentialStore};
use std::time::Duration;

/// Everything needed to build a [`LeakCheckClient`].
///
/// `Debug` output never contains the key; the credential sources redact it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API generation to talk to
    pub variant: ApiVariant,
    /// Service origin (`https://leakcheck.io` by default)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Where the key and proxy come from
    pub sources: CredentialSources,
    /// Identity sent as `User-Agent`
    pub identity: ClientIdentity,
}

impl ClientConfig {
    /// Configuration for `variant` with default URL, timeout and identity.
    ///
    /// Only the environment is consulted for credentials until an explicit
    /// value or a credential file is added.
    #[must_use]
    pub fn new(variant: ApiVariant) -> Self {
        Self {
            variant,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sources: CredentialSources::new(),
            identity: ClientIdentity::current(),
        }
    }

    /// Set an explicit API key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.sources = self.sources.with_key(key);
        self
    }

    /// Set an explicit proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.sources = self.sources.with_proxy(proxy);
        self
    }

    /// Consult a credential file after explicit values and the environment.
    #[must_use]
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.sources = self.sources.with_store(store);
        self
    }

    /// Do not read `LEAKCHECK_APIKEY` / `LEAKCHECK_PROXY`.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.sources = self.sources.without_env();
        self
    }

    /// Consult the credential file in the user's home directory.
    pub fn with_default_store(self) -> Result<Self> {
        Ok(self.with_store(CredentialStore::default_location()?))
    }

    /// Override the service origin.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` identity.
    #[must_use]
    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = identity;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(ApiVariant::default())
    }
}

/// Client for the LeakCheck API.
///
/// Credentials are resolved once, when the client is built. Each call sends
/// exactly one request; nothing is cached or retried.
pub struct LeakCheckClient {
    variant: ApiVariant,
    api_key: Option<ApiKey>,
    transport: Transport,
}

impl LeakCheckClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// - [`ConfigError::MissingKey`] for the v2 API when no key resolves
    /// - [`ConfigError::InvalidKey`] when the key violates the variant's policy
    /// - [`ConfigError::InvalidProxy`] / [`ConfigError::InvalidBaseUrl`]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let variant = config.variant;
        let credentials = config.sources.resolve(variant.key_policy())?;
        if variant.requires_key_at_construction() {
            credentials.require_key()?;
        }

        let transport = Transport::new(
            &config.base_url,
            config.identity,
            credentials.proxy,
            config.timeout,
        )?;

        tracing::debug!(
            %variant,
            base_url = %transport.base_url(),
            has_key = credentials.api_key.is_some(),
            "LeakCheck client configured"
        );

        Ok(Self {
            variant,
            api_key: credentials.api_key,
            transport,
        })
    }

    /// API generation this client talks to.
    #[must_use]
    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    /// Whether a key is configured.
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured key, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Proxy currently in use.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.transport.proxy()
    }

    /// Library version reported in the `User-Agent`.
    #[must_use]
    pub fn version(&self) -> &str {
        self.transport.identity().version()
    }

    /// Route following requests through `proxy`; `None` disables the proxy.
    ///
    /// HTTP, HTTPS and SOCKS5 proxy URLs are accepted.
    pub fn set_proxy(&mut self, proxy: Option<&str>) -> Result<()> {
        self.transport.set_proxy(proxy)
    }

    /// Replace the API key.
    ///
    /// # Errors
    /// - [`ConfigError::KeyImmutable`] on the v2 API, whose key is fixed at
    ///   construction
    /// - [`ConfigError::InvalidKey`] when the key violates the variant's policy
    pub fn set_key(&mut self, key: &str) -> Result<()> {
        if !self.variant.key_is_mutable() {
            return Err(ConfigError::KeyImmutable.into());
        }
        let key = ApiKey::new(key)?;
        self.variant.key_policy().check(&key)?;
        self.api_key = Some(key);
        Ok(())
    }

    /// Look up `request` on the variant's default endpoint.
    ///
    /// A "Not found" answer yields an empty vector.
    pub async fn lookup(&self, request: LookupRequest) -> Result<Vec<Record>> {
        self.lookup_at(self.variant.default_endpoint(), request)
            .await
    }

    /// Look up `request` on a specific endpoint (legacy sub-endpoints).
    pub async fn lookup_at(
        &self,
        endpoint: Endpoint,
        request: LookupRequest,
    ) -> Result<Vec<Record>> {
        let prepared =
            query::build_lookup(self.variant, endpoint, &request, self.api_key.as_ref())?;
        let raw = self.transport.send(&prepared).await?;
        response::normalize(&raw, self.variant, endpoint)?.into_records()
    }

    /// Fetch the account's query limits.
    pub async fn limits(&self) -> Result<LimitsInfo> {
        let prepared = query::build_limits(self.variant, self.api_key.as_ref())?;
        let raw = self.transport.send(&prepared).await?;
        response::normalize_limits(&raw, self.variant)
    }

    /// Ask the service which IP address the request came from.
    ///
    /// The body is returned verbatim; it is not JSON and the status is not
    /// checked.
    pub async fn ip(&self) -> Result<String> {
        let RawResponse { status, body } = self.transport.send(&query::build_ip()).await?;
        tracing::debug!(status, "IP echo received");
        Ok(body)
    }
}

impl std::fmt::Debug for LeakCheckClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeakCheckClient")
            .field("variant", &self.variant)
            .field("api_key", &self.api_key)
            .field("proxy", &self.transport.proxy())
            .field("base_url", &self.transport.base_url().as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_40: &str = "0123456789abcdef0123456789abcdef01234567";

    fn config(variant: ApiVariant) -> ClientConfig {
        ClientConfig::new(variant).without_env()
    }

    fn legacy_client() -> LeakCheckClient {
        LeakCheckClient::new(config(ApiVariant::Legacy)).expect("create client")
    }

    #[test]
    fn test_v2_requires_key_at_construction() {
        let err = LeakCheckClient::new(config(ApiVariant::V2)).expect_err("no key");
        assert!(matches!(
            err,
            LeakCheckError::Config(ConfigError::MissingKey)
        ));
    }

    #[test]
    fn test_v2_rejects_short_key() {
        let err = LeakCheckClient::new(config(ApiVariant::V2).with_key("short"))
            .expect_err("short key");
        assert!(matches!(
            err,
            LeakCheckError::Config(ConfigError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_v2_accepts_long_key_and_fixes_it() {
        let long_key = format!("{KEY_40}{KEY_40}");
        let mut client =
            LeakCheckClient::new(config(ApiVariant::V2).with_key(long_key.clone()))
                .expect("create client");
        assert_eq!(client.api_key().map(ApiKey::expose), Some(long_key.as_str()));

        let err = client.set_key(KEY_40).expect_err("immutable key");
        assert!(matches!(
            err,
            LeakCheckError::Config(ConfigError::KeyImmutable)
        ));
    }

    #[test]
    fn test_legacy_set_key_requires_exact_length() {
        let mut client = legacy_client();
        let too_long = format!("{KEY_40}0");
        for bad in ["", "abc", &KEY_40[..39], too_long.as_str()] {
            assert!(client.set_key(bad).is_err(), "key of len {} accepted", bad.len());
        }

        client.set_key(KEY_40).expect("valid key");
        assert!(client.has_key());
    }

    #[test]
    fn test_legacy_set_key_rejects_padded_key() {
        let mut client = legacy_client();
        let padded_keys = [
            format!(" {KEY_40}"),
            format!("{KEY_40}\n"),
            format!(" {}", &KEY_40[..39]),
        ];
        for padded in padded_keys {
            let err = client.set_key(&padded).expect_err("padded key");
            assert!(matches!(
                err,
                LeakCheckError::Config(ConfigError::InvalidKey { .. })
            ));
        }
        assert!(!client.has_key());
    }

    #[test]
    fn test_config_debug_hides_key() {
        let debug = format!("{:?}", ClientConfig::new(ApiVariant::V2).with_key(KEY_40));
        assert!(!debug.contains(KEY_40));
    }

    #[test]
    fn test_public_client_needs_no_key() {
        let client =
            LeakCheckClient::new(config(ApiVariant::Public)).expect("create client");
        assert_eq!(client.variant(), ApiVariant::Public);
    }

    #[test]
    fn test_explicit_proxy_and_set_proxy() {
        let mut client = LeakCheckClient::new(
            config(ApiVariant::Public).with_proxy("socks5://127.0.0.1:9050"),
        )
        .expect("create client");
        assert_eq!(client.proxy(), Some("socks5://127.0.0.1:9050"));

        client.set_proxy(None).expect("clear proxy");
        assert_eq!(client.proxy(), None);
    }

    #[test]
    fn test_version_matches_crate() {
        assert_eq!(legacy_client().version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_debug_hides_key() {
        let mut client = legacy_client();
        client.set_key(KEY_40).expect("valid key");
        let debug = format!("{client:?}");
        assert!(!debug.contains(KEY_40));
    }
}
