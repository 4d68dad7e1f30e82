//! Command handlers.

use crate::cli::{Cli, Command, ConfigCommand, LookupArgs};
use crate::output;
use anyhow::{bail, Context, Result};
use leakcheck_api::{
    ApiKey, ApiVariant, ClientConfig, ClientIdentity, CredentialStore, LeakCheckClient,
    LookupRequest,
};
use leakcheck_core::{StoredCredentials, ENV_API_KEY, ENV_PROXY};
use std::time::Duration;

/// Dispatch the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Lookup(args) => lookup(&cli, args).await,
        Command::Limits { json } => limits(&cli, *json).await,
        Command::Ip => ip(&cli).await,
        Command::Version => {
            version();
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => config_show(&cli),
        Command::Config(ConfigCommand::Set { key, proxy }) => {
            config_set(&cli, key.as_deref(), proxy.as_deref())
        }
    }
}

fn store(cli: &Cli) -> Result<CredentialStore> {
    match &cli.config {
        Some(path) => Ok(CredentialStore::at(path)),
        None => CredentialStore::default_location().context("Failed to locate credential file"),
    }
}

fn client(cli: &Cli) -> Result<LeakCheckClient> {
    let mut config = ClientConfig::new(cli.variant).with_store(store(cli)?);
    if let Some(key) = &cli.key {
        config = config.with_key(key.as_str());
    }
    if let Some(proxy) = &cli.proxy {
        config = config.with_proxy(proxy.as_str());
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    LeakCheckClient::new(config)
        .with_context(|| format!("Failed to create {} client", cli.variant))
}

async fn lookup(cli: &Cli, args: &LookupArgs) -> Result<()> {
    let client = client(cli)?;

    let mut request = LookupRequest::new(args.query.as_str());
    if let Some(kind) = args.kind {
        request = request.with_type(kind);
    }
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }
    if let Some(offset) = args.offset {
        request = request.with_offset(offset);
    }

    let endpoint = args
        .endpoint
        .map_or_else(|| client.variant().default_endpoint(), Into::into);
    let records = client
        .lookup_at(endpoint, request)
        .await
        .with_context(|| format!("Lookup of '{}' failed", args.query))?;

    tracing::info!(records = records.len(), %endpoint, "Lookup finished");

    if args.json {
        println!("{}", output::render_json(&serde_json::Value::Array(records))?);
    } else {
        println!("{}", output::render_records(&records));
    }
    Ok(())
}

async fn limits(cli: &Cli, json: bool) -> Result<()> {
    let info = client(cli)?
        .limits()
        .await
        .context("Failed to fetch limits")?;

    if json {
        println!("{}", output::render_json(&info)?);
    } else {
        println!("{}", output::render_limits(&info));
    }
    Ok(())
}

async fn ip(cli: &Cli) -> Result<()> {
    let body = client(cli)?.ip().await.context("Failed to fetch IP")?;
    println!("{}", body.trim());
    Ok(())
}

fn version() {
    let identity = ClientIdentity::current();
    println!("leakcheck {}", env!("CARGO_PKG_VERSION"));
    println!("User-Agent: {}", identity.user_agent());
}

fn config_show(cli: &Cli) -> Result<()> {
    let store = store(cli)?;
    let stored = store
        .load_or_init()
        .with_context(|| format!("Failed to read {}", store.path().display()))?;

    println!("File:  {}", store.path().display());
    for line in describe(&stored, |name| std::env::var(name).ok()) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable view of stored credentials, noting environment overrides.
fn describe<F>(stored: &StoredCredentials, env: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let overridden = |name: &str| {
        if env(name).is_some_and(|v| !v.trim().is_empty()) {
            format!(" (overridden by {name})")
        } else {
            String::new()
        }
    };

    let key = ApiKey::new(stored.key.trim())
        .map_or_else(|_| "(not set)".to_string(), |k| k.masked());
    let proxy = if stored.proxy.trim().is_empty() {
        "(not set)".to_string()
    } else {
        stored.proxy.clone()
    };

    vec![
        format!("Key:   {key}{}", overridden(ENV_API_KEY)),
        format!("Proxy: {proxy}{}", overridden(ENV_PROXY)),
    ]
}

fn config_set(cli: &Cli, key: Option<&str>, proxy: Option<&str>) -> Result<()> {
    if key.is_none() && proxy.is_none() {
        bail!("Nothing to set, pass --key and/or --proxy");
    }

    let store = store(cli)?;
    let mut stored = store
        .load_or_init()
        .with_context(|| format!("Failed to read {}", store.path().display()))?;
    apply(&mut stored, cli.variant, key, proxy)?;

    store
        .save(&stored)
        .with_context(|| format!("Failed to write {}", store.path().display()))?;
    println!("Saved credentials to {}", store.path().display());
    Ok(())
}

/// Update stored credentials; an empty value clears the field.
fn apply(
    stored: &mut StoredCredentials,
    variant: ApiVariant,
    key: Option<&str>,
    proxy: Option<&str>,
) -> Result<()> {
    if let Some(key) = key.map(str::trim) {
        if key.is_empty() {
            stored.key.clear();
        } else {
            let key = ApiKey::new(key)?;
            variant
                .key_policy()
                .check(&key)
                .with_context(|| format!("Key rejected for the {variant} API"))?;
            stored.key = key.expose().to_string();
        }
    }
    if let Some(proxy) = proxy {
        stored.proxy = proxy.trim().to_string();
    }
    Ok(())
}
