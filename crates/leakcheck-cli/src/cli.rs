//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use leakcheck_api::{ApiVariant, Endpoint, LookupType};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leakcheck", version, about = "Look up leaked credentials with the LeakCheck API")]
pub struct Cli {
    /// API generation: v2, legacy (alias v1) or public
    #[arg(long, global = true, default_value = "v2")]
    pub variant: ApiVariant,

    /// API key (overrides LEAKCHECK_APIKEY and the credential file)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Proxy URL: http://, https://, socks5:// or socks5h://
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Credential file to use instead of ~/PyLCAPI.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Service origin
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("variant", &self.variant)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the breach database
    Lookup(LookupArgs),
    /// Show the account's query limits (legacy API)
    Limits {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the IP address the service sees
    Ip,
    /// Print version and User-Agent
    Version,
    /// Inspect or edit the credential file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Email, username, domain, phone number, ...
    pub query: String,

    /// Search type (auto when omitted)
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<LookupType>,

    /// Maximum number of results (v2, at most 1000)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Results to skip (v2, at most 2500)
    #[arg(long)]
    pub offset: Option<u32>,

    /// Legacy endpoint to query
    #[arg(long, value_enum)]
    pub endpoint: Option<EndpointArg>,

    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Lookup endpoints selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointArg {
    Extended,
    Public,
    BreachCheck,
}

impl From<EndpointArg> for Endpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Extended => Endpoint::Extended,
            EndpointArg::Public => Endpoint::Public,
            EndpointArg::BreachCheck => Endpoint::BreachCheck,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the credential file (key masked)
    Show,
    /// Store a key and/or proxy in the credential file
    Set {
        /// API key; an empty value clears it
        #[arg(long)]
        key: Option<String>,
        /// Proxy URL; an empty value clears it
        #[arg(long)]
        proxy: Option<String>,
    },
}

impl fmt::Debug for ConfigCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("Show"),
            Self::Set { key, proxy } => f
                .debug_struct("Set")
                .field("key", &key.as_ref().map(|_| "<redacted>"))
                .field("proxy", proxy)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("should parse")
    }

    #[test]
    fn test_lookup_defaults() {
        let cli = parse(&["leakcheck", "lookup", "test@example.com"]);
        assert_eq!(cli.variant, ApiVariant::V2);
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.query, "test@example.com");
                assert!(args.kind.is_none());
                assert!(args.limit.is_none());
                assert!(args.endpoint.is_none());
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_with_options() {
        let cli = parse(&[
            "leakcheck",
            "--variant",
            "v1",
            "lookup",
            "example.com",
            "--type",
            "domain",
            "--endpoint",
            "breach-check",
            "--json",
            "-vv",
        ]);
        assert_eq!(cli.variant, ApiVariant::Legacy);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.kind, Some(LookupType::Domain));
                assert_eq!(args.endpoint.map(Endpoint::from), Some(Endpoint::BreachCheck));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&[
            "leakcheck",
            "limits",
            "--variant",
            "legacy",
            "--key",
            "abc",
            "--timeout",
            "5",
            "--config",
            "/tmp/creds.json",
        ]);
        assert_eq!(cli.variant, ApiVariant::Legacy);
        assert_eq!(cli.key.as_deref(), Some("abc"));
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/creds.json")));
        assert!(matches!(cli.command, Command::Limits { json: false }));
    }

    #[test]
    fn test_config_set() {
        let cli = parse(&["leakcheck", "config", "set", "--proxy", "socks5://127.0.0.1:9050"]);
        match cli.command {
            Command::Config(ConfigCommand::Set { key, proxy }) => {
                assert!(key.is_none());
                assert_eq!(proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_keys() {
        let key = "0123456789abcdef0123456789abcdef01234567";
        let cli = parse(&["leakcheck", "--key", key, "config", "set", "--key", key]);
        let debug = format!("{cli:?}");
        assert!(!debug.contains(key));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Cli::try_parse_from(["leakcheck", "--variant", "v3", "ip"]).is_err());
        assert!(Cli::try_parse_from(["leakcheck", "lookup", "x", "--type", "bogus"]).is_err());
        assert!(Cli::try_parse_from(["leakcheck", "lookup", "x", "--limit", "-1"]).is_err());
        assert!(Cli::try_parse_from(["leakcheck", "lookup"]).is_err());
    }
}
