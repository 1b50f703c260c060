use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mcr",
    about = "Store and look up JSON records on MultiChain streams",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where the node lives. Flags override values read from `--config`.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// TOML file with host, port, username, password and secure
    #[arg(long, global = true, env = "MCR_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, env = "MCR_HOST")]
    pub host: Option<String>,
    #[arg(long, global = true, env = "MCR_PORT")]
    pub port: Option<u16>,
    #[arg(long, global = true, env = "MCR_USER")]
    pub user: Option<String>,
    #[arg(long, global = true, env = "MCR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Use https
    #[arg(long, global = true, env = "MCR_SECURE")]
    pub secure: bool,
    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "MCR_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the record stored under a key
    Find(LookupArgs),
    /// Report whether a key is present in a stream
    Exists(LookupArgs),
    /// Publish a JSON document, refusing keys that already exist
    Publish(PublishArgs),
}

#[derive(Args)]
pub struct LookupArgs {
    pub stream: String,
    pub key: String,
}

#[derive(Args)]
pub struct PublishArgs {
    pub stream: String,
    /// Top-level field holding the record key
    #[arg(long, default_value = "id")]
    pub key_field: String,
    /// The document, as a JSON object
    pub json: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_find() {
        let cli = Cli::try_parse_from(["mcr", "find", "contract", "c-1"]).unwrap();
        if let Command::Find(args) = cli.command {
            assert_eq!(args.stream, "contract");
            assert_eq!(args.key, "c-1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_exists() {
        let cli = Cli::try_parse_from(["mcr", "exists", "contract", "c-1"]).unwrap();
        assert!(matches!(cli.command, Command::Exists(_)));
    }

    #[test]
    fn parse_publish() {
        let cli = Cli::try_parse_from([
            "mcr", "publish", "docs", "--key-field", "sku", r#"{"sku":"A-1"}"#,
        ])
        .unwrap();
        if let Command::Publish(args) = cli.command {
            assert_eq!(args.stream, "docs");
            assert_eq!(args.key_field, "sku");
            assert_eq!(args.json, r#"{"sku":"A-1"}"#);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn publish_key_field_defaults_to_id() {
        let cli = Cli::try_parse_from(["mcr", "publish", "docs", "{}"]).unwrap();
        if let Command::Publish(args) = cli.command {
            assert_eq!(args.key_field, "id");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_connection_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mcr", "find", "s", "k", "--host", "node", "--port", "9560", "--user", "u",
            "--password", "p", "--secure", "--timeout", "5",
        ])
        .unwrap();
        assert_eq!(cli.connection.host.as_deref(), Some("node"));
        assert_eq!(cli.connection.port, Some(9560));
        assert_eq!(cli.connection.user.as_deref(), Some("u"));
        assert_eq!(cli.connection.password.as_deref(), Some("p"));
        assert!(cli.connection.secure);
        assert_eq!(cli.connection.timeout, Some(5));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["mcr", "--config", "node.toml", "exists", "s", "k"]).unwrap();
        assert_eq!(cli.connection.config, Some(PathBuf::from("node.toml")));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["mcr", "--format", "json", "exists", "s", "k"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn port_must_be_numeric() {
        assert!(Cli::try_parse_from(["mcr", "find", "s", "k", "--port", "abc"]).is_err());
    }

    #[test]
    fn missing_key_is_rejected() {
        assert!(Cli::try_parse_from(["mcr", "find", "s"]).is_err());
    }
}
