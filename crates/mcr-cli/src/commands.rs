use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use mcr_client::{ClientConfig, MultiChainClient, Transport};
use mcr_repository::{EntityMetadata, JsonFieldMetadata, StreamRepository};
use mcr_types::StreamName;
use serde_json::{json, Value};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = client_config(&cli.connection)?;
    tracing::debug!(endpoint = %config.endpoint(), "connecting");
    let client = Arc::new(MultiChainClient::connect(&config)?);
    execute(cli.command, &cli.format, client, &mut std::io::stdout()).await
}

/// Build the connection settings from `--config` and the individual flags.
pub fn client_config(args: &ConnectionArgs) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let Some(host) = &args.host else {
                bail!("no node given: pass --config or --host (MCR_HOST)");
            };
            ClientConfig::new(
                host.as_str(),
                args.port.unwrap_or_default(),
                args.user.clone().unwrap_or_default(),
                args.password.clone().unwrap_or_default(),
            )
        }
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(user) = &args.user {
        config.username = user.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    if args.secure {
        config.secure = true;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = Some(secs);
    }
    config.validate()?;
    Ok(config)
}

pub async fn execute<T: Transport>(
    command: Command,
    format: &OutputFormat,
    client: Arc<MultiChainClient<T>>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Find(args) => cmd_find(args, format, client, out).await,
        Command::Exists(args) => cmd_exists(args, format, client, out).await,
        Command::Publish(args) => cmd_publish(args, format, client, out).await,
    }
}

async fn cmd_find<T: Transport>(
    args: LookupArgs,
    format: &OutputFormat,
    client: Arc<MultiChainClient<T>>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let stream = StreamName::new(&args.stream)?;
    let metadata = JsonFieldMetadata::for_stream(stream.clone());
    let repo: StreamRepository<Value, T, _> = StreamRepository::with_metadata(client, metadata);
    let key = args.key.trim();
    let record = repo
        .find_by_key(key)
        .await
        .with_context(|| format!("looking up {key} in stream {stream}"))?;

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", json!({ "stream": stream.as_str(), "key": key, "record": record }))?;
        }
        OutputFormat::Text => match record {
            Some(doc) => writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?,
            None => writeln!(out, "No record {} in stream {}", key.yellow(), stream.as_str().bold())?,
        },
    }
    Ok(())
}

async fn cmd_exists<T: Transport>(
    args: LookupArgs,
    format: &OutputFormat,
    client: Arc<MultiChainClient<T>>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let stream = StreamName::new(&args.stream)?;
    let metadata = JsonFieldMetadata::for_stream(stream.clone());
    let repo: StreamRepository<Value, T, _> = StreamRepository::with_metadata(client, metadata);
    let key = args.key.trim();
    let exists = repo
        .exists_by_key(key)
        .await
        .with_context(|| format!("looking up {key} in stream {stream}"))?;

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", json!({ "stream": stream.as_str(), "key": key, "exists": exists }))?;
        }
        OutputFormat::Text => {
            let answer = if exists { "yes".green() } else { "no".red() };
            writeln!(out, "{}/{}: {}", stream.as_str().bold(), key.yellow(), answer)?;
        }
    }
    Ok(())
}

async fn cmd_publish<T: Transport>(
    args: PublishArgs,
    format: &OutputFormat,
    client: Arc<MultiChainClient<T>>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let doc: Value = serde_json::from_str(&args.json).context("document is not valid JSON")?;
    if !doc.is_object() {
        bail!("document must be a JSON object");
    }

    let stream = StreamName::new(&args.stream)?;
    let metadata = JsonFieldMetadata::new(stream.clone(), args.key_field.as_str());
    let key = metadata.key(&doc).unwrap_or_default().trim().to_string();
    let repo = StreamRepository::with_metadata(client, metadata);
    repo.save(doc)
        .await
        .with_context(|| format!("publishing to stream {stream}"))?;

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", json!({ "stream": stream.as_str(), "key": key, "published": true }))?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} Published {} to {}", "✓".green().bold(), key.yellow(), stream.as_str().bold())?;
        }
    }
    Ok(())
}
