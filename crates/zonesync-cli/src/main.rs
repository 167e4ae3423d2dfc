// # zonesync - One-Shot DNS Reconciler
//
// This binary is a THIN integration layer:
// 1. Read configuration from flags and environment variables
// 2. Initialize logging
// 3. Register providers and wire up the resolver
// 4. Run a single sync or delete pass and print the action report
//
// All reconciliation logic lives in zonesync-core. Do not add decision,
// retry, or provider logic here.
//
// ## Configuration
//
// Every flag falls back to an environment variable:
//
// - `--fqdn`              / `ZONESYNC_FQDN`
// - `--record-name`       / `ZONESYNC_RECORD_NAME`
// - `--public-endpoint`   / `ZONESYNC_PUBLIC_ENDPOINT` (comma-separated)
// - `--cloudflare-token`  / `CF_API_KEY`
// - `--cloudflare-email`  / `CF_API_EMAIL`
// - `--env-file`          / `ZONESYNC_ENV_FILE`
//
// The env file, when given, is loaded before flag parsing so that values
// in it satisfy the fallbacks above.
//
// ## Example
//
// ```bash
// export CF_API_KEY=your_api_token
// zonesync sync --fqdn vpn.example.com
//
// # Preview what a delete would remove
// zonesync delete --fqdn vpn.example.com --dry-run
// ```

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use zonesync_core::{ProviderConfig, ProviderRegistry, PublicIpResolver, Reconciler, SyncConfig};
use zonesync_ip_http::HttpEchoClient;

#[derive(Parser)]
#[command(name = "zonesync")]
#[command(version)]
#[command(about = "Point a DNS record at this machine's current public IP")]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the public IP and reconcile the record toward it
    Sync(RunArgs),

    /// Delete every record at the target name matching the public IP's kind
    ///
    /// This removes ALL matching records, including records that were never
    /// created by this tool. Run with --dry-run first to see what would go.
    Delete(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Fully qualified domain name to manage; the zone is derived from it
    #[arg(long, env = "ZONESYNC_FQDN")]
    fqdn: String,

    /// Record name to manage instead of the fqdn (zone still from --fqdn)
    #[arg(long, env = "ZONESYNC_RECORD_NAME")]
    record_name: Option<String>,

    /// Public-IP echo endpoint, tried in order; repeat or comma-separate
    #[arg(
        long = "public-endpoint",
        env = "ZONESYNC_PUBLIC_ENDPOINT",
        value_delimiter = ','
    )]
    public_endpoints: Vec<String>,

    /// Cloudflare API token, or the global API key when --cloudflare-email
    /// is set
    #[arg(long, env = "CF_API_KEY", hide_env_values = true)]
    cloudflare_token: String,

    /// Cloudflare account email; switches auth to the legacy global key
    #[arg(long, env = "CF_API_EMAIL")]
    cloudflare_email: Option<String>,

    /// Load environment variables from this file before reading any others
    ///
    /// Consumed by a pre-parse scan of argv; declared here so clap accepts
    /// the flag and documents it.
    #[arg(long, env = "ZONESYNC_ENV_FILE")]
    #[allow(dead_code)]
    env_file: Option<PathBuf>,

    /// Log intended changes without sending any write to the provider
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn to_config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(
            ProviderConfig::Cloudflare {
                api_token: self.cloudflare_token.clone(),
                email: self.cloudflare_email.clone(),
            },
            self.fqdn.clone(),
        );

        if !self.public_endpoints.is_empty() {
            config.endpoints = self.public_endpoints.clone();
        }
        config.record_name = self.record_name.clone();
        config.dry_run = self.dry_run;

        config
    }
}

/// Extract an `--env-file` value from raw arguments
///
/// Runs before clap so the file's variables can satisfy the env fallbacks
/// of every other flag. Handles both `--env-file path` and `--env-file=path`.
fn env_file_from_args<I, S>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        if arg == "--env-file" {
            return args.next().map(|value| PathBuf::from(value.as_ref()));
        }
        if let Some(value) = arg.strip_prefix("--env-file=") {
            return Some(PathBuf::from(value));
        }
    }
    None
}

/// Load the env file named on the command line or in ZONESYNC_ENV_FILE
///
/// An explicitly named file that cannot be read is a hard error; a typo'd
/// path silently falling through to ambient variables would be worse.
fn load_env_file() -> Result<()> {
    let path = env_file_from_args(env::args().skip(1))
        .or_else(|| env::var("ZONESYNC_ENV_FILE").ok().map(PathBuf::from));

    if let Some(path) = path {
        dotenvy::from_path(&path)
            .with_context(|| format!("failed to load env file: {}", path.display()))?;
    }

    Ok(())
}

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(verbosity))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Catch credential mistakes before the first API call
///
/// Cloudflare tokens are typically 40 characters and global keys 37; a
/// short value or an obvious placeholder means a misconfigured shell, and
/// the API's 403 would be less helpful than this message.
fn preflight_token(token: &str) -> Result<()> {
    if token.len() < 20 {
        bail!(
            "Cloudflare credential appears too short ({} chars). \
            Set it via: export CF_API_KEY=your_token or --cloudflare-token",
            token.len()
        );
    }

    let lower = token.to_lowercase();
    if lower.contains("your_token")
        || lower.contains("replace_me")
        || lower.contains("example")
        || lower == "token"
    {
        bail!(
            "Cloudflare credential appears to be a placeholder. \
            Use an actual API token from the Cloudflare dashboard."
        );
    }

    Ok(())
}

/// Validate configuration and wire up the resolver and reconciler
fn prepare(args: &RunArgs) -> Result<(SyncConfig, PublicIpResolver, Reconciler)> {
    preflight_token(&args.cloudflare_token)?;

    let config = args.to_config();
    config.validate()?;

    let registry = ProviderRegistry::new();
    zonesync_provider_cloudflare::register(&registry);
    let provider = registry.create_provider(&config.provider)?;

    let client = HttpEchoClient::new()?;
    let resolver = PublicIpResolver::new(Box::new(client), config.endpoints.clone())?;
    let reconciler = Reconciler::new(provider, config.dry_run);

    Ok((config, resolver, reconciler))
}

async fn run_sync(args: RunArgs) -> Result<()> {
    let (config, resolver, reconciler) = prepare(&args)?;
    info!("Managing record: {}", config.target_name());

    let resolved = resolver.resolve().await?;
    let actions = reconciler
        .sync(&resolved, &config.fqdn, config.record_name.as_deref())
        .await?;

    for action in &actions {
        println!("{action}");
    }

    Ok(())
}

async fn run_delete(args: RunArgs) -> Result<()> {
    let (config, resolver, reconciler) = prepare(&args)?;
    info!("Deleting records at: {}", config.target_name());

    let resolved = resolver.resolve().await?;
    let actions = reconciler
        .delete(&resolved, &config.fqdn, config.record_name.as_deref())
        .await?;

    if actions.is_empty() {
        println!("no matching records");
    }
    for action in &actions {
        println!("{action}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Sync(args) => run_sync(args).await,
        Command::Delete(args) => run_delete(args).await,
    }
}
