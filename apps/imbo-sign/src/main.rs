//! imbo-sign - print signed Imbo URLs and signature headers.
//!
//! Reads credentials from the environment, derives the credential for one
//! request and writes it to stdout. Nothing is sent over the network.
//!
//! # Usage
//!
//! ```text
//! imbo-sign url <URI>
//! imbo-sign headers <METHOD> <URI> [TIMESTAMP]
//! imbo-sign query <METHOD> <URI> [TIMESTAMP]
//! ```
//!
//! The timestamp defaults to the current time.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IMBO_USER` | *(required)* | User owning the resources |
//! | `IMBO_PUBLIC_KEY` | `IMBO_USER` | Public key presented to the server |
//! | `IMBO_PRIVATE_KEY` | *(required)* | Shared private key |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use imbo_auth::{RequestSigner, SignerConfig, Timestamp};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imbo-sign")]
#[command(about = "Print signed Imbo URLs and signature headers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// What to derive for the request.
#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Append an access token to a read URI
    Url {
        /// Absolute resource URI, including any transformations
        uri: String,
    },
    /// Print the signature headers for a write request
    Headers(WriteRequest),
    /// Print the write URI with signature and timestamp query parameters
    Query(WriteRequest),
}

#[derive(Debug, PartialEq, Eq, Args)]
struct WriteRequest {
    /// HTTP method, case-insensitive
    method: String,
    /// Absolute resource URI
    uri: String,
    /// Timestamp to sign (`YYYY-MM-DDTHH:MM:SSZ`), defaults to now
    timestamp: Option<Timestamp>,
}

impl WriteRequest {
    fn method(&self) -> String {
        self.method.to_ascii_uppercase()
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp.clone().unwrap_or_else(Timestamp::now)
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Derive the output lines for `command`.
fn run(signer: &RequestSigner, command: &Command) -> Result<Vec<String>> {
    let lines = match command {
        Command::Url { uri } => vec![signer.sign_url(uri).context("failed to sign URL")?],
        Command::Headers(request) => signer
            .signature_headers(&request.method(), &request.uri, &request.timestamp())
            .context("failed to derive signature headers")?
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect(),
        Command::Query(request) => vec![
            signer
                .sign_url_query(&request.method(), &request.uri, &request.timestamp())
                .context("failed to sign URL")?,
        ],
    };
    Ok(lines)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SignerConfig::from_env();
    init_tracing(config.log_level())?;

    debug!(command = ?cli.command, "Parsed command");

    let signer = RequestSigner::from_config(&config).context("invalid signer configuration")?;
    info!(
        user = %signer.credentials().user(),
        public_key = %signer.credentials().public_key(),
        "Loaded credentials"
    );

    for line in run(&signer, &cli.command)? {
        println!("{line}");
    }

    Ok(())
}
