use std::{
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use everypay_gpay_sdk::EveryPayClient;
use tracing_subscriber::EnvFilter;

mod manifest;
mod output;
mod payment;
mod process_payment;
mod session;

use manifest::{Credentials, Manifest};
use output::OutputFormat;

#[derive(Clone, Debug)]
pub struct Context {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub credentials: Credentials,
    pub format: OutputFormat,
}

impl Context {
    pub fn client(&self) -> EveryPayClient {
        EveryPayClient::new(&self.credentials.api_url)
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "EveryPay Google Pay - EveryPay API command line tool", long_about = None)]
struct Opts {
    /// Path to the everypay.yaml manifest file
    #[arg(
        long = "manifest-path",
        short = 'm',
        global = true,
        default_value = "./everypay.yaml"
    )]
    manifest_path: PathBuf,

    /// EveryPay API username (overrides apiUsername in the manifest)
    #[arg(long = "api-username", global = true, env = "EVERYPAY_API_USERNAME")]
    api_username: Option<String>,

    /// EveryPay API secret
    #[arg(
        long = "api-secret",
        global = true,
        env = "EVERYPAY_API_SECRET",
        hide_env_values = true
    )]
    api_secret: Option<String>,

    /// EveryPay API base URL (e.g. https://igw-demo.every-pay.com)
    #[arg(long = "api-url", global = true, env = "EVERYPAY_API_URL")]
    api_url: Option<String>,

    /// Output format: json or yaml
    #[arg(long = "format", short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Open a Google Pay session and print the merchant and gateway ids
    OpenSession(session::OpenSessionCommand),
    /// Create a one-off payment and print its merchant info
    CreatePayment(payment::CreatePaymentCommand),
    /// Produce the backendData a merchant backend hands to the app
    BackendData(payment::BackendDataCommand),
    /// Submit a Google Pay token to EveryPay
    ProcessPayment(process_payment::ProcessPaymentCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load .env before clap reads the EVERYPAY_* variables
    let early_manifest_path = manifest_path_from_args();
    load_env_file(
        early_manifest_path
            .parent()
            .unwrap_or_else(|| Path::new(".")),
    );

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    let manifest = match Manifest::load(&opts.manifest_path) {
        Ok(manifest) => {
            eprintln!("✓ Loaded manifest from {}", opts.manifest_path.display());
            manifest
        }
        Err(e) => {
            eprintln!("Warning: {}", e);
            eprintln!("Using default configuration...");
            Manifest::default()
        }
    };

    let credentials = match Credentials::resolve(
        &manifest.everypay,
        opts.api_username.as_deref(),
        opts.api_secret.as_deref(),
        opts.api_url.as_deref(),
    ) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let ctx = Context {
        manifest_path: opts.manifest_path.clone(),
        manifest,
        credentials,
        format: opts.format.clone(),
    };

    if let Err(e) = handle_command(opts.command, &ctx).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// `-m`/`--manifest-path` from the raw arguments, before full parsing
fn manifest_path_from_args() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "-m" || arg == "--manifest-path" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--manifest-path=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from("./everypay.yaml")
}

/// Load environment variables from .env file in the manifest directory
fn load_env_file(manifest_dir: &Path) {
    let env_file_path = manifest_dir.join(".env");

    match dotenvy::from_path(&env_file_path) {
        Ok(_) => {
            eprintln!("✓ Loaded environment from {}", env_file_path.display());
        }
        Err(e) if e.not_found() => {}
        Err(e) => {
            eprintln!(
                "Warning: Failed to load .env file at {}: {}",
                env_file_path.display(),
                e
            );
        }
    }
}

async fn handle_command(command: Command, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Command::OpenSession(cmd) => cmd.execute(ctx).await,
        Command::CreatePayment(cmd) => cmd.execute(ctx).await,
        Command::BackendData(cmd) => cmd.execute(ctx).await,
        Command::ProcessPayment(cmd) => cmd.execute(ctx).await,
    }
}
