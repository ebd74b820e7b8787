mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "themeloc", version, about = "Theme locale synchronization toolkit (Rust)")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill, retranslate and prune target locales against the authoritative tree
    Sync {
        #[arg(long)]
        locales_dir: Option<PathBuf>,
        #[arg(long)]
        source_lang: Option<String>,
        /// Translation provider: azure | dummy
        #[arg(long)]
        provider: Option<String>,
        /// Restrict to one document kind: storefront | schema
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value = "text")]
        format: String,
        /// Per-call provider timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show the change set between the snapshot and the authoritative tree
    Diff {
        #[arg(long)]
        locales_dir: Option<PathBuf>,
        #[arg(long)]
        source_lang: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value = "text")]
        format: String,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("starting command: {}", cmd_name);

        let result = match self {
            Commands::Sync {
                locales_dir,
                source_lang,
                provider,
                kind,
                dry_run,
                format,
                timeout_ms,
            } => commands::sync::run_sync(
                locales_dir,
                source_lang,
                provider,
                kind,
                dry_run,
                format,
                timeout_ms,
                use_color,
            ),

            Commands::Diff {
                locales_dir,
                source_lang,
                kind,
                format,
            } => commands::diff::run_diff(locales_dir, source_lang, kind, format, use_color),
        };

        match &result {
            Ok(_) => info!("finished command: {}", cmd_name),
            Err(e) => error!("command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "themeloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
