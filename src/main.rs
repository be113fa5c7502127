//! `pagesync` CLI - map canvas points to typeset pages and source lines

mod cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use pagesync::{Settings, SyncError};

#[derive(Parser)]
#[command(name = "pagesync")]
#[command(about = "Map stacked-canvas coordinates to document pages and source lines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/pagesync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the per-page files
    #[arg(long, global = true)]
    pages_dir: Option<PathBuf>,

    /// Page file name prefix
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Page file extension (svg, eps, ps)
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Zero-padding width of page numbers in file names
    #[arg(long, global = true)]
    pad: Option<usize>,

    /// Width every page is scaled to on the canvas
    #[arg(long, global = true)]
    target_width: Option<f64>,

    /// Vertical gap between pages on the canvas
    #[arg(long, global = true)]
    spacing: Option<f64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Options shared by the commands that invoke synctex.
#[derive(clap::Args)]
struct OracleArgs {
    /// Typeset document the .synctex file belongs to (e.g. paper.pdf)
    #[arg(short, long)]
    document: PathBuf,

    /// Path to the synctex binary
    #[arg(long)]
    synctex: Option<PathBuf>,

    /// Seconds to wait for synctex before giving up
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved page layout
    Pages,

    /// Convert a canvas point to page coordinates
    #[command(allow_negative_numbers = true)]
    ToDocument {
        /// Canvas x
        x: f64,
        /// Canvas y
        y: f64,
    },

    /// Convert page coordinates to a canvas point
    #[command(allow_negative_numbers = true)]
    ToCanvas {
        /// 1-based page number
        page: u32,
        /// Page-native x
        x: f64,
        /// Page-native y
        y: f64,
    },

    /// Find the source line for a point
    #[command(allow_negative_numbers = true)]
    Source {
        /// Canvas x, or page-native x with --page
        x: f64,
        /// Canvas y, or page-native y with --page
        y: f64,

        /// Treat x/y as coordinates on this page instead of the canvas
        #[arg(short, long)]
        page: Option<u32>,

        #[command(flatten)]
        oracle: OracleArgs,
    },

    /// Find canvas positions for a source line
    Locate {
        /// Source file as recorded by synctex
        input: PathBuf,
        /// 1-based line number
        line: u32,

        /// Column within the line (0 = unknown)
        #[arg(short, long, default_value = "0")]
        column: u32,

        #[command(flatten)]
        oracle: OracleArgs,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::ToDocument { .. } => "to-document",
            Self::ToCanvas { .. } => "to-canvas",
            Self::Source { .. } => "source",
            Self::Locate { .. } => "locate",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            cmd::output::emit_usage_error(&e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose);

    let command = cli.command.name();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            cmd::output::emit_error(command, &e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the result line is the only thing on stdout.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// File settings with command-line overrides applied.
fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())
        .map_err(|e| SyncError::Configuration(format!("{e:#}")))?;

    if let Some(ref dir) = cli.pages_dir {
        settings.pages_dir.clone_from(dir);
    }
    if let Some(ref prefix) = cli.prefix {
        settings.prefix.clone_from(prefix);
    }
    if let Some(ref extension) = cli.extension {
        settings.extension.clone_from(extension);
    }
    if let Some(pad) = cli.pad {
        settings.pad_width = pad;
    }
    if let Some(width) = cli.target_width {
        settings.target_width = width;
    }
    if let Some(spacing) = cli.spacing {
        settings.spacing = spacing;
    }

    Ok(settings)
}

fn apply_oracle_args(settings: &mut Settings, args: &OracleArgs) {
    if let Some(ref path) = args.synctex {
        settings.synctex_path = Some(path.clone());
    }
    if let Some(secs) = args.timeout {
        settings.timeout_secs = secs;
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = settings(&cli)?;

    match cli.command {
        Commands::Pages => cmd::cmd_pages(&settings)?,
        Commands::ToDocument { x, y } => cmd::cmd_to_document(&settings, x, y)?,
        Commands::ToCanvas { page, x, y } => cmd::cmd_to_canvas(&settings, page, x, y)?,
        Commands::Source { x, y, page, oracle } => {
            apply_oracle_args(&mut settings, &oracle);
            cmd::cmd_source(&settings, &oracle.document, page, x, y).await?;
        }
        Commands::Locate {
            input,
            line,
            column,
            oracle,
        } => {
            apply_oracle_args(&mut settings, &oracle);
            cmd::cmd_locate(&settings, &oracle.document, &input, line, column).await?;
        }
    }

    Ok(())
}
