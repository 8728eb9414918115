#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use thicket_core::config;
use thicket_core::error::ErrorCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "thicket: browse an issue export as a prioritized forest",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json, FORMAT, and user config).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output mode before any config file has been read.
    fn fallback_output(&self) -> OutputMode {
        match self.format {
            Some(mode) => mode,
            None if self.json => OutputMode::Json,
            None => OutputMode::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Print the issue forest",
        long_about = "Print issues as a forest: parents above children, most urgent work first.",
        after_help = "EXAMPLES:\n    # Print the forest from the configured export\n    thicket tree\n\n    # Expand everything, hide finished subtrees\n    thicket tree --all --hide-closed\n\n    # Read a specific export\n    thicket tree --file issues.jsonl --json"
    )]
    Tree(cmd::tree::TreeArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one issue",
        long_about = "Show one issue with its links and computed ranking state.",
        after_help = "EXAMPLES:\n    # Show an issue\n    thicket show tk-12\n\n    # Emit machine-readable output\n    thicket show tk-12 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Summarize the forest",
        long_about = "Count issues by computed state and report hierarchy shape.",
        after_help = "EXAMPLES:\n    # Print counters\n    thicket stats\n\n    # Emit machine-readable output\n    thicket stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    thicket completions bash\n\n    # Generate zsh completions\n    thicket completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("THICKET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "thicket=debug,info"
        } else {
            "thicket=info,warn"
        })
    });

    let format = env::var("THICKET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable in every output mode.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args, &mut command);
    }

    let project_root = env::current_dir()?;
    let config = match config::resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                cli.fallback_output(),
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };

    let ctx = cmd::Context {
        config: &config,
        project_root: &project_root,
        output: output::resolve_output_mode(cli.format, &config.resolved_output),
    };

    match cli.command {
        Commands::Tree(ref args) => cmd::tree::run_tree(args, &ctx),
        Commands::Show(ref args) => cmd::show::run_show(args, &ctx),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
