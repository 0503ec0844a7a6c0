mod commands;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagemap")]
#[command(version, about = "Sitemap and robots.txt generator for file-system routed sites", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a starter pagemap.toml
    Init {
        /// Site directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Base URL to put in the config
        #[arg(long)]
        base_url: Option<String>,

        /// Overwrite an existing pagemap.toml
        #[arg(long)]
        force: bool,
    },

    /// List discovered pages and whether they are excluded
    Routes {
        /// Site directory containing pagemap.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write sitemap.xml and robots.txt
    Build {
        /// Site directory containing pagemap.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, default_value = "public")]
        output: PathBuf,

        /// Override the configured base URL
        #[arg(long, env = "WEBSITE_URL")]
        base_url: Option<String>,
    },

    /// Serve /sitemap.xml and /robots.txt, rescanning on every request
    Serve {
        /// Site directory containing pagemap.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Override the configured base URL
        #[arg(long, env = "WEBSITE_URL")]
        base_url: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    match cli.command {
        Command::Init {
            path,
            base_url,
            force,
        } => commands::init::run(path, base_url, force),
        Command::Routes { path, json } => commands::routes::run(path, json),
        Command::Build {
            path,
            output,
            base_url,
        } => commands::build::run(path, output, base_url),
        Command::Serve {
            path,
            port,
            base_url,
        } => commands::serve::run(path, port, base_url).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "pagemap", &mut io::stdout());
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // Logs go to stderr so stdout stays clean for `routes --json` and completions
    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

/// Warnings from every crate, plus progress from the binary
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,pagemap=info",
        1 => "warn,pagemap=debug,pagemap_core=debug,pagemap_discovery=debug,pagemap_generator=debug",
        _ => "trace",
    }
}
