//! folio CLI: render MDX content pages to HTML.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render MDX content pages to HTML")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create folio.toml and a sample page in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Render one MDX file to HTML
    Render {
        /// MDX source file
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat links to this host as internal (overrides config)
        #[arg(long)]
        site_host: Option<String>,
    },

    /// Parse every .md/.mdx file under a directory and report errors
    Check {
        /// Content directory (defaults to config or "content")
        dir: Option<PathBuf>,
    },

    /// Print the theme stylesheet
    Css {
        /// Minify the output
        #[arg(long)]
        minify: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered output can be piped.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&PathBuf::from("."), yes)?;
        }
        Commands::Render {
            file,
            output,
            site_host,
        } => {
            let mut config = commands::load_config(&cli.config)?;
            if site_host.is_some() {
                config.render.site_host = site_host;
            }
            commands::render::run(config.render, &file, output.as_deref()).await?;
        }
        Commands::Check { dir } => {
            let config = commands::load_config(&cli.config)?;
            let dir = dir.unwrap_or(config.content_dir);
            commands::check::run(&dir)?;
        }
        Commands::Css { minify, output } => {
            let config = commands::load_config(&cli.config)?;
            commands::css::run(&config.render, minify, output.as_deref())?;
        }
    }

    Ok(())
}
