//! docnav CLI - post-build documentation tooling.
//!
//! Provides commands for:
//! - `toc`: Generate the standalone navigation sidebar
//! - `fix-links`: Rewrite malformed fragment links in rendered HTML
//! - `post-build`: Run both as a build-completion hook

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FixLinksArgs, PostBuildArgs, TocArgs};
use output::Output;

/// docnav - navigation and link post-processing for documentation builds.
#[derive(Parser)]
#[command(name = "docnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the navigation artifact from the source tree.
    Toc(TocArgs),
    /// Rewrite fragment-only links in the HTML output.
    FixLinks(FixLinksArgs),
    /// Run all post-build steps; failures are reported as warnings.
    PostBuild(PostBuildArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Toc(args) => args.common.verbose,
            Self::FixLinks(args) => args.common.verbose,
            Self::PostBuild(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Toc(args) => args.execute(),
        Commands::FixLinks(args) => args.execute(),
        Commands::PostBuild(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&err);
        std::process::exit(1);
    }
}
