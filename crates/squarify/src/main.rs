//! squarify CLI - crop image content and center it on a white square.
//!
//! Finds the dark content of a scan or photo, crops to it, resizes it to a
//! fixed height and pads it onto a square white canvas, written as JPEG.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a file into a 256px square
//! squarify normalize scan.png -o scan-square.jpg
//!
//! # Base64 in, base64 out
//! squarify normalize --base64 @scan.b64 --emit-base64
//!
//! # Read from stdin with custom geometry
//! cat scan.png | squarify normalize --stdin --target-height 100 --finish-size 128 -o out.jpg
//!
//! # View configuration
//! squarify config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// squarify - crop image content and center it on a white square.
#[derive(Parser, Debug)]
#[command(name = "squarify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize one image onto a square canvas
    Normalize(cli::normalize::NormalizeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match squarify_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `squarify config path`."
            );
            squarify_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("squarify v{}", squarify_core::VERSION);

    match cli.command {
        Commands::Normalize(args) => cli::normalize::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_normalize_with_globals() {
        let cli = Cli::try_parse_from([
            "squarify",
            "normalize",
            "scan.png",
            "-o",
            "out.jpg",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(!cli.json_logs);
        match cli.command {
            Commands::Normalize(args) => {
                assert_eq!(args.input.as_deref(), Some(std::path::Path::new("scan.png")));
                assert_eq!(args.output.as_deref(), Some(std::path::Path::new("out.jpg")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_config_init_force() {
        let cli = Cli::try_parse_from(["squarify", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(cli::config::ConfigArgs {
                command: cli::config::ConfigCommand::Init { force: true }
            })
        ));
    }
}
