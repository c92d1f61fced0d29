//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod serve;
mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "docwiz")]
#[command(about = "Guided document quality analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides config file)
    #[arg(long, global = true, env = "DOCWIZARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the wizard web server
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(short, long, env = "DOCWIZARD_BIND")]
        bind: Option<String>,
    },

    /// List the document types and their required elements
    Types {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the text extracted from a PDF, DOCX or TXT file
    Extract {
        /// File to read
        file: PathBuf,
    },

    /// Grade a document against a document type
    Analyze {
        /// File to analyze
        file: PathBuf,
        /// Document type id (see `docwiz types`)
        #[arg(short = 't', long = "type")]
        doc_type: String,
        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut settings, config) = load_settings(cli.config.as_deref()).await?;
    if let Some(data_dir) = cli.data_dir {
        settings.relocate_data_dir(data_dir, &config);
    }

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = serve::parse_bind_address(&bind);
            }
            serve::cmd_serve(&settings).await
        }
        Commands::Types { json } => types::cmd_types(json),
        Commands::Extract { file } => analyze::cmd_extract(&settings, &file).await,
        Commands::Analyze {
            file,
            doc_type,
            model,
            json,
        } => {
            if let Some(model) = model {
                settings.llm = settings.llm.with_model(&model);
            }
            analyze::cmd_analyze(&settings, &file, &doc_type, json).await
        }
    }
}
