mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "formpull",
    version,
    about = "Extract field and table data from returned PDF forms"
)]
struct Cli {
    /// Log progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract data from a PDF, or from every PDF in a directory
    Extract {
        /// Path to a PDF file or a directory of PDFs
        input: PathBuf,

        /// Directory for <name>_data.json files and combined_data.xlsx
        output_dir: PathBuf,

        /// JSON file of field -> regex replacing the built-in patterns
        #[arg(short, long, value_name = "FILE")]
        patterns: Option<PathBuf>,

        /// pdftotext executable
        #[arg(long, value_name = "PATH", env = "FORMPULL_PDFTOTEXT", default_value = "pdftotext")]
        pdftotext: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Collect saved *_data.json results into one spreadsheet
    Transfer {
        /// Directory containing extraction JSON files
        json_dir: PathBuf,

        /// Workbook to write
        output_file: PathBuf,
    },
    /// Inspect and validate field patterns
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },
}

#[derive(Subcommand)]
enum PatternsAction {
    /// List the built-in field patterns
    List,
    /// Validate a custom pattern file
    Validate {
        /// Path to JSON pattern file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "formpull_core=info,formpull=info"
    } else {
        "formpull_core=warn,formpull=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input,
            output_dir,
            patterns,
            pdftotext,
            output,
        } => commands::extract::run(input, output_dir, patterns, pdftotext, &output),
        Commands::Transfer {
            json_dir,
            output_file,
        } => commands::transfer::run(&json_dir, &output_file),
        Commands::Patterns { action } => match action {
            PatternsAction::List => commands::patterns::list(),
            PatternsAction::Validate { file } => commands::patterns::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
