//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zoi_types::{MalformedCellPolicy, NamingStrategy, OutputFormat, ValueMode};

#[derive(Parser)]
#[command(name = "zoi-checker")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Zone-of-inhibition upload service and CSV lookup")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.config/zoi-checker/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV dataset used by lookups
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Python interpreter command for the detector
    #[arg(long, global = true)]
    pub python: Option<String>,

    /// Output format (json, table)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// How uploads are named in the working directory
        #[arg(long)]
        naming: Option<NamingStrategy>,
    },

    /// Look an image up in the CSV dataset by its base name
    Check {
        /// Path to image file
        image: PathBuf,

        /// Report numbers or the raw cell text
        #[arg(long)]
        value_mode: Option<ValueMode>,

        /// Fail on non-numeric cells, or report them as null
        #[arg(long)]
        malformed_cells: Option<MalformedCellPolicy>,
    },

    /// Run the external detector on an image
    Detect {
        /// Path to image file
        image: PathBuf,

        /// Detector timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show configuration
    Config {
        /// Write the current file settings (or defaults) to the config file
        #[arg(long)]
        init: bool,
    },
}
