use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "predictor")]
#[command(about = "Send text to a local prediction service and show the result")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    /// The text to submit for prediction
    pub text: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Parse TEXT as JSON and submit the resulting value
    #[arg(long)]
    pub json: bool,

    /// Prediction service address, overriding the config file
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the decoded response as JSON only
    #[arg(long)]
    pub raw: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Show configuration
    Config,
    /// Check that the prediction service is up
    Health,
    /// Show version information
    Version,
}

#[derive(Debug, Clone)]
pub struct PredictOptions {
    pub json: bool,
    pub raw: bool,
    pub verbose: bool,
}

impl From<&Cli> for PredictOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            raw: cli.raw,
            verbose: cli.verbose,
        }
    }
}
