use anyhow::Result;
use clap::Parser;
use log::error;

use predictor::cli::PredictOptions;
use predictor::{Cli, CommandHandler, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only errors unless asked otherwise
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    // Handle version early
    if matches!(cli.command, Some(Commands::Version)) {
        println!("{}", CommandHandler::version_info());
        return Ok(());
    }

    let handler = match CommandHandler::from_overrides(cli.base_url.clone(), cli.timeout) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to initialize predictor: {e:#}");
            eprintln!("Error: Failed to initialize predictor: {e:#}");
            std::process::exit(1);
        }
    };

    let options = PredictOptions::from(&cli);

    match cli.command {
        Some(command) => match handler.handle_command(command).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                error!("Command failed: {e:#}");
                eprintln!("{}", handler.format_failure(&e));
                std::process::exit(1);
            }
        },
        None => {
            if let Some(ref text) = cli.text {
                match handler.handle_predict(text, &options).await {
                    Ok(response) => println!("{}", handler.format_response(&response, options.raw)),
                    Err(e) => {
                        error!("Prediction failed: {e:#}");
                        eprintln!("{}", handler.format_failure(&e));
                        std::process::exit(1);
                    }
                }
            } else {
                let help = r#"Predictor - send text to a local prediction service

Usage:
  predictor [OPTIONS] <TEXT>
  predictor [COMMAND]

Examples:
  predictor "I love this"
  predictor --json '{"pic50_min": 5, "pic50_max": 8}'
  predictor --base-url http://10.0.0.5:8000 --timeout 10 "hello"

Commands:
  init      Write the default configuration file
  config    Show configuration
  health    Check that the prediction service is up
  version   Show version information
  help      Show this help message

Options:
      --json          Parse TEXT as JSON before sending
      --base-url      Prediction service address
      --timeout       Give up after this many seconds
      --raw           Print the decoded response as JSON only
  -v, --verbose       Verbose output
  -h, --help          Print help
"#;
                println!("{help}");
            }
        }
    }

    Ok(())
}
