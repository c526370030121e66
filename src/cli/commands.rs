use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::time::Duration;

use crate::ai::{PredictError, PredictionClient, PredictionResponse};
use crate::cli::{Commands, OutputFormatter, PredictOptions, Spinner};
use crate::config::{DefaultConfig, Settings};

pub struct CommandHandler {
    client: PredictionClient,
    settings: Settings,
    formatter: OutputFormatter,
}

impl CommandHandler {
    pub fn new() -> Result<Self> {
        Self::with_settings(Settings::load()?)
    }

    pub fn with_settings(settings: Settings) -> Result<Self> {
        let client = PredictionClient::from_settings(&settings.service)
            .context("Failed to create prediction client")?;
        let formatter =
            OutputFormatter::new(settings.output.use_colors, settings.output.pretty_json);

        Ok(Self {
            client,
            settings,
            formatter,
        })
    }

    /// Applies command line overrides on top of the loaded settings.
    pub fn from_overrides(base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        let mut settings = Settings::load()?;
        if let Some(base_url) = base_url {
            settings.service.base_url = base_url;
        }
        if let Some(timeout_secs) = timeout_secs {
            settings.service.timeout_secs = timeout_secs;
        }
        Self::with_settings(settings)
    }

    /// Submits `text` and waits for the result; Ctrl-C cancels the request.
    pub async fn handle_predict(
        &self,
        text: &str,
        options: &PredictOptions,
    ) -> Result<PredictionResponse> {
        debug!("Processing input of {} bytes", text.len());

        let json_input = if options.json {
            let value: Value = serde_json::from_str(text).context("TEXT is not valid JSON")?;
            Some(value)
        } else {
            None
        };

        let cancel = async {
            // If the handler can't be installed, never cancel
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        let spinner = Spinner::new("Waiting for prediction...");
        let result = match &json_input {
            Some(value) => self.client.predict_with_cancel(value, cancel).await,
            None => self.client.predict_with_cancel(text, cancel).await,
        };
        spinner.stop();

        Ok(result?)
    }

    pub fn format_response(&self, response: &PredictionResponse, raw: bool) -> String {
        self.formatter.format_response(response, raw)
    }

    pub async fn handle_command(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Init { force } => self.handle_init(force),
            Commands::Config => self.handle_config(),
            Commands::Health => self.handle_health().await,
            Commands::Version => Ok(Self::version_info()),
        }
    }

    fn handle_init(&self, force: bool) -> Result<String> {
        let config_path = self.settings.get_config_path()?;

        if config_path.exists() && !force {
            return Ok(self.formatter.format_info(&format!(
                "Configuration already exists at {} (use --force to overwrite)",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&config_path, DefaultConfig::create_default_config_file())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        info!("Wrote default configuration to {}", config_path.display());
        Ok(self.formatter.format_success(&format!(
            "Configuration written to {}",
            config_path.display()
        )))
    }

    fn handle_config(&self) -> Result<String> {
        let service = &self.settings.service;
        Ok(format!(
            "Predictor Configuration:\n\
            - Config file: {:?}\n\
            - Base URL: {}\n\
            - Predict endpoint: {}\n\
            - Health endpoint: {}\n\
            - Timeout: {:?}\n\
            - Use colors: {}\n\
            - Pretty JSON: {}",
            self.settings.get_config_path()?,
            self.client.base_url(),
            self.client.predict_url(),
            self.client.health_url(),
            Duration::from_secs(service.timeout_secs),
            self.settings.output.use_colors,
            self.settings.output.pretty_json
        ))
    }

    async fn handle_health(&self) -> Result<String> {
        let spinner = Spinner::new("Checking prediction service...");
        let result = self.client.health().await;
        spinner.stop();

        let body = result?;
        Ok(format!(
            "{}\n{}",
            self.formatter
                .format_success(&format!("Service up at {}", self.client.health_url())),
            self.formatter.format_json(&body)
        ))
    }

    pub fn version_info() -> String {
        format!(
            "predictor {}\nRust version: {}\nPlatform: {}-{}",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    }

    /// Formats a failed command, using the fault wording when one is inside.
    pub fn format_failure(&self, error: &anyhow::Error) -> String {
        match error.downcast_ref::<PredictError>() {
            Some(fault) => self.formatter.format_fault(fault),
            None => self.formatter.format_error(&format!("{error:#}")),
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        self.formatter.format_error(message)
    }
}
