pub mod ai;
pub mod cli;
pub mod config;

pub use ai::{FaultKind, PredictError, PredictionClient, PredictionResponse};
pub use cli::{Cli, CommandHandler, Commands};
pub use config::Settings;
