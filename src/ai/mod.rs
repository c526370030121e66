pub mod error;
pub mod prediction_client;
pub mod request;
pub mod response;

pub use error::{FaultKind, PredictError};
pub use prediction_client::PredictionClient;
pub use request::PredictionRequest;
pub use response::{DiscoveryResult, Molecule, MoleculeProperties, PredictionResponse};
