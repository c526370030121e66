use serde::Serialize;

use super::PredictError;

/// Body of a prediction call: `{"text": <input>}`.
///
/// The input is borrowed and may be any serializable value; the service
/// owns whatever contract applies to it.
#[derive(Debug, Serialize)]
pub struct PredictionRequest<'a, T: Serialize + ?Sized> {
    pub text: &'a T,
}

impl<'a, T: Serialize + ?Sized> PredictionRequest<'a, T> {
    pub fn new(text: &'a T) -> Self {
        Self { text }
    }

    /// Encode up front so serialization faults never look like transport faults.
    pub fn to_body(&self) -> Result<Vec<u8>, PredictError> {
        serde_json::to_vec(self).map_err(PredictError::Encode)
    }
}
