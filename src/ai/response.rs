use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded body of a prediction call, returned exactly as the service sent it.
///
/// Object keys keep the order they had on the wire. Use [`typed`](Self::typed)
/// or [`discovery`](Self::discovery) to opt into a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResponse(Value);

impl PredictionResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.0)
    }

    /// View the body as a molecule discovery result, when it has that shape.
    pub fn discovery(&self) -> Option<DiscoveryResult> {
        let object = self.0.as_object()?;
        if !object.contains_key("success") || !object.contains_key("results") {
            return None;
        }
        self.typed().ok()
    }
}

impl From<Value> for PredictionResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ============================================================================
// Molecule discovery schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiscoveryResult {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<Molecule>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Molecule {
    pub smiles: Option<String>,
    pub justification: Option<String>,
    /// Base64 PNG without the `data:` prefix.
    pub image: Option<String>,
    #[serde(default)]
    pub properties: MoleculeProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoleculeProperties {
    #[serde(rename = "pIC50")]
    pub pic50: Option<f64>,
    #[serde(rename = "logP")]
    pub log_p: Option<f64>,
    pub atom_count: Option<f64>,
}

impl DiscoveryResult {
    /// Number of molecules, preferring the service's own count.
    pub fn molecule_count(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }
}
