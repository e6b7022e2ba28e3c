use gcool_core::errors::{ErrorInfo, VolError};
use serde::{Deserialize, Serialize};

use crate::polytope::HPolytope;

/// Serializes the polytope to a JSON string.
pub fn polytope_to_json(polytope: &HPolytope) -> Result<String, VolError> {
    let serializable = SerializablePolytope::from_polytope(polytope);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| VolError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a polytope from a JSON string.
pub fn polytope_from_json(json: &str) -> Result<HPolytope, VolError> {
    let serializable: SerializablePolytope = serde_json::from_str(json)
        .map_err(|err| VolError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_polytope()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializablePolytope {
    rows: Vec<Vec<f64>>,
    offsets: Vec<f64>,
}

impl SerializablePolytope {
    fn from_polytope(polytope: &HPolytope) -> Self {
        Self {
            rows: polytope.rows(),
            offsets: polytope.offsets().iter().copied().collect(),
        }
    }

    fn into_polytope(self) -> Result<HPolytope, VolError> {
        HPolytope::from_rows(&self.rows, &self.offsets)
    }
}
