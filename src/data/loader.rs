use crate::data::registry::VectorRegistry;
use crate::error::Result;
use crate::types::BooleanSequence;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk search problem: named signal columns plus the target column.
///
/// Values are loosely typed because the producers of these files emit
/// whatever their dataframe held (floats, bools, nulls).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFile {
    #[serde(default)]
    pub vectors: BTreeMap<String, Vec<Value>>,
    #[serde(alias = "seed")]
    pub target: Vec<Value>,
}

impl ProblemFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Coerce every value to 0/1 and build the registry
    pub fn into_registry(self) -> Result<VectorRegistry> {
        let vectors = self
            .vectors
            .into_iter()
            .map(|(name, values)| (name, coerce_sequence(&values)))
            .collect();
        VectorRegistry::new(vectors, coerce_sequence(&self.target))
    }
}

pub fn coerce_sequence(values: &[Value]) -> BooleanSequence {
    values.iter().map(coerce_flag).collect()
}

/// Missing and NaN become 0, anything else non-zero becomes 1
pub fn coerce_flag(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => u8::from(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f != 0.0 => 1,
            _ => 0,
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() && f != 0.0 => 1,
            _ => 0,
        },
        Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Free-form explanations keyed by signal name
pub fn load_explanations<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Value>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
