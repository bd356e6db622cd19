use crate::error::{Result, SigcomboError};
use crate::types::BooleanSequence;
use std::collections::BTreeMap;

/// Name used in errors that concern the target sequence
pub const TARGET_NAME: &str = "target";

/// Immutable mapping of signal name -> boolean sequence, plus the target.
///
/// Every sequence shares one length, checked once here so that nothing
/// downstream has to re-check it per generation. Names are kept sorted so
/// that a seeded search draws them in a reproducible order.
#[derive(Debug, Clone)]
pub struct VectorRegistry {
    vectors: BTreeMap<String, BooleanSequence>,
    names: Vec<String>,
    target: BooleanSequence,
}

impl VectorRegistry {
    pub fn new(
        vectors: BTreeMap<String, BooleanSequence>,
        target: BooleanSequence,
    ) -> Result<Self> {
        Self::validate_binary(TARGET_NAME, &target)?;

        for (name, sequence) in &vectors {
            if sequence.len() != target.len() {
                return Err(SigcomboError::LengthMismatch {
                    name: name.clone(),
                    expected: target.len(),
                    actual: sequence.len(),
                });
            }
            Self::validate_binary(name, sequence)?;
        }

        let names = vectors.keys().cloned().collect();

        Ok(Self {
            vectors,
            names,
            target,
        })
    }

    /// Convenience constructor for literal inputs
    pub fn from_pairs<I, S>(pairs: I, target: BooleanSequence) -> Result<Self>
    where
        I: IntoIterator<Item = (S, BooleanSequence)>,
        S: Into<String>,
    {
        let vectors = pairs
            .into_iter()
            .map(|(name, sequence)| (name.into(), sequence))
            .collect();
        Self::new(vectors, target)
    }

    fn validate_binary(name: &str, sequence: &[u8]) -> Result<()> {
        match sequence.iter().position(|&v| v > 1) {
            Some(index) => Err(SigcomboError::NonBinaryValue {
                name: name.to_string(),
                index,
                value: sequence[index],
            }),
            None => Ok(()),
        }
    }

    /// All registered names, sorted
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&BooleanSequence> {
        self.vectors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// The shared length T
    pub fn sequence_len(&self) -> usize {
        self.target.len()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
