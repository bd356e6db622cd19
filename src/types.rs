use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered 0/1 values, one per time step
pub type BooleanSequence = Vec<u8>;

/// Expression string returned when no individual was ever valid
pub const NO_SOLUTION_EXPRESSION: &str = "No valid expression found";

/// Binary combinator used by operator nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::And, Operator::Or];

    pub fn apply(self, left: u8, right: u8) -> u8 {
        match self {
            Operator::And => left & right,
            Operator::Or => left | right,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Hamming distance with an explicit "worse than anything" value.
///
/// Variant order matters: every `Finite` distance compares less than
/// `Infinite`, so `min`/`<` work directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(usize),
    Infinite,
}

impl Distance {
    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn as_finite(&self) -> Option<usize> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Infinite => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Infinite => f.write_str("inf"),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distance::Finite(d) => serializer.serialize_u64(*d as u64),
            Distance::Infinite => serializer.serialize_str("infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Finite(usize),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Finite(d) => Ok(Distance::Finite(d)),
            Repr::Text(s) if s.eq_ignore_ascii_case("infinity") || s.eq_ignore_ascii_case("inf") => {
                Ok(Distance::Infinite)
            }
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "invalid distance: {}",
                s
            ))),
        }
    }
}

/// Final answer of one search run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub expression: String,
    pub result_sequence: BooleanSequence,
    pub hamming_distance: Distance,
    /// Leaf names of the winning tree, left to right
    #[serde(default)]
    pub signals: Vec<String>,
}

impl SearchOutcome {
    /// Sentinel for runs where every individual was `None`
    pub fn no_solution(length: usize) -> Self {
        Self {
            expression: NO_SOLUTION_EXPRESSION.to_string(),
            result_sequence: vec![0; length],
            hamming_distance: Distance::Infinite,
            signals: Vec::new(),
        }
    }

    pub fn is_solution(&self) -> bool {
        self.hamming_distance.is_finite()
    }
}

/// One signal scored on its own against the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalScore {
    pub name: String,
    pub distance: usize,
}
