use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for criteria. Shares the id space with [`ChoiceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub u32);

/// Identifier wrapper for choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub u32);

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named, weighted dimension of comparison. Importance may be negative or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub importance: f64,
}

impl Criterion {
    pub fn new(id: CriterionId, name: impl Into<String>, importance: f64) -> Self {
        Self {
            id,
            name: name.into(),
            importance,
        }
    }

    /// Row label used by the result table, e.g. `Price (2.0)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, format_number(self.importance))
    }
}

/// Named candidate being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub name: String,
}

impl Choice {
    pub fn new(id: ChoiceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Rejected score construction.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("a score must be positive and should be <= 10 (got {value})")]
pub struct InvalidScore {
    pub value: f64,
}

/// Non-negative rating of one choice against one criterion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// Substituted for every unscored (choice, criterion) pair.
    pub const AVERAGE: Score = Score(5.0);

    pub fn new(value: f64) -> Result<Self, InvalidScore> {
        // NaN fails the comparison as well.
        if value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(InvalidScore { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = InvalidScore;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.0))
    }
}

/// Shortest round-trip rendering with a decimal part (`2.0`, `8.5`, `-1.25`). Magnitudes below
/// `1e-4` or from `1e16` up use exponent form (`1e-5`, `2.5e16`).
pub(crate) fn format_number(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_score_is_rejected() {
        let err = Score::new(-1.0).expect_err("negative scores fail");
        assert_eq!(err, InvalidScore { value: -1.0 });
        assert!(Score::new(f64::NAN).is_err());
    }

    #[test]
    fn scores_above_ten_are_tolerated() {
        let score = Score::new(12.5).expect("large scores are allowed");
        assert_eq!(score.value(), 12.5);
        assert_eq!(Score::new(0.0).expect("zero is valid").value(), 0.0);
    }

    #[test]
    fn labels_keep_a_decimal_part() {
        let criterion = Criterion::new(CriterionId(0), "Price", 2.0);
        assert_eq!(criterion.label(), "Price (2.0)");
        assert_eq!(Score::AVERAGE.to_string(), "5.0");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(0.00001), "1e-5");
        assert_eq!(format_number(2.5e16), "2.5e16");
    }

    #[test]
    fn score_deserialization_validates() {
        let ok: Score = serde_json::from_str("7.5").expect("valid score");
        assert_eq!(ok.value(), 7.5);
        assert!(serde_json::from_str::<Score>("-3").is_err());
    }
}
