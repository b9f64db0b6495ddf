//! Verdict classification — maps a compatibility score to its display band.

use serde::{Deserialize, Serialize};

/// Compatibility band shown to the user. Pure function of the score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighlyCompatible,
    Compatible,
    NeedsConsideration,
    NotCompatible,
}

impl Verdict {
    /// Band boundaries: >= 80, >= 60, >= 40, below.
    pub fn classify(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::HighlyCompatible,
            60..=79 => Self::Compatible,
            40..=59 => Self::NeedsConsideration,
            _ => Self::NotCompatible,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyCompatible => "highly_compatible",
            Self::Compatible => "compatible",
            Self::NeedsConsideration => "needs_consideration",
            Self::NotCompatible => "not_compatible",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlyCompatible => "Highly compatible",
            Self::Compatible => "Compatible",
            Self::NeedsConsideration => "Needs consideration",
            Self::NotCompatible => "Not compatible",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(Verdict::classify(100), Verdict::HighlyCompatible);
        assert_eq!(Verdict::classify(80), Verdict::HighlyCompatible);
        assert_eq!(Verdict::classify(79), Verdict::Compatible);
        assert_eq!(Verdict::classify(60), Verdict::Compatible);
        assert_eq!(Verdict::classify(59), Verdict::NeedsConsideration);
        assert_eq!(Verdict::classify(50), Verdict::NeedsConsideration);
        assert_eq!(Verdict::classify(40), Verdict::NeedsConsideration);
        assert_eq!(Verdict::classify(39), Verdict::NotCompatible);
        assert_eq!(Verdict::classify(0), Verdict::NotCompatible);
    }

    #[test]
    fn labels_match_contract() {
        assert_eq!(Verdict::HighlyCompatible.label(), "Highly compatible");
        assert_eq!(Verdict::Compatible.label(), "Compatible");
        assert_eq!(Verdict::NeedsConsideration.label(), "Needs consideration");
        assert_eq!(Verdict::NotCompatible.label(), "Not compatible");
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::NeedsConsideration).unwrap();
        assert_eq!(json, "\"needs_consideration\"");
    }
}
