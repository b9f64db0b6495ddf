//! User health profile — normalized demographic, condition, and goal data.
//!
//! Free-text condition/goal strings from profile screens are resolved into
//! tagged vocabulary entries at this ingestion boundary; the engine only
//! matches on tags. The original free text survives as a display label.
//! The resolver recognizes both English and Vietnamese wording since
//! existing profiles store Vietnamese labels.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::enums::{ChronicCondition, ExerciseFrequency, Gender, HealthGoal};

// ═══════════════════════════════════════════
// Tagged vocabulary entries
// ═══════════════════════════════════════════

/// A chronic condition with its resolved tag and the user's own wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub tag: ChronicCondition,
    pub label: String,
}

/// A health goal with its resolved tag and the user's own wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEntry {
    pub tag: HealthGoal,
    pub label: String,
}

struct VocabPattern<T> {
    regex: Regex,
    tag: T,
}

fn vocab<T>(regex_str: &str, tag: T) -> VocabPattern<T> {
    VocabPattern {
        regex: Regex::new(regex_str).expect("Invalid vocabulary pattern"),
        tag,
    }
}

static CONDITION_VOCAB: LazyLock<Vec<VocabPattern<ChronicCondition>>> = LazyLock::new(|| {
    vec![
        vocab(
            r"(?i)diabet|blood\s+sugar|tiểu\s*đường|đái\s*tháo\s*đường",
            ChronicCondition::Diabetes,
        ),
        vocab(
            r"(?i)hypertens|high\s+blood\s+pressure|huyết\s*áp",
            ChronicCondition::Hypertension,
        ),
        vocab(
            r"(?i)heart|cardiac|cardio|tim\s*mạch",
            ChronicCondition::HeartDisease,
        ),
        vocab(r"(?i)kidney|renal|thận", ChronicCondition::KidneyDisease),
    ]
});

static GOAL_VOCAB: LazyLock<Vec<VocabPattern<HealthGoal>>> = LazyLock::new(|| {
    vec![
        vocab(
            r"(?i)weight[\s_-]*loss|lose\s+weight|slim|giảm\s*cân|giảm\s*mỡ",
            HealthGoal::WeightLoss,
        ),
        vocab(
            r"(?i)muscle|bulk|tăng\s*cơ",
            HealthGoal::MuscleGain,
        ),
        vocab(
            r"(?i)general|overall|wellness|sức\s*khỏe",
            HealthGoal::GeneralHealth,
        ),
    ]
});

static EXERCISE_VOCAB: LazyLock<Vec<VocabPattern<ExerciseFrequency>>> = LazyLock::new(|| {
    vec![
        vocab(
            r"(?i)sedentary|rarely|never|ít\s*vận\s*động|không",
            ExerciseFrequency::Sedentary,
        ),
        vocab(
            r"(?i)daily|every\s*day|[5-7]\s*(?:times|buổi)|active|hằng\s*ngày|thường\s*xuyên",
            ExerciseFrequency::Active,
        ),
        vocab(
            r"(?i)[3-4]\s*(?:times|buổi)|moderate|vừa\s*phải",
            ExerciseFrequency::Moderate,
        ),
        vocab(
            r"(?i)[1-2]\s*(?:times|buổi)|light|occasional|nhẹ",
            ExerciseFrequency::Light,
        ),
    ]
});

impl ConditionEntry {
    /// Resolve a free-text condition label to its tag. Unrecognized text
    /// maps to `ChronicCondition::Other` — never an error, since profile
    /// screens accept arbitrary wording.
    pub fn resolve(label: &str) -> Self {
        let tag = CONDITION_VOCAB
            .iter()
            .find(|p| p.regex.is_match(label))
            .map(|p| p.tag)
            .unwrap_or(ChronicCondition::Other);
        Self {
            tag,
            label: label.trim().to_string(),
        }
    }
}

impl GoalEntry {
    /// Resolve a free-text goal label to its tag (see `ConditionEntry::resolve`).
    pub fn resolve(label: &str) -> Self {
        let tag = GOAL_VOCAB
            .iter()
            .find(|p| p.regex.is_match(label))
            .map(|p| p.tag)
            .unwrap_or(HealthGoal::Other);
        Self {
            tag,
            label: label.trim().to_string(),
        }
    }
}

/// Resolve free-text exercise frequency ("3-4 times a week", "hằng ngày").
/// Returns `None` for unrecognized text — frequency framing is optional.
pub fn resolve_exercise_frequency(label: &str) -> Option<ExerciseFrequency> {
    EXERCISE_VOCAB
        .iter()
        .find(|p| p.regex.is_match(label))
        .map(|p| p.tag)
}

// ═══════════════════════════════════════════
// HealthProfile
// ═══════════════════════════════════════════

/// Normalized user health/demographic/preference record.
///
/// Empty collections mean "no constraints", never "unknown". An entirely
/// empty profile is valid and produces the neutral evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<ConditionEntry>,
    pub health_goals: Vec<GoalEntry>,
    pub exercise_frequency: Option<ExerciseFrequency>,
    pub diet_type: Option<String>,
}

impl HealthProfile {
    /// An empty profile — no constraints, neutral evaluation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a profile from raw screen input, resolving free text at the
    /// ingestion boundary. Allergies are trimmed and deduplicated
    /// case-insensitively, preserving first-seen order.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        age: Option<u32>,
        gender: Option<Gender>,
        allergies: &[String],
        conditions: &[String],
        goals: &[String],
        exercise_frequency: Option<&str>,
        diet_type: Option<&str>,
    ) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let mut deduped = Vec::new();
        for a in allergies {
            let trimmed = a.trim();
            if trimmed.is_empty() {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if !seen.contains(&lower) {
                seen.push(lower);
                deduped.push(trimmed.to_string());
            }
        }

        Self {
            age,
            gender,
            allergies: deduped,
            chronic_conditions: conditions
                .iter()
                .filter(|c| !c.trim().is_empty())
                .map(|c| ConditionEntry::resolve(c))
                .collect(),
            health_goals: goals
                .iter()
                .filter(|g| !g.trim().is_empty())
                .map(|g| GoalEntry::resolve(g))
                .collect(),
            exercise_frequency: exercise_frequency.and_then(resolve_exercise_frequency),
            diet_type: diet_type
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        }
    }

    pub fn has_condition(&self, tag: ChronicCondition) -> bool {
        self.chronic_conditions.iter().any(|c| c.tag == tag)
    }

    pub fn has_goal(&self, tag: HealthGoal) -> bool {
        self.health_goals.iter().any(|g| g.tag == tag)
    }
}

/// Source of the current user profile. The engine never reads globals —
/// callers obtain a profile here and pass it into `evaluate` explicitly.
pub trait ProfileProvider {
    fn current_profile(&self) -> HealthProfile;
}
