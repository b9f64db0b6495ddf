//! Evaluation output types — the auditable score breakdown and the
//! immutable personalized report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed starting point for every evaluation.
pub const BASE_SCORE: i32 = 50;

/// Identifies which scoring rule produced an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    AllergenConflict,
    DiabetesSugar,
    HypertensionSodium,
    WeightLossCalories,
    MuscleGainProtein,
}

/// One applied rule: which rule, how much, and why (audit trace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub rule: RuleId,
    pub delta: i32,
    pub reason: String,
}

/// The scorer's full output: base score plus the ordered rule trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub adjustments: Vec<ScoreAdjustment>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self {
            base: BASE_SCORE,
            adjustments: Vec::new(),
        }
    }

    /// Sum of base and deltas, clamped to [0, 100].
    pub fn final_score(&self) -> u8 {
        let total: i32 = self.base + self.adjustments.iter().map(|a| a.delta).sum::<i32>();
        total.clamp(0, 100) as u8
    }
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine's complete output for one (profile, product) evaluation.
///
/// Immutable once created: it holds copies, not references, of its inputs.
/// A re-scan produces a new report instance; reports are never mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedReport {
    pub compatibility_score: u8,
    pub health_impact: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub benefits: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub profile_snapshot_id: Uuid,
    pub product_snapshot_id: Uuid,
    /// Narrative appended by the optional remote collaborator. Absent until
    /// (and unless) the remote call succeeds; never replaces local output.
    pub detailed_analysis: Option<String>,
}

impl PersonalizedReport {
    /// Return a copy of this report with the remote narrative appended.
    /// The original report is untouched; a second narrative is appended as
    /// a new paragraph rather than overwriting the first.
    pub fn with_narrative(&self, narrative: &str) -> Self {
        let mut report = self.clone();
        report.detailed_analysis = match &self.detailed_analysis {
            Some(existing) => Some(format!("{existing}\n\n{narrative}")),
            None => Some(narrative.to_string()),
        };
        report
    }
}
