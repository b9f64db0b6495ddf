//! Personalized compatibility engine — the single evaluation entry point.
//!
//! `evaluate` runs the scorer and the four insight generators over one
//! (profile, product) pair and assembles an immutable `PersonalizedReport`.
//! Everything here is synchronous, side-effect-free, and total: missing or
//! partial data produces a neutral result, never an error. Concurrent
//! evaluations are independent — each call works on borrowed immutable
//! inputs and returns a freshly-owned report.

pub mod health_score;
pub mod insights;
pub mod scorer;
pub mod verdict;

pub use health_score::{health_score, HealthScore};
pub use verdict::Verdict;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{HealthProfile, PersonalizedReport, ProductRecord, ScoreBreakdown};

/// Evaluate a product against a profile. `None` for either input yields the
/// neutral report (score 50, empty insight lists) — the caller never fails
/// on missing data.
pub fn evaluate(
    profile: Option<&HealthProfile>,
    product: Option<&ProductRecord>,
) -> PersonalizedReport {
    let (Some(profile), Some(product)) = (profile, product) else {
        tracing::debug!("evaluate called with missing input; returning neutral report");
        return assemble(ScoreBreakdown::new(), vec![], vec![], vec![], vec![]);
    };

    let breakdown = scorer::score(profile, product);
    tracing::debug!(
        score = breakdown.final_score(),
        rules_fired = breakdown.adjustments.len(),
        product = %product.name,
        "compatibility evaluated"
    );

    assemble(
        breakdown,
        insights::health_impact(profile, product),
        insights::warnings(profile, product),
        insights::recommendations(profile, product),
        insights::benefits(profile, product),
    )
}

/// Merge scorer and generator outputs into one immutable report. Pure
/// aggregation: stamps the generation time and fresh snapshot ids, performs
/// no recomputation, and copies all inputs.
pub fn assemble(
    breakdown: ScoreBreakdown,
    health_impact: Vec<String>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
    benefits: Vec<String>,
) -> PersonalizedReport {
    PersonalizedReport {
        compatibility_score: breakdown.final_score(),
        health_impact,
        warnings,
        recommendations,
        benefits,
        generated_at: Utc::now(),
        profile_snapshot_id: Uuid::new_v4(),
        product_snapshot_id: Uuid::new_v4(),
        detailed_analysis: None,
    }
}

/// Classify a compatibility score into its verdict band.
pub fn classify_verdict(score: u8) -> Verdict {
    Verdict::classify(score)
}
