//! Profile-independent nutrient quality score, per 100 g.
//!
//! Separate from the compatibility score: this one rates the product on
//! its own merits and feeds the recommender ranking and history rows.

use crate::models::{GoalEntry, HealthGoal, HealthLevel, NutritionFacts};

/// Nutrient quality breakdown with human-readable reasons.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthScore {
    pub points: f64,
    pub reasons: Vec<String>,
}

impl HealthScore {
    /// Band thresholds: >= 5 suitable, >= 3 consider, >= 1 limit, else avoid.
    pub fn level(&self) -> HealthLevel {
        if self.points >= 5.0 {
            HealthLevel::Suitable
        } else if self.points >= 3.0 {
            HealthLevel::NeedsConsideration
        } else if self.points >= 1.0 {
            HealthLevel::Limit
        } else {
            HealthLevel::Avoid
        }
    }
}

/// Score per-100g nutrition facts. Goal-gated bonuses (protein, fiber)
/// only apply when the matching goal is present, mirroring how the
/// recommender personalizes ranking without touching the base heuristics.
pub fn health_score(nutrition: &NutritionFacts, goals: &[GoalEntry]) -> HealthScore {
    let mut points = 0.0;
    let mut reasons = Vec::new();

    if let Some(sugar) = nutrition.sugar_g {
        if sugar <= 5.0 {
            points += 2.0;
            reasons.push("Low sugar (≤5 g/100 g)".to_string());
        } else if sugar <= 8.0 {
            points += 1.0;
            reasons.push("Moderate sugar".to_string());
        } else {
            points -= 1.0;
            reasons.push("High sugar".to_string());
        }
    }

    if let Some(sodium) = nutrition.sodium_mg {
        if sodium <= 120.0 {
            points += 2.0;
            reasons.push("Low sodium (≤120 mg/100 g)".to_string());
        } else if sodium > 400.0 {
            points -= 1.0;
            reasons.push("High sodium".to_string());
        }
    }

    if let Some(satfat) = nutrition.saturated_fat_g {
        if satfat <= 3.0 {
            points += 1.0;
        } else if satfat > 5.0 {
            points -= 1.0;
        }
    }

    let wants_protein = goals.iter().any(|g| g.tag == HealthGoal::MuscleGain);
    let wants_fiber = goals.iter().any(|g| g.tag == HealthGoal::WeightLoss);

    if wants_protein {
        if let Some(protein) = nutrition.protein_g.filter(|&p| p >= 10.0) {
            points += 2.0;
            reasons.push(format!("High protein ({protein} g/100 g)"));
        }
    }
    if wants_fiber {
        if let Some(fiber) = nutrition.fiber_g.filter(|&f| f >= 5.0) {
            points += 1.0;
            reasons.push(format!("Notable fiber ({fiber} g/100 g)"));
        }
    }

    if nutrition.calories_kcal.is_some_and(|kcal| kcal > 480.0) {
        points -= 1.0;
        reasons.push("High energy density".to_string());
    }

    HealthScore { points, reasons }
}
