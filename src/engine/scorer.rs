//! Compatibility scorer — five ordered, thresholded rules over a profile
//! and a product, producing an auditable `ScoreBreakdown`.
//!
//! Pure and deterministic: same inputs, same breakdown. A rule whose
//! referenced nutrition field is absent does not fire.

use crate::models::{
    ChronicCondition, HealthGoal, HealthProfile, ProductRecord, RuleId, ScoreAdjustment,
    ScoreBreakdown,
};

/// Sugar threshold (g) for the diabetes scoring rule. Deliberately distinct
/// from the warning generator's 20 g threshold — see `insights::SUGAR_WARNING_G`.
pub const SUGAR_SCORE_G: f64 = 10.0;
/// Sodium threshold (mg) for the hypertension rule.
pub const SODIUM_SCORE_MG: f64 = 200.0;
/// Calorie threshold (kcal) for the weight-loss rule.
pub const CALORIES_SCORE_KCAL: f64 = 200.0;
/// Protein threshold (g) for the muscle-gain bonus rule.
pub const PROTEIN_SCORE_G: f64 = 15.0;

const ALLERGEN_DELTA: i32 = -30;
const DIABETES_SUGAR_DELTA: i32 = -20;
const HYPERTENSION_SODIUM_DELTA: i32 = -15;
const WEIGHT_LOSS_CALORIES_DELTA: i32 = -10;
const MUSCLE_GAIN_PROTEIN_DELTA: i32 = 15;

/// Case-insensitive substring match between a profile allergy and a product
/// allergen, in either direction ("peanut" vs "peanut butter", "đậu phộng"
/// vs "dầu đậu phộng").
pub(crate) fn allergen_matches(profile_allergy: &str, product_allergen: &str) -> bool {
    let a = profile_allergy.to_lowercase();
    let b = product_allergen.to_lowercase();
    !a.is_empty() && !b.is_empty() && (b.contains(&a) || a.contains(&b))
}

/// First product allergen that conflicts with any profile allergy.
pub(crate) fn first_allergen_conflict<'a>(
    profile: &HealthProfile,
    product: &'a ProductRecord,
) -> Option<&'a str> {
    product.allergens.iter().map(String::as_str).find(|allergen| {
        profile
            .allergies
            .iter()
            .any(|allergy| allergen_matches(allergy, allergen))
    })
}

/// Score a product against a profile. Rules apply in fixed order; each hit
/// records its delta and reason in the breakdown.
pub fn score(profile: &HealthProfile, product: &ProductRecord) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new();
    let nutrition = &product.nutrition;

    // Rule 1: allergen conflict fires once, no matter how many allergens match.
    if let Some(allergen) = first_allergen_conflict(profile, product) {
        breakdown.adjustments.push(ScoreAdjustment {
            rule: RuleId::AllergenConflict,
            delta: ALLERGEN_DELTA,
            reason: format!("Contains {allergen}, which matches a listed allergy"),
        });
    }

    if profile.has_condition(ChronicCondition::Diabetes) {
        if let Some(sugar) = nutrition.sugar_g.filter(|&s| s > SUGAR_SCORE_G) {
            breakdown.adjustments.push(ScoreAdjustment {
                rule: RuleId::DiabetesSugar,
                delta: DIABETES_SUGAR_DELTA,
                reason: format!("{sugar} g sugar with a diabetes condition (> {SUGAR_SCORE_G} g)"),
            });
        }
    }

    if profile.has_condition(ChronicCondition::Hypertension) {
        if let Some(sodium) = nutrition.sodium_mg.filter(|&s| s > SODIUM_SCORE_MG) {
            breakdown.adjustments.push(ScoreAdjustment {
                rule: RuleId::HypertensionSodium,
                delta: HYPERTENSION_SODIUM_DELTA,
                reason: format!(
                    "{sodium} mg sodium with a hypertension condition (> {SODIUM_SCORE_MG} mg)"
                ),
            });
        }
    }

    if profile.has_goal(HealthGoal::WeightLoss) {
        if let Some(kcal) = nutrition.calories_kcal.filter(|&c| c > CALORIES_SCORE_KCAL) {
            breakdown.adjustments.push(ScoreAdjustment {
                rule: RuleId::WeightLossCalories,
                delta: WEIGHT_LOSS_CALORIES_DELTA,
                reason: format!(
                    "{kcal} kcal against a weight-loss goal (> {CALORIES_SCORE_KCAL} kcal)"
                ),
            });
        }
    }

    if profile.has_goal(HealthGoal::MuscleGain) {
        if let Some(protein) = nutrition.protein_g.filter(|&p| p > PROTEIN_SCORE_G) {
            breakdown.adjustments.push(ScoreAdjustment {
                rule: RuleId::MuscleGainProtein,
                delta: MUSCLE_GAIN_PROTEIN_DELTA,
                reason: format!(
                    "{protein} g protein supports a muscle-gain goal (> {PROTEIN_SCORE_G} g)"
                ),
            });
        }
    }

    breakdown
}
