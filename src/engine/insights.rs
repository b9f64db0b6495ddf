//! Insight generators — four independent pure passes over a profile and a
//! product, each emitting an ordered list of natural-language findings.
//!
//! Each generator never fails and returns an empty list when nothing
//! matches. List order follows rule-match order. Wording stays calm and
//! informational; surfacing facts, not alarm or prescriptions.

use crate::models::{
    ChronicCondition, ExerciseFrequency, Gender, HealthGoal, HealthProfile, ProductRecord,
};

use super::scorer::{self, CALORIES_SCORE_KCAL, SODIUM_SCORE_MG, SUGAR_SCORE_G};

/// Sugar threshold (g) for the diabetic warning. Intentionally separate
/// from the scorer's 10 g rule threshold; the two are preserved as
/// independent thresholds.
pub const SUGAR_WARNING_G: f64 = 20.0;

/// Condition-derived notes first, then goal-derived notes.
pub fn health_impact(profile: &HealthProfile, product: &ProductRecord) -> Vec<String> {
    let mut impacts = Vec::new();
    let nutrition = &product.nutrition;

    for condition in &profile.chronic_conditions {
        match condition.tag {
            ChronicCondition::Diabetes => {
                if let Some(sugar) = nutrition.sugar_g.filter(|&s| s > SUGAR_SCORE_G) {
                    impacts.push(format!(
                        "With {sugar} g of sugar per serving, this product may raise \
                         blood glucose noticeably. You may want to account for it in \
                         your daily sugar budget."
                    ));
                }
            }
            ChronicCondition::Hypertension => {
                if let Some(sodium) = nutrition.sodium_mg.filter(|&s| s > SODIUM_SCORE_MG) {
                    impacts.push(format!(
                        "This product carries {sodium} mg of sodium per serving, \
                         which adds up quickly against a low-sodium target."
                    ));
                }
            }
            _ => {}
        }
    }

    for goal in &profile.health_goals {
        if goal.tag == HealthGoal::WeightLoss {
            match nutrition.calories_kcal {
                Some(kcal) if kcal > CALORIES_SCORE_KCAL => {
                    impacts.push(format!(
                        "At {kcal} kcal per serving, this is on the heavier side for \
                         a weight-loss plan."
                    ));
                }
                Some(kcal) => {
                    impacts.push(format!(
                        "At {kcal} kcal per serving, this fits comfortably into a \
                         weight-loss plan."
                    ));
                }
                None => {}
            }
        }
    }

    impacts
}

/// One warning per matching allergen (cumulative, unlike the scorer's
/// single-fire rule), then the diabetic sugar warning at its own threshold.
pub fn warnings(profile: &HealthProfile, product: &ProductRecord) -> Vec<String> {
    let mut warnings = Vec::new();

    for allergen in &product.allergens {
        let matched = profile
            .allergies
            .iter()
            .find(|allergy| scorer::allergen_matches(allergy, allergen));
        if let Some(allergy) = matched {
            warnings.push(format!(
                "Contains {allergen}, which matches your {allergy} allergy."
            ));
        }
    }

    if profile.has_condition(ChronicCondition::Diabetes) {
        if let Some(sugar) = product.nutrition.sugar_g.filter(|&s| s > SUGAR_WARNING_G) {
            warnings.push(format!(
                "Very high sugar content ({sugar} g per serving) for a diabetic profile."
            ));
        }
    }

    warnings
}

/// Age-band, gender+age, and exercise-frequency heuristics.
pub fn recommendations(profile: &HealthProfile, _product: &ProductRecord) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(age) = profile.age {
        if age < 18 {
            recommendations.push(
                "For growing bodies, pair packaged products like this with fresh \
                 fruit, vegetables, and dairy across the day."
                    .to_string(),
            );
        }
        if profile.gender == Some(Gender::Female) && age > 30 {
            recommendations.push(
                "Calcium and vitamin D intake matter for bone health at your age; \
                 check whether this product contributes either."
                    .to_string(),
            );
        }
    }

    match profile.exercise_frequency {
        Some(ExerciseFrequency::Active) => recommendations.push(
            "With your regular training schedule, timing this around workouts \
             helps put its energy to use."
                .to_string(),
        ),
        Some(ExerciseFrequency::Sedentary) => recommendations.push(
            "With a mostly sedentary routine, keeping portions of energy-dense \
             products small goes a long way."
                .to_string(),
        ),
        Some(ExerciseFrequency::Light) | Some(ExerciseFrequency::Moderate) => recommendations
            .push(
                "Balance this product against your activity level; moderate \
                 portions fit a moderate routine."
                    .to_string(),
            ),
        None => {}
    }

    recommendations
}

/// Positive findings: age-related, goal-related, then gender-related.
pub fn benefits(profile: &HealthProfile, product: &ProductRecord) -> Vec<String> {
    let mut benefits = Vec::new();

    if profile.age.is_some_and(|age| age > 50) {
        benefits.push(
            "Watching sodium and saturated fat supports cardiovascular and joint \
             health past 50; compare this label against lighter options."
                .to_string(),
        );
    }

    if profile.has_goal(HealthGoal::MuscleGain) {
        match product.nutrition.protein_g {
            Some(protein) if protein > scorer::PROTEIN_SCORE_G => benefits.push(format!(
                "{protein} g of protein per serving supports your muscle-gain goal."
            )),
            _ => benefits.push(
                "For a muscle-gain goal, favor products with substantial protein \
                 per serving."
                    .to_string(),
            ),
        }
    }

    if profile.gender == Some(Gender::Female) {
        benefits.push(
            "Iron, calcium, and folate are nutrients worth tracking; products \
             listing them prominently earn a place in your rotation."
                .to_string(),
        );
    }

    benefits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionFacts;

    fn profile_with(conditions: &[&str], goals: &[&str], allergies: &[&str]) -> HealthProfile {
        HealthProfile::from_raw(
            None,
            None,
            &allergies.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            &conditions.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            &goals.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            None,
            None,
        )
    }

    fn product_with(allergens: &[&str], nutrition: NutritionFacts) -> ProductRecord {
        ProductRecord {
            name: "Test Snack".into(),
            brand: "TestBrand".into(),
            allergens: allergens.iter().map(|s| s.to_string()).collect(),
            ingredients: vec![],
            nutrition,
            raw: serde_json::Value::Null,
        }
    }

    // ───────────────────────────────────────
    // health impact
    // ───────────────────────────────────────

    #[test]
    fn impact_glycemic_note_above_10g() {
        let profile = profile_with(&["diabetes"], &[], &[]);
        let product = product_with(
            &[],
            NutritionFacts {
                sugar_g: Some(15.0),
                ..Default::default()
            },
        );
        let impacts = health_impact(&profile, &product);
        assert_eq!(impacts.len(), 1);
        assert!(impacts[0].contains("blood glucose"));
    }

    #[test]
    fn impact_conditions_come_before_goals() {
        let profile = profile_with(&["hypertension"], &["weight_loss"], &[]);
        let product = product_with(
            &[],
            NutritionFacts {
                sodium_mg: Some(400.0),
                calories_kcal: Some(120.0),
                ..Default::default()
            },
        );
        let impacts = health_impact(&profile, &product);
        assert_eq!(impacts.len(), 2);
        assert!(impacts[0].contains("sodium"));
        assert!(impacts[1].contains("weight-loss"));
    }

    #[test]
    fn impact_weight_loss_low_calories_is_supportive() {
        let profile = profile_with(&[], &["weight_loss"], &[]);
        let product = product_with(
            &[],
            NutritionFacts {
                calories_kcal: Some(90.0),
                ..Default::default()
            },
        );
        let impacts = health_impact(&profile, &product);
        assert_eq!(impacts.len(), 1);
        assert!(impacts[0].contains("fits comfortably"));
    }

    #[test]
    fn impact_empty_when_fields_absent() {
        let profile = profile_with(&["diabetes"], &["weight_loss"], &[]);
        let product = product_with(&[], NutritionFacts::default());
        assert!(health_impact(&profile, &product).is_empty());
    }

    // ───────────────────────────────────────
    // warnings
    // ───────────────────────────────────────

    #[test]
    fn one_warning_per_matching_allergen() {
        let profile = profile_with(&[], &[], &["peanut", "milk"]);
        let product = product_with(
            &["peanut butter", "milk powder", "rice"],
            NutritionFacts::default(),
        );
        let warnings = warnings(&profile, &product);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("peanut butter"));
        assert!(warnings[1].contains("milk powder"));
    }

    #[test]
    fn sugar_warning_only_above_20g() {
        let profile = profile_with(&["diabetes"], &[], &[]);

        let at_15 = product_with(
            &[],
            NutritionFacts {
                sugar_g: Some(15.0),
                ..Default::default()
            },
        );
        assert!(warnings(&profile, &at_15).is_empty());

        let at_25 = product_with(
            &[],
            NutritionFacts {
                sugar_g: Some(25.0),
                ..Default::default()
            },
        );
        let result = warnings(&profile, &at_25);
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("sugar"));
    }

    #[test]
    fn sugar_warning_needs_diabetes_condition() {
        let profile = profile_with(&[], &[], &[]);
        let product = product_with(
            &[],
            NutritionFacts {
                sugar_g: Some(30.0),
                ..Default::default()
            },
        );
        assert!(warnings(&profile, &product).is_empty());
    }

    // ───────────────────────────────────────
    // recommendations
    // ───────────────────────────────────────

    #[test]
    fn pediatric_framing_under_18() {
        let mut profile = HealthProfile::empty();
        profile.age = Some(14);
        let recs = recommendations(&profile, &ProductRecord::empty());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("growing"));
    }

    #[test]
    fn bone_health_framing_for_women_over_30() {
        let mut profile = HealthProfile::empty();
        profile.age = Some(35);
        profile.gender = Some(Gender::Female);
        let recs = recommendations(&profile, &ProductRecord::empty());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("bone health"));
    }

    #[test]
    fn no_bone_health_framing_at_30_exactly() {
        let mut profile = HealthProfile::empty();
        profile.age = Some(30);
        profile.gender = Some(Gender::Female);
        // age > 30 strictly; gender-benefit lives in benefits(), not here
        assert!(recommendations(&profile, &ProductRecord::empty()).is_empty());
    }

    #[test]
    fn exercise_framing_varies_by_frequency() {
        let mut profile = HealthProfile::empty();
        profile.exercise_frequency = Some(ExerciseFrequency::Active);
        let active = recommendations(&profile, &ProductRecord::empty());
        assert!(active[0].contains("training"));

        profile.exercise_frequency = Some(ExerciseFrequency::Sedentary);
        let sedentary = recommendations(&profile, &ProductRecord::empty());
        assert!(sedentary[0].contains("portions"));
    }

    // ───────────────────────────────────────
    // benefits
    // ───────────────────────────────────────

    #[test]
    fn over_50_gets_cardiovascular_framing() {
        let mut profile = HealthProfile::empty();
        profile.age = Some(55);
        let result = benefits(&profile, &ProductRecord::empty());
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("cardiovascular"));
    }

    #[test]
    fn muscle_gain_with_high_protein_is_specific() {
        let profile = profile_with(&[], &["muscle_gain"], &[]);
        let product = product_with(
            &[],
            NutritionFacts {
                protein_g: Some(20.0),
                ..Default::default()
            },
        );
        let result = benefits(&profile, &product);
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("20 g of protein"));
    }

    #[test]
    fn muscle_gain_without_protein_data_is_generic() {
        let profile = profile_with(&[], &["muscle_gain"], &[]);
        let result = benefits(&profile, &ProductRecord::empty());
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("protein"));
    }

    #[test]
    fn female_profile_gets_nutrition_framing() {
        let mut profile = HealthProfile::empty();
        profile.gender = Some(Gender::Female);
        let result = benefits(&profile, &ProductRecord::empty());
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("Iron"));
    }

    #[test]
    fn all_generators_empty_for_empty_inputs() {
        let profile = HealthProfile::empty();
        let product = ProductRecord::empty();
        assert!(health_impact(&profile, &product).is_empty());
        assert!(warnings(&profile, &product).is_empty());
        assert!(recommendations(&profile, &product).is_empty());
        assert!(benefits(&profile, &product).is_empty());
    }
}
