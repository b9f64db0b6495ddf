//! Scanned product record — normalized nutrition, ingredient, and allergen
//! facts as delivered by the upstream label-analysis service.
//!
//! Upstream values are untrusted OCR output: numbers arrive as numbers,
//! numeric strings, or garbage. `NutritionFacts::from_value` sanitizes at
//! this boundary so the engine only ever sees clean `Option<f64>` fields.
//! An absent field means "unknown — rule does not fire", never "zero".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partial per-serving nutrition map. Present values are finite and
/// non-negative; anything else is sanitized to `None` at ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
}

/// Coerce an upstream JSON value to a usable nutrient amount.
/// Accepts numbers and numeric strings ("12.5"); rejects negatives,
/// NaN/infinity, and anything non-numeric.
fn sanitize_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n >= 0.0 {
        Some(n)
    } else {
        None
    }
}

impl NutritionFacts {
    /// Extract nutrition facts from an upstream JSON object, tolerating the
    /// key variants the analysis service has been seen to emit.
    pub fn from_value(value: &Value) -> Self {
        let field = |keys: &[&str]| -> Option<f64> {
            let obj = value.as_object()?;
            keys.iter()
                .find_map(|k| obj.get(*k))
                .and_then(sanitize_number)
        };

        Self {
            sugar_g: field(&["sugar_g", "sugars_g", "sugar"]),
            sodium_mg: field(&["sodium_mg", "sodium"]),
            calories_kcal: field(&["calories_kcal", "energy_kcal", "calories"]),
            protein_g: field(&["protein_g", "protein"]),
            fat_g: field(&["fat_g", "fat"]),
            saturated_fat_g: field(&["saturated_fat_g", "satfat_g", "saturated_fat"]),
            fiber_g: field(&["fiber_g", "fiber"]),
        }
    }
}

/// Normalized facts for one scanned product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub brand: String,
    pub allergens: Vec<String>,
    pub ingredients: Vec<String>,
    pub nutrition: NutritionFacts,
    /// The original analysis payload, carried so history replay can
    /// re-render details without re-scanning.
    #[serde(default)]
    pub raw: Value,
}

impl ProductRecord {
    /// A product with no known facts — every rule stays inapplicable.
    pub fn empty() -> Self {
        Self::default()
    }
}
