//! Scan history — persisted analysis results and aggregate statistics.
//!
//! Repository functions over a `rusqlite::Connection`. Each saved scan is a
//! self-contained snapshot (report fields + product facts + raw payload) so
//! the history screen re-renders directly from storage without recomputing
//! anything. History is capped at 100 rows; oldest entries are evicted.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{NutritionFacts, PersonalizedReport, ProductRecord};

/// Maximum rows kept in history.
pub const MAX_HISTORY_ROWS: usize = 100;
/// How many scans the statistics view surfaces as "recent".
pub const RECENT_WINDOW: usize = 5;

// ═══════════════════════════════════════════
// Persisted shape
// ═══════════════════════════════════════════

/// One saved scan, in the exact JSON shape the history screens consume.
/// Round-trips losslessly through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScan {
    pub id: String,
    pub product_name: String,
    pub brand: String,
    /// YYYY-MM-DD, derived from scan_time for display grouping.
    pub scan_date: String,
    pub scan_time: DateTime<Utc>,
    pub compatibility_score: u8,
    pub health_score: f64,
    pub nutrition_facts: Option<NutritionFacts>,
    pub ingredients: Vec<String>,
    pub warnings: Vec<String>,
    pub allergens: Vec<String>,
    pub recommendations: Vec<String>,
    pub health_impact: Vec<String>,
    /// Original analysis payload, kept for the detail view.
    pub raw_product_data: Value,
}

impl StoredScan {
    /// Snapshot a report + product into a history row.
    pub fn from_report(
        report: &PersonalizedReport,
        product: &ProductRecord,
        health_score: f64,
    ) -> Self {
        let fallback = |s: &str, default: &str| {
            if s.trim().is_empty() {
                default.to_string()
            } else {
                s.to_string()
            }
        };

        Self {
            id: format!("scan_{}", Uuid::new_v4()),
            product_name: fallback(&product.name, "Unknown product"),
            brand: fallback(&product.brand, "Unknown brand"),
            scan_date: report.generated_at.format("%Y-%m-%d").to_string(),
            scan_time: report.generated_at,
            compatibility_score: report.compatibility_score,
            health_score,
            nutrition_facts: Some(product.nutrition.clone()),
            ingredients: product.ingredients.clone(),
            warnings: report.warnings.clone(),
            allergens: product.allergens.clone(),
            recommendations: report.recommendations.clone(),
            health_impact: report.health_impact.clone(),
            raw_product_data: product.raw.clone(),
        }
    }
}

/// Aggregates over saved scans. Zero-valued scores are excluded so unscored
/// legacy rows don't drag the average down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    pub total_scans: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub recent_scans: Vec<StoredScan>,
}

impl ScanStatistics {
    fn empty() -> Self {
        Self {
            total_scans: 0,
            average_score: 0.0,
            best_score: 0.0,
            worst_score: 0.0,
            recent_scans: vec![],
        }
    }
}

// ═══════════════════════════════════════════
// Repository functions
// ═══════════════════════════════════════════

fn to_json(value: &impl Serialize) -> Result<String, DatabaseError> {
    serde_json::to_string(value)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("JSON encode failed: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(text)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("JSON decode failed: {e}")))
}

/// Saves a scan and evicts rows beyond the history cap (oldest first).
pub fn save_scan(conn: &Connection, scan: &StoredScan) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO scan_history (id, product_name, brand, scan_date, scan_time,
         compatibility_score, health_score, nutrition_facts, ingredients, warnings,
         allergens, recommendations, health_impact, raw_product_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            scan.id,
            scan.product_name,
            scan.brand,
            scan.scan_date,
            scan.scan_time.to_rfc3339(),
            scan.compatibility_score as i64,
            scan.health_score,
            scan.nutrition_facts.as_ref().map(to_json).transpose()?,
            to_json(&scan.ingredients)?,
            to_json(&scan.warnings)?,
            to_json(&scan.allergens)?,
            to_json(&scan.recommendations)?,
            to_json(&scan.health_impact)?,
            to_json(&scan.raw_product_data)?,
        ],
    )?;

    conn.execute(
        "DELETE FROM scan_history WHERE id NOT IN
         (SELECT id FROM scan_history ORDER BY scan_time DESC, id LIMIT ?1)",
        params![MAX_HISTORY_ROWS as i64],
    )?;

    Ok(())
}

fn row_to_scan(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredScan> {
    let scan_time: String = row.get(4)?;
    let nutrition: Option<String> = row.get(7)?;
    let ingredients: String = row.get(8)?;
    let warnings: String = row.get(9)?;
    let allergens: String = row.get(10)?;
    let recommendations: String = row.get(11)?;
    let health_impact: String = row.get(12)?;
    let raw: Option<String> = row.get(13)?;

    Ok(StoredScan {
        id: row.get(0)?,
        product_name: row.get(1)?,
        brand: row.get(2)?,
        scan_date: row.get(3)?,
        scan_time: DateTime::parse_from_rfc3339(&scan_time)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default(),
        compatibility_score: row.get::<_, i64>(5)? as u8,
        health_score: row.get(6)?,
        nutrition_facts: nutrition.and_then(|n| serde_json::from_str(&n).ok()),
        ingredients: serde_json::from_str(&ingredients).unwrap_or_default(),
        warnings: serde_json::from_str(&warnings).unwrap_or_default(),
        allergens: serde_json::from_str(&allergens).unwrap_or_default(),
        recommendations: serde_json::from_str(&recommendations).unwrap_or_default(),
        health_impact: serde_json::from_str(&health_impact).unwrap_or_default(),
        raw_product_data: raw
            .and_then(|r| serde_json::from_str(&r).ok())
            .unwrap_or(Value::Null),
    })
}

const SELECT_COLUMNS: &str = "id, product_name, brand, scan_date, scan_time,
     compatibility_score, health_score, nutrition_facts, ingredients, warnings,
     allergens, recommendations, health_impact, raw_product_data";

/// Fetches history, newest first.
pub fn fetch_history(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<StoredScan>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM scan_history
         ORDER BY scan_time DESC, id LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![limit.unwrap_or(MAX_HISTORY_ROWS) as i64],
        row_to_scan,
    )?;

    let mut scans = Vec::new();
    for row in rows {
        scans.push(row?);
    }
    Ok(scans)
}

/// Fetches one saved scan by id.
pub fn fetch_scan(conn: &Connection, scan_id: &str) -> Result<StoredScan, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM scan_history WHERE id = ?1");
    conn.query_row(&sql, params![scan_id], row_to_scan)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Scan".into(),
                id: scan_id.into(),
            },
            other => other.into(),
        })
}

/// Deletes one saved scan.
pub fn delete_scan(conn: &Connection, scan_id: &str) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM scan_history WHERE id = ?1", params![scan_id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Scan".into(),
            id: scan_id.into(),
        });
    }
    Ok(())
}

/// Clears all history.
pub fn clear_history(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM scan_history", [])?;
    Ok(())
}

/// Computes aggregate statistics over saved scans. A row's score is its
/// compatibility score, falling back to the nutrient health score when the
/// scan predates personalization; zero scores are excluded entirely.
pub fn statistics(conn: &Connection) -> Result<ScanStatistics, DatabaseError> {
    let history = fetch_history(conn, Some(MAX_HISTORY_ROWS))?;
    if history.is_empty() {
        return Ok(ScanStatistics::empty());
    }

    let scores: Vec<f64> = history
        .iter()
        .map(|scan| {
            if scan.compatibility_score > 0 {
                scan.compatibility_score as f64
            } else {
                scan.health_score
            }
        })
        .filter(|&s| s > 0.0)
        .collect();

    let (average, best, worst) = if scores.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = scores.iter().sum();
        let best = scores.iter().cloned().fold(f64::MIN, f64::max);
        let worst = scores.iter().cloned().fold(f64::MAX, f64::min);
        ((sum / scores.len() as f64).round(), best, worst)
    };

    Ok(ScanStatistics {
        total_scans: history.len(),
        average_score: average,
        best_score: best,
        worst_score: worst,
        recent_scans: history.into_iter().take(RECENT_WINDOW).collect(),
    })
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::ProductRecord;
    use chrono::Duration;

    fn test_db() -> Connection {
        open_memory_database().expect("in-memory DB")
    }

    fn make_scan(name: &str, score: u8, minutes_ago: i64) -> StoredScan {
        let time = Utc::now() - Duration::minutes(minutes_ago);
        StoredScan {
            id: format!("scan_{}", Uuid::new_v4()),
            product_name: name.into(),
            brand: "TestBrand".into(),
            scan_date: time.format("%Y-%m-%d").to_string(),
            scan_time: time,
            compatibility_score: score,
            health_score: 3.5,
            nutrition_facts: Some(NutritionFacts {
                sugar_g: Some(12.0),
                ..Default::default()
            }),
            ingredients: vec!["water".into(), "sugar".into()],
            warnings: vec!["Contains milk".into()],
            allergens: vec!["milk".into()],
            recommendations: vec![],
            health_impact: vec!["High sugar".into()],
            raw_product_data: serde_json::json!({ "source": "test" }),
        }
    }

    // ───────────────────────────────────────
    // save / fetch round trip
    // ───────────────────────────────────────

    #[test]
    fn save_and_fetch_round_trip() {
        let conn = test_db();
        let scan = make_scan("Yogurt", 65, 0);
        save_scan(&conn, &scan).unwrap();

        let fetched = fetch_scan(&conn, &scan.id).unwrap();
        assert_eq!(fetched.product_name, scan.product_name);
        assert_eq!(fetched.compatibility_score, 65);
        assert_eq!(fetched.nutrition_facts, scan.nutrition_facts);
        assert_eq!(fetched.ingredients, scan.ingredients);
        assert_eq!(fetched.warnings, scan.warnings);
        assert_eq!(fetched.raw_product_data, scan.raw_product_data);
    }

    #[test]
    fn fetch_history_newest_first() {
        let conn = test_db();
        save_scan(&conn, &make_scan("Old", 40, 60)).unwrap();
        save_scan(&conn, &make_scan("New", 70, 1)).unwrap();

        let history = fetch_history(&conn, None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].product_name, "New");
        assert_eq!(history[1].product_name, "Old");
    }

    #[test]
    fn history_capped_at_max_rows() {
        let conn = test_db();
        for i in 0..(MAX_HISTORY_ROWS + 10) {
            save_scan(&conn, &make_scan(&format!("Scan {i}"), 50, 200 - i as i64)).unwrap();
        }
        let history = fetch_history(&conn, Some(MAX_HISTORY_ROWS + 10)).unwrap();
        assert_eq!(history.len(), MAX_HISTORY_ROWS);
        // Newest survives, oldest evicted
        assert_eq!(
            history[0].product_name,
            format!("Scan {}", MAX_HISTORY_ROWS + 9)
        );
    }

    // ───────────────────────────────────────
    // delete / clear
    // ───────────────────────────────────────

    #[test]
    fn delete_removes_scan() {
        let conn = test_db();
        let scan = make_scan("Yogurt", 65, 0);
        save_scan(&conn, &scan).unwrap();
        delete_scan(&conn, &scan.id).unwrap();
        assert!(fetch_scan(&conn, &scan.id).is_err());
    }

    #[test]
    fn delete_nonexistent_returns_not_found() {
        let conn = test_db();
        let result = delete_scan(&conn, "scan_missing");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn clear_history_empties_table() {
        let conn = test_db();
        save_scan(&conn, &make_scan("A", 50, 0)).unwrap();
        save_scan(&conn, &make_scan("B", 60, 1)).unwrap();
        clear_history(&conn).unwrap();
        assert!(fetch_history(&conn, None).unwrap().is_empty());
    }

    // ───────────────────────────────────────
    // statistics
    // ───────────────────────────────────────

    #[test]
    fn statistics_empty_history() {
        let conn = test_db();
        let stats = statistics(&conn).unwrap();
        assert_eq!(stats.total_scans, 0);
        assert_eq!(stats.average_score, 0.0);
        assert!(stats.recent_scans.is_empty());
    }

    #[test]
    fn statistics_aggregates() {
        let conn = test_db();
        save_scan(&conn, &make_scan("A", 40, 3)).unwrap();
        save_scan(&conn, &make_scan("B", 60, 2)).unwrap();
        save_scan(&conn, &make_scan("C", 80, 1)).unwrap();

        let stats = statistics(&conn).unwrap();
        assert_eq!(stats.total_scans, 3);
        assert_eq!(stats.average_score, 60.0);
        assert_eq!(stats.best_score, 80.0);
        assert_eq!(stats.worst_score, 40.0);
    }

    #[test]
    fn statistics_zero_score_falls_back_to_health_score() {
        let conn = test_db();
        let mut scan = make_scan("Legacy", 0, 1);
        scan.health_score = 4.0;
        save_scan(&conn, &scan).unwrap();

        let stats = statistics(&conn).unwrap();
        assert_eq!(stats.total_scans, 1);
        assert_eq!(stats.average_score, 4.0);
    }

    #[test]
    fn statistics_recent_window_is_five() {
        let conn = test_db();
        for i in 0..8 {
            save_scan(&conn, &make_scan(&format!("Scan {i}"), 50, 10 - i)).unwrap();
        }
        let stats = statistics(&conn).unwrap();
        assert_eq!(stats.recent_scans.len(), RECENT_WINDOW);
        assert_eq!(stats.recent_scans[0].product_name, "Scan 7");
    }

    // ───────────────────────────────────────
    // persisted shape
    // ───────────────────────────────────────

    #[test]
    fn stored_scan_serializes_camel_case() {
        let scan = make_scan("Yogurt", 65, 0);
        let json = serde_json::to_value(&scan).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "id",
            "productName",
            "brand",
            "scanDate",
            "scanTime",
            "compatibilityScore",
            "healthScore",
            "nutritionFacts",
            "ingredients",
            "warnings",
            "allergens",
            "recommendations",
            "healthImpact",
            "rawProductData",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn stored_scan_json_round_trip() {
        let scan = make_scan("Yogurt", 65, 0);
        let json = serde_json::to_string(&scan).unwrap();
        let back: StoredScan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scan);
    }

    #[test]
    fn from_report_snapshots_product_fields() {
        use crate::engine;
        use crate::models::HealthProfile;

        let profile = HealthProfile::from_raw(
            None,
            None,
            &["peanut".into()],
            &[],
            &[],
            None,
            None,
        );
        let product = ProductRecord {
            name: "Peanut Bar".into(),
            brand: "Snacks Co".into(),
            allergens: vec!["peanut".into()],
            ingredients: vec!["peanuts".into(), "sugar".into()],
            nutrition: NutritionFacts::default(),
            raw: serde_json::json!({ "barcode": "123" }),
        };
        let report = engine::evaluate(Some(&profile), Some(&product));
        let scan = StoredScan::from_report(&report, &product, 2.0);

        assert_eq!(scan.product_name, "Peanut Bar");
        assert_eq!(scan.compatibility_score, 20);
        assert_eq!(scan.warnings, report.warnings);
        assert_eq!(scan.allergens, product.allergens);
        assert_eq!(scan.raw_product_data, product.raw);
        assert!(scan.id.starts_with("scan_"));
    }

    #[test]
    fn from_report_fills_unknown_name() {
        use crate::engine;
        let report = engine::evaluate(None, None);
        let scan = StoredScan::from_report(&report, &ProductRecord::empty(), 0.0);
        assert_eq!(scan.product_name, "Unknown product");
        assert_eq!(scan.brand, "Unknown brand");
    }
}
