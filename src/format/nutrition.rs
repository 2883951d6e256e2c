// Nutrition lookups.
// Pulls numeric values out of free-form nutrition maps and scales them by portion.

use serde_json::{Map, Value};

/// Value of the first entry whose lowercased key contains `needle`.
///
/// Numbers are used as is, strings by their leading numeric prefix
/// (`"12.5g"` → 12.5). Anything else, or no matching key, yields 0.
pub fn nutrient_value(nutrition: &Map<String, Value>, needle: &str) -> f64 {
    let needle = needle.to_lowercase();
    nutrition
        .iter()
        .find(|(key, _)| key.to_lowercase().contains(&needle))
        .map(|(_, value)| coerce_number(value))
        .unwrap_or(0.0)
}

/// `nutrient_value` multiplied by the portion multiplier.
pub fn scaled_nutrient(nutrition: &Map<String, Value>, needle: &str, portion: f64) -> f64 {
    nutrient_value(nutrition, needle) * portion
}

/// Scaled value rendered with one decimal place.
pub fn format_nutrient(nutrition: &Map<String, Value>, needle: &str, portion: f64) -> String {
    format!("{:.1}", scaled_nutrient(nutrition, needle, portion))
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok().filter(|n: &f64| n.is_finite())
}

/// Per-portion macro totals for a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl NutritionSummary {
    pub fn from_map(nutrition: &Map<String, Value>, portion: f64) -> Self {
        Self {
            calories: scaled_nutrient(nutrition, "calor", portion),
            protein: scaled_nutrient(nutrition, "protein", portion),
            fat: scaled_nutrient(nutrition, "fat", portion),
            carbs: scaled_nutrient(nutrition, "carb", portion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_protein_string_scaled_by_portion() {
        let nutrition = map(json!({ "Protein_g": "12.5" }));
        assert_eq!(scaled_nutrient(&nutrition, "protein", 2.0), 25.0);
        assert_eq!(format_nutrient(&nutrition, "protein", 2.0), "25.0");
    }

    #[test]
    fn test_first_matching_key_wins() {
        let nutrition = map(json!({
            "saturated_fat": 3,
            "fat": 10,
            "Carbohydrates": "40g"
        }));
        assert_eq!(nutrient_value(&nutrition, "fat"), 3.0);
        assert_eq!(nutrient_value(&nutrition, "carb"), 40.0);
    }

    #[test]
    fn test_missing_or_non_numeric_is_zero() {
        let nutrition = map(json!({ "fat": "n/a", "fiber": null, "sugar": [1] }));
        assert_eq!(nutrient_value(&nutrition, "protein"), 0.0);
        assert_eq!(nutrient_value(&nutrition, "fat"), 0.0);
        assert_eq!(nutrient_value(&nutrition, "fiber"), 0.0);
        assert_eq!(nutrient_value(&nutrition, "sugar"), 0.0);
        assert_eq!(format_nutrient(&nutrition, "protein", 3.0), "0.0");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number(" 7.25 kcal"), Some(7.25));
        assert_eq!(leading_number("-1.5"), Some(-1.5));
        assert_eq!(leading_number("3."), Some(3.0));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("g12"), None);
        assert_eq!(leading_number("-"), None);
    }

    #[test]
    fn test_summary() {
        let nutrition = map(json!({
            "Calories": 350,
            "protein": "20",
            "fat_g": 12.5,
            "carbs": "30.5"
        }));
        let summary = NutritionSummary::from_map(&nutrition, 0.5);
        assert_eq!(summary.calories, 175.0);
        assert_eq!(summary.protein, 10.0);
        assert_eq!(summary.fat, 6.25);
        assert_eq!(summary.carbs, 15.25);
    }
}
