// Derived display formatters.
// Pure functions for prices and nutrition values.

pub mod currency;
pub mod nutrition;

pub use currency::{Currency, currency_for, format_price};
pub use nutrition::{NutritionSummary, format_nutrient, nutrient_value, scaled_nutrient};
