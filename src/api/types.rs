// Backend API request and response types.
// Lenient serde models for recipes, feed posts, calorie entries and users.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Credentials for `/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `/auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Payload for `/auth/reset-password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Onboarding answers posted to `/interest-form/*`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterestForm {
    pub diet_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub allergies: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub disliked_ingredients: Vec<String>,
    pub cooking_skill: Option<String>,
    pub daily_calorie_goal: Option<f64>,
}

/// A recipe as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    #[serde(alias = "_id")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub tag: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub recipe_type: String,
    #[serde(deserialize_with = "nullable")]
    pub ingredients: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub instructions: Vec<String>,
    /// Free-form nutrition map; keys are not standardized.
    #[serde(deserialize_with = "nullable")]
    pub nutrition: Map<String, Value>,
    /// Base price in USD.
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub saved: bool,
}

/// Fields accepted by `/recipe/create` and `/recipe/update/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub title: String,
    pub description: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub recipe_type: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub nutrition: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// A comment on a feed post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    #[serde(alias = "_id")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub author: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    pub created_at: Option<String>,
}

/// A social feed entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedPost {
    #[serde(alias = "_id")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub author: String,
    pub recipe: Option<Recipe>,
    #[serde(deserialize_with = "nullable")]
    pub caption: String,
    #[serde(deserialize_with = "nullable")]
    pub likes: u64,
    #[serde(deserialize_with = "nullable")]
    pub liked: bool,
    #[serde(deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
    pub created_at: Option<String>,
}

/// Result of a like/unlike call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The like state changed.
    Changed,
    /// The post was already in the requested state.
    Unchanged,
}

/// A logged food item in the calorie tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalorieEntry {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub calories: f64,
    #[serde(deserialize_with = "nullable")]
    pub protein: f64,
    #[serde(deserialize_with = "nullable")]
    pub fat: f64,
    #[serde(deserialize_with = "nullable")]
    pub carbs: f64,
    /// Day the entry belongs to, `YYYY-MM-DD`.
    #[serde(deserialize_with = "nullable")]
    pub date: String,
}

/// Per-day totals from the calorie tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyCalories {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    pub goal: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub entries: Vec<CalorieEntry>,
}

impl DailyCalories {
    pub fn total_calories(&self) -> f64 {
        self.entries.iter().map(|e| e.calories).sum()
    }
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub language: Option<String>,
}

/// Editable profile fields for `/user/update`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Combined hits from `/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    #[serde(deserialize_with = "nullable")]
    pub recipes: Vec<Recipe>,
    #[serde(deserialize_with = "nullable")]
    pub users: Vec<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_deserializes_leniently() {
        let recipe: Recipe = serde_json::from_value(json!({
            "_id": "r1",
            "title": "Menemen",
            "type": "breakfast",
            "nutrition": { "Protein_g": "12.5", "fat": 9 },
            "unknownField": true
        }))
        .unwrap();

        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.recipe_type, "breakfast");
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.nutrition.keys().next().map(String::as_str), Some("Protein_g"));
        assert_eq!(recipe.price, None);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let recipes: Vec<Recipe> = serde_json::from_value(json!([{
            "_id": "r1",
            "title": "Menemen",
            "description": null,
            "ingredients": null,
            "nutrition": null,
            "saved": null
        }]))
        .unwrap();
        assert_eq!(recipes[0].title, "Menemen");
        assert_eq!(recipes[0].description, "");
        assert!(recipes[0].ingredients.is_empty());
        assert!(recipes[0].nutrition.is_empty());

        let post: FeedPost =
            serde_json::from_value(json!({ "caption": null, "likes": null, "comments": null }))
                .unwrap();
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());

        let entry: CalorieEntry =
            serde_json::from_value(json!({ "name": "Ayran", "calories": null })).unwrap();
        assert_eq!(entry.calories, 0.0);
    }

    #[test]
    fn test_daily_total() {
        let day = DailyCalories {
            entries: vec![
                CalorieEntry { calories: 250.0, ..Default::default() },
                CalorieEntry { calories: 410.5, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(day.total_calories(), 660.5);
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("cook".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({ "bio": "cook" }));
    }
}
