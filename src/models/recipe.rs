use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a recipe was composed by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeType {
    /// Uses only what is already in the inventory
    LeftoverOnly,
    /// May assume extra ingredients to hit the nutrition targets
    Balanced,
}

impl std::fmt::Display for RecipeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeType::LeftoverOnly => write!(f, "leftover only"),
            RecipeType::Balanced => write!(f, "balanced"),
        }
    }
}

/// A recipe as returned by the backend. Generated candidates arrive without
/// an id until they are saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<i64>,
    pub title: String,
    pub instructions: String,
    /// Opaque nutrition breakdown computed by the backend
    #[serde(default)]
    pub nutritional_info: serde_json::Value,
    pub cooking_time: u32,
    pub serving_size: u32,
    pub recipe_type: RecipeType,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for saving a chosen candidate
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub nutritional_info: serde_json::Value,
    pub cooking_time: u32,
    pub serving_size: u32,
    pub recipe_type: RecipeType,
}

impl From<Recipe> for NewRecipe {
    fn from(recipe: Recipe) -> Self {
        Self {
            title: recipe.title,
            instructions: recipe.instructions,
            nutritional_info: recipe.nutritional_info,
            cooking_time: recipe.cooking_time,
            serving_size: recipe.serving_size,
            recipe_type: recipe.recipe_type,
        }
    }
}
