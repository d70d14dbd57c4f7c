use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Macro-nutrient targets the backend shapes "balanced" recipes around.
/// Ratios are fractions of daily calories, not percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionalGoals {
    pub daily_calories: f64,
    pub protein_ratio: f64,
    pub carb_ratio: f64,
    pub fat_ratio: f64,
}

/// The single preferences record each user owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreference {
    pub id: i64,
    pub user_id: i64,
    pub default_serving_size: u32,
    pub nutritional_goals: NutritionalGoals,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub cooking_tools: Vec<String>,
    #[serde(default)]
    pub seasonings: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update for the preferences record; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreferenceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_serving_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_goals: Option<NutritionalGoals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonings: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preference_with_missing_lists() {
        let json = r#"{
            "id": 1,
            "user_id": 1,
            "default_serving_size": 2,
            "nutritional_goals": {
                "daily_calories": 2000.0,
                "protein_ratio": 0.3,
                "carb_ratio": 0.5,
                "fat_ratio": 0.2
            }
        }"#;

        let prefs: UserPreference = serde_json::from_str(json).expect("Failed to parse preferences");
        assert_eq!(prefs.default_serving_size, 2);
        assert!(prefs.allergies.is_empty());
        assert!(prefs.cooking_tools.is_empty());
        assert!(prefs.seasonings.is_empty());
    }
}
