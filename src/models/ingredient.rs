use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry describing an ingredient independent of any user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
}

/// Payload for creating a catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct NewIngredient {
    pub name: String,
    pub category: String,
    pub unit: String,
}

/// One inventory row: an ingredient the user currently has on hand.
///
/// Whether a row counts as "available" or "expiring soon" is decided by the
/// backend when listing with those filters; the client never re-derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIngredient {
    pub id: i64,
    pub ingredient: Ingredient,
    pub quantity: f64,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for adding an ingredient to the inventory
#[derive(Debug, Clone, Serialize)]
pub struct NewUserIngredient {
    pub ingredient_id: i64,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

/// Partial update for an inventory row; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserIngredientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_ingredient_with_expiration() {
        let json = r#"{
            "id": 7,
            "ingredient": {"id": 3, "name": "carrot", "category": "vegetable", "unit": "piece"},
            "quantity": 2.0,
            "expiration_date": "2025-07-01",
            "created_at": "2025-06-20T09:00:00Z",
            "updated_at": "2025-06-20T09:00:00Z"
        }"#;

        let row: UserIngredient = serde_json::from_str(json).expect("Failed to parse inventory row");
        assert_eq!(row.id, 7);
        assert_eq!(row.ingredient.name, "carrot");
        assert_eq!(
            row.expiration_date,
            Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_user_ingredient_without_expiration() {
        let json = r#"{
            "id": 8,
            "ingredient": {"id": 4, "name": "soy sauce", "category": "seasoning", "unit": "ml"},
            "quantity": 500.0
        }"#;

        let row: UserIngredient = serde_json::from_str(json).expect("Failed to parse inventory row");
        assert!(row.expiration_date.is_none());
        assert!(row.created_at.is_none());
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = UserIngredientUpdate {
            quantity: Some(1.5),
            expiration_date: None,
        };
        let json = serde_json::to_value(&update).expect("Failed to serialize update");
        assert_eq!(json, serde_json::json!({"quantity": 1.5}));
    }
}
