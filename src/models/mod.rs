//! Data models for the Nokori Gohan API.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `User`, `AuthResponse`: identity and authentication payloads
//! - `UserPreference`: per-user cooking preferences and nutrition targets
//! - `Ingredient`, `UserIngredient`: catalog entries and inventory rows
//! - `Recipe`: saved recipes and generated candidates

pub mod ingredient;
pub mod preference;
pub mod recipe;
pub mod user;

pub use ingredient::{
    Ingredient, NewIngredient, NewUserIngredient, UserIngredient, UserIngredientUpdate,
};
pub use preference::{NutritionalGoals, PreferenceUpdate, UserPreference};
pub use recipe::{NewRecipe, Recipe, RecipeType};
pub use user::{AuthResponse, LoginRequest, SignupRequest, User};
