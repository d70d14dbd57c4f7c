//! API client for the Nokori Gohan backend.
//!
//! Every outbound request goes through this client: it attaches the session
//! credential as a bearer token and centrally handles credential rejection
//! by clearing the session store and redirecting to login, so individual
//! call sites never duplicate that logic.
//!
//! The client is a pure transport boundary. Recipe generation, nutrition
//! computation and inventory filtering all happen on the backend; nothing
//! here post-processes the returned data.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{Navigator, SessionStore};
use crate::config::Config;
use crate::models::{
    AuthResponse, Ingredient, LoginRequest, NewIngredient, NewRecipe, NewUserIngredient,
    PreferenceUpdate, Recipe, SignupRequest, UserIngredient, UserIngredientUpdate, UserPreference,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow recipe generation while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Nokori Gohan backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create the API client.
    ///
    /// Constructed once at application startup and shared by reference. The
    /// session store and navigator are injected so tests can substitute
    /// in-memory fakes.
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            session,
            navigator,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Headers for the request about to be sent.
    ///
    /// The credential is captured here, at send time; clearing the session
    /// afterwards does not affect a request already in flight.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    ///
    /// A 401 means the backend no longer accepts the credential: the session
    /// is cleared and the navigator redirects to login before the failure
    /// reaches the caller, no matter which operation produced it.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Credential rejected by backend, clearing session");
            self.session.logout();
            self.navigator.redirect_to_login();
        }

        Err(ApiError::from_status(status, &body).into())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T> {
        let response = request
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::Network)
            .with_context(|| format!("Failed to send request to {}", url))?;

        let response = self.check_response(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&text).map_err(|e| invalid_response(url, &e))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        let request = self.client.get(&url).query(query);
        self.send(request, &url).await
    }

    /// GET returning the raw body, for collection endpoints whose shape
    /// varies between a bare array and a wrapping object.
    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::Network)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let request = self.client.post(&url).json(body);
        self.send(request, &url).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let request = self.client.put(&url).json(body);
        self.send(request, &url).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let request = self.client.delete(&url);
        self.send(request, &url).await
    }

    // ===== Authentication =====

    /// Exchange email and password for a session pair.
    ///
    /// The caller activates the session store with the returned pair; the
    /// client itself never writes the user record.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login", &body).await
    }

    /// Register a new account and receive its first session pair
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.post("/auth/signup", request).await
    }

    // ===== User preferences =====

    /// Fetch the caller's preferences record
    pub async fn fetch_preferences(&self) -> Result<UserPreference> {
        self.get("/user_preferences", &[]).await
    }

    /// Apply a partial update to the caller's preferences record
    pub async fn update_preferences(&self, update: &PreferenceUpdate) -> Result<UserPreference> {
        let wrapper: PreferenceWrapper = self.put("/user_preferences", update).await?;
        Ok(wrapper.user_preference)
    }

    // ===== Ingredient catalog =====

    /// List catalog ingredients, optionally filtered by category
    pub async fn fetch_ingredients(&self, category: Option<&str>) -> Result<Vec<Ingredient>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        let text = self.get_text("/ingredients", &query).await?;

        if let Ok(ingredients) = serde_json::from_str::<Vec<Ingredient>>(&text) {
            return Ok(ingredients);
        }
        let wrapper: IngredientsWrapper =
            serde_json::from_str(&text).map_err(|e| invalid_response("/ingredients", &e))?;
        Ok(wrapper.ingredients)
    }

    /// Create a catalog entry
    pub async fn create_ingredient(&self, ingredient: &NewIngredient) -> Result<Ingredient> {
        let wrapper: IngredientWrapper = self.post("/ingredients", ingredient).await?;
        Ok(wrapper.ingredient)
    }

    // ===== Ingredient inventory =====

    /// List the caller's inventory. `available` and `expiring_soon` are
    /// backend-evaluated filters.
    pub async fn fetch_user_ingredients(
        &self,
        available: Option<bool>,
        expiring_soon: Option<bool>,
    ) -> Result<Vec<UserIngredient>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(available) = available {
            query.push(("available", available.to_string()));
        }
        if let Some(expiring_soon) = expiring_soon {
            query.push(("expiring_soon", expiring_soon.to_string()));
        }
        let text = self.get_text("/user_ingredients", &query).await?;

        if let Ok(items) = serde_json::from_str::<Vec<UserIngredient>>(&text) {
            return Ok(items);
        }
        let wrapper: UserIngredientsWrapper =
            serde_json::from_str(&text).map_err(|e| invalid_response("/user_ingredients", &e))?;
        Ok(wrapper.user_ingredients)
    }

    /// Add an ingredient to the inventory
    pub async fn add_user_ingredient(&self, item: &NewUserIngredient) -> Result<UserIngredient> {
        let wrapper: UserIngredientWrapper = self.post("/user_ingredients", item).await?;
        Ok(wrapper.user_ingredient)
    }

    /// Update quantity or expiration of an inventory row
    pub async fn update_user_ingredient(
        &self,
        id: i64,
        update: &UserIngredientUpdate,
    ) -> Result<UserIngredient> {
        let wrapper: UserIngredientWrapper = self
            .put(&format!("/user_ingredients/{}", id), update)
            .await?;
        Ok(wrapper.user_ingredient)
    }

    /// Remove an inventory row
    pub async fn delete_user_ingredient(&self, id: i64) -> Result<()> {
        let response: MessageResponse = self.delete(&format!("/user_ingredients/{}", id)).await?;
        debug!(id, message = ?response.message, "Inventory row deleted");
        Ok(())
    }

    // ===== Recipes =====

    /// List saved recipes
    pub async fn fetch_recipes(&self) -> Result<Vec<Recipe>> {
        let text = self.get_text("/recipes", &[]).await?;

        if let Ok(recipes) = serde_json::from_str::<Vec<Recipe>>(&text) {
            return Ok(recipes);
        }
        let wrapper: RecipesWrapper =
            serde_json::from_str(&text).map_err(|e| invalid_response("/recipes", &e))?;
        Ok(wrapper.recipes)
    }

    /// Request generated candidates sized for `serving_size`, based on the
    /// stored inventory
    pub async fn generate_recipes(&self, serving_size: u32) -> Result<Vec<Recipe>> {
        let body = serde_json::json!({ "serving_size": serving_size });
        let wrapper: RecipesWrapper = self.post("/recipes/generate", &body).await?;
        Ok(wrapper.recipes)
    }

    /// Request generated candidates from an explicit list of leftover
    /// descriptions (e.g. "chicken 300g") instead of the stored inventory
    pub async fn generate_from_ingredients(
        &self,
        ingredients: &[String],
        serving_size: u32,
    ) -> Result<Vec<Recipe>> {
        let body = serde_json::json!({
            "ingredients": ingredients,
            "serving_size": serving_size,
        });
        let wrapper: RecipesWrapper = self.post("/recipes/generate", &body).await?;
        Ok(wrapper.recipes)
    }

    /// Save a chosen candidate
    pub async fn save_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let wrapper: RecipeWrapper = self.post("/recipes", recipe).await?;
        Ok(wrapper.recipe)
    }

    /// Delete a saved recipe
    pub async fn delete_recipe(&self, id: i64) -> Result<()> {
        let response: MessageResponse = self.delete(&format!("/recipes/{}", id)).await?;
        debug!(id, message = ?response.message, "Recipe deleted");
        Ok(())
    }
}

fn invalid_response(url: &str, err: &serde_json::Error) -> anyhow::Error {
    anyhow::Error::new(ApiError::InvalidResponse(format!("{}: {}", url, err)))
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct PreferenceWrapper {
    user_preference: UserPreference,
}

#[derive(Debug, Deserialize)]
struct IngredientWrapper {
    ingredient: Ingredient,
}

#[derive(Debug, Deserialize)]
struct IngredientsWrapper {
    #[serde(default)]
    ingredients: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
struct UserIngredientWrapper {
    user_ingredient: UserIngredient,
}

#[derive(Debug, Deserialize)]
struct UserIngredientsWrapper {
    #[serde(default)]
    user_ingredients: Vec<UserIngredient>,
}

#[derive(Debug, Deserialize)]
struct RecipeWrapper {
    recipe: Recipe,
}

#[derive(Debug, Deserialize)]
struct RecipesWrapper {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
