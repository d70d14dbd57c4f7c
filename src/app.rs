//! Application wiring and command handlers.
//!
//! One `App` owns the session store and the single `ApiClient` built at
//! startup. Command handlers are thin translations from CLI arguments to API
//! calls plus display of the results; every business rule (what is expiring,
//! how recipes are generated) lives on the backend.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::api::ApiClient;
use crate::auth::{FileStorage, SessionStore, TerminalNavigator};
use crate::config::Config;
use crate::models::{
    NewIngredient, NewRecipe, NewUserIngredient, PreferenceUpdate, Recipe, SignupRequest,
    UserIngredientUpdate,
};
use crate::utils::format::{expiry_label_today, format_quantity, truncate};

/// Serving size used when `generate` is called without --servings
const DEFAULT_SERVINGS: u32 = 2;

pub struct App {
    session: Arc<SessionStore>,
    client: ApiClient,
}

impl App {
    /// Wire up the application: configuration, file-backed session storage,
    /// the session store (rehydrated immediately), and the one API client
    /// every command shares.
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        debug!(base_url = %config.api_base_url, "Configured backend");

        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        let session = Arc::new(SessionStore::new(storage));
        session.initialize();

        let navigator = Arc::new(TerminalNavigator);
        let client = ApiClient::new(&config, session.clone(), navigator)?;

        Ok(Self { session, client })
    }

    pub async fn run(&self, args: &[String]) -> Result<()> {
        let rest = &args[1..];
        match args[0].as_str() {
            "signup" => self.signup(rest).await,
            "login" => self.login(rest).await,
            "logout" => self.logout(),
            "whoami" => self.whoami(),
            "prefs" => self.prefs(rest).await,
            "ingredients" => self.ingredients(rest).await,
            "pantry" => self.pantry(rest).await,
            "recipes" => self.recipes(rest).await,
            "generate" => self.generate(rest).await,
            other => bail!("Unknown command: {}. Try `nokori help`.", other),
        }
    }

    async fn signup(&self, args: &[String]) -> Result<()> {
        let [name, email] = args else {
            bail!("Usage: nokori signup <name> <email>");
        };
        let password = prompt("Password: ")?;
        let password_confirmation = prompt("Confirm password: ")?;

        let request = SignupRequest {
            name: name.clone(),
            email: email.clone(),
            password,
            password_confirmation,
        };
        let auth = self.client.signup(&request).await?;
        println!("{}", auth.message.as_deref().unwrap_or("Account created"));
        self.session.login(auth.user, auth.token);
        Ok(())
    }

    async fn login(&self, args: &[String]) -> Result<()> {
        let [email] = args else {
            bail!("Usage: nokori login <email>");
        };
        let password = prompt("Password: ")?;

        let auth = self.client.login(email, &password).await?;
        println!("{}", auth.message.as_deref().unwrap_or("Logged in"));
        println!("Welcome back, {}!", auth.user.name);
        self.session.login(auth.user, auth.token);
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        self.session.logout();
        println!("Logged out.");
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        match self.session.current_user() {
            Some(user) => println!(
                "{} <{}> (member since {})",
                user.name,
                user.email,
                user.created_at.format("%b %d, %Y")
            ),
            None => println!("Not logged in."),
        }
        Ok(())
    }

    async fn prefs(&self, args: &[String]) -> Result<()> {
        if let Some(servings) = flag_value(args, "--servings") {
            let update = PreferenceUpdate {
                default_serving_size: Some(
                    servings.parse().context("--servings expects a number")?,
                ),
                ..Default::default()
            };
            let prefs = self.client.update_preferences(&update).await?;
            println!("Default serving size set to {}.", prefs.default_serving_size);
            return Ok(());
        }

        let prefs = self.client.fetch_preferences().await?;
        let goals = &prefs.nutritional_goals;
        println!("Default serving size: {}", prefs.default_serving_size);
        println!("Daily calories:       {:.0}", goals.daily_calories);
        println!(
            "Macro split (P/C/F):  {:.0}% / {:.0}% / {:.0}%",
            goals.protein_ratio * 100.0,
            goals.carb_ratio * 100.0,
            goals.fat_ratio * 100.0
        );
        if !prefs.allergies.is_empty() {
            println!("Allergies:            {}", prefs.allergies.join(", "));
        }
        if !prefs.cooking_tools.is_empty() {
            println!("Cooking tools:        {}", prefs.cooking_tools.join(", "));
        }
        if !prefs.seasonings.is_empty() {
            println!("Seasonings:           {}", prefs.seasonings.join(", "));
        }
        Ok(())
    }

    async fn ingredients(&self, args: &[String]) -> Result<()> {
        if args.first().map(String::as_str) == Some("add") {
            let [_, name, category, unit] = args else {
                bail!("Usage: nokori ingredients add <name> <category> <unit>");
            };
            let created = self
                .client
                .create_ingredient(&NewIngredient {
                    name: name.clone(),
                    category: category.clone(),
                    unit: unit.clone(),
                })
                .await?;
            println!("Added {} (id {}).", created.name, created.id);
            return Ok(());
        }

        let category = flag_value(args, "--category");
        let ingredients = self.client.fetch_ingredients(category.as_deref()).await?;
        if ingredients.is_empty() {
            println!("No ingredients found.");
            return Ok(());
        }
        for ingredient in &ingredients {
            println!(
                "{:>5}  {:<24} {:<12} {}",
                ingredient.id,
                truncate(&ingredient.name, 24),
                ingredient.category,
                ingredient.unit
            );
        }
        Ok(())
    }

    async fn pantry(&self, args: &[String]) -> Result<()> {
        match args.first().map(String::as_str) {
            Some("add") => {
                let (id, qty, expiration) = match args {
                    [_, id, qty] => (id, qty, None),
                    [_, id, qty, date] => (id, qty, Some(parse_date(date)?)),
                    _ => bail!("Usage: nokori pantry add <ingredient-id> <quantity> [expiration]"),
                };
                let item = NewUserIngredient {
                    ingredient_id: id.parse().context("<ingredient-id> expects a number")?,
                    quantity: qty.parse().context("<quantity> expects a number")?,
                    expiration_date: expiration,
                };
                let row = self.client.add_user_ingredient(&item).await?;
                println!(
                    "Added {} x{} (row {}).",
                    row.ingredient.name,
                    format_quantity(row.quantity, &row.ingredient.unit),
                    row.id
                );
                Ok(())
            }
            Some("update") => {
                let id: i64 = args
                    .get(1)
                    .context("Usage: nokori pantry update <id> [--qty Q] [--expires DATE]")?
                    .parse()
                    .context("<id> expects a number")?;
                let update = UserIngredientUpdate {
                    quantity: flag_value(args, "--qty")
                        .map(|q| q.parse().context("--qty expects a number"))
                        .transpose()?,
                    expiration_date: flag_value(args, "--expires")
                        .map(|d| parse_date(&d))
                        .transpose()?,
                };
                if update.quantity.is_none() && update.expiration_date.is_none() {
                    bail!("Nothing to update: pass --qty and/or --expires");
                }
                let row = self.client.update_user_ingredient(id, &update).await?;
                println!(
                    "Updated {}: {} ({}).",
                    row.ingredient.name,
                    format_quantity(row.quantity, &row.ingredient.unit),
                    expiry_label_today(row.expiration_date)
                );
                Ok(())
            }
            Some("remove") => {
                let id: i64 = args
                    .get(1)
                    .context("Usage: nokori pantry remove <id>")?
                    .parse()
                    .context("<id> expects a number")?;
                self.client.delete_user_ingredient(id).await?;
                println!("Removed row {}.", id);
                Ok(())
            }
            _ => {
                let available = args.iter().any(|a| a == "--available").then_some(true);
                let expiring = args.iter().any(|a| a == "--expiring").then_some(true);
                let rows = self.client.fetch_user_ingredients(available, expiring).await?;
                if rows.is_empty() {
                    println!("Pantry is empty.");
                    return Ok(());
                }
                for row in &rows {
                    println!(
                        "{:>5}  {:<24} {:<10} {}",
                        row.id,
                        truncate(&row.ingredient.name, 24),
                        format_quantity(row.quantity, &row.ingredient.unit),
                        expiry_label_today(row.expiration_date)
                    );
                }
                Ok(())
            }
        }
    }

    async fn recipes(&self, args: &[String]) -> Result<()> {
        if args.first().map(String::as_str) == Some("remove") {
            let id: i64 = args
                .get(1)
                .context("Usage: nokori recipes remove <id>")?
                .parse()
                .context("<id> expects a number")?;
            self.client.delete_recipe(id).await?;
            println!("Recipe {} deleted.", id);
            return Ok(());
        }

        let recipes = self.client.fetch_recipes().await?;
        if recipes.is_empty() {
            println!("No saved recipes yet.");
            return Ok(());
        }
        for recipe in &recipes {
            print_recipe_summary(recipe);
        }
        Ok(())
    }

    async fn generate(&self, args: &[String]) -> Result<()> {
        let servings: u32 = match flag_value(args, "--servings") {
            Some(value) => value.parse().context("--servings expects a number")?,
            None => DEFAULT_SERVINGS,
        };

        let leftovers = flag_values(args, "--from");
        let candidates = if leftovers.is_empty() {
            self.client.generate_recipes(servings).await?
        } else {
            self.client
                .generate_from_ingredients(&leftovers, servings)
                .await?
        };

        if candidates.is_empty() {
            println!("The backend returned no candidates.");
            return Ok(());
        }
        for (index, recipe) in candidates.iter().enumerate() {
            println!("--- Candidate {} ---", index + 1);
            print_recipe(recipe);
            println!();
        }

        if let Some(pick) = flag_value(args, "--save") {
            let number: usize = pick.parse().context("--save expects a candidate number")?;
            let chosen = number
                .checked_sub(1)
                .and_then(|i| candidates.get(i))
                .with_context(|| format!("No candidate {}", number))?;
            let saved = self
                .client
                .save_recipe(&NewRecipe::from(chosen.clone()))
                .await?;
            let id = saved.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!("Saved \"{}\" (id {}).", saved.title, id);
        }
        Ok(())
    }
}

fn print_recipe(recipe: &Recipe) {
    println!(
        "{} [{}] - serves {}, {} min",
        recipe.title, recipe.recipe_type, recipe.serving_size, recipe.cooking_time
    );
    println!("{}", recipe.instructions);
    if !recipe.nutritional_info.is_null() {
        println!("Nutrition: {}", recipe.nutritional_info);
    }
}

fn print_recipe_summary(recipe: &Recipe) {
    let id = recipe.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    println!(
        "{:>5}  {:<32} {:<14} serves {:<2} {:>3} min",
        id,
        truncate(&recipe.title, 32),
        recipe.recipe_type,
        recipe.serving_size,
        recipe.cooking_time
    );
}

/// Read a `--flag value` style option out of the raw argument list
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Collect every value following `--flag` until the next flag
fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args[i + 1..]
            .iter()
            .take_while(|a| !a.starts_with("--"))
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Expected a YYYY-MM-DD date, got {}", value))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
