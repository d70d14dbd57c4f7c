//! Nokori - a command-line client for the Nokori Gohan recipe service.
//!
//! Register, log in, keep an inventory of leftover ingredients, and ask the
//! backend to generate recipes from them. All recipe and nutrition logic
//! lives on the backend; this client is session handling and transport.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod utils;

use std::io;
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::ApiError;
use app::App;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "help" || args[0] == "--help" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match app.run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure the way the pages surface it: validation problems as a
/// list, everything else as a single line with its context chain.
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Validation(problems)) => {
            eprintln!("The request was rejected:");
            for problem in problems {
                eprintln!("  - {}", problem);
            }
        }
        _ => eprintln!("Error: {:#}", err),
    }
}

fn print_usage() {
    println!("nokori - recipes from what is left in your fridge");
    println!();
    println!("Usage: nokori <command> [options]");
    println!();
    println!("Account:");
    println!("  signup <name> <email>                       create an account");
    println!("  login <email>                               sign in");
    println!("  logout                                      sign out");
    println!("  whoami                                      show the current user");
    println!();
    println!("Preferences:");
    println!("  prefs                                       show preferences");
    println!("  prefs --servings N                          set default serving size");
    println!();
    println!("Ingredients:");
    println!("  ingredients [--category C]                  list the catalog");
    println!("  ingredients add <name> <category> <unit>    add a catalog entry");
    println!();
    println!("Pantry:");
    println!("  pantry [--available|--expiring]             list your inventory");
    println!("  pantry add <ingredient-id> <qty> [date]     add an item");
    println!("  pantry update <id> [--qty Q] [--expires D]  change an item");
    println!("  pantry remove <id>                          remove an item");
    println!();
    println!("Recipes:");
    println!("  recipes                                     list saved recipes");
    println!("  recipes remove <id>                         delete a saved recipe");
    println!("  generate [--servings N] [--save N]          generate from your pantry");
    println!("  generate --from \"chicken 300g\" ...          generate from explicit leftovers");
    println!();
    println!("Environment:");
    println!("  NOKORI_API_BASE_URL   backend address (default http://localhost:3001/api/v1)");
    println!("  NOKORI_DATA_DIR       session storage directory");
    println!("  RUST_LOG              log filter (e.g. debug)");
}
