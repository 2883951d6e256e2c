// mealbook command-line entry point.
// Wires config, persistence, the API client and the translator for quick manual use.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use mealbook::api::ApiClient;
use mealbook::auth::TokenStore;
use mealbook::config::Config;
use mealbook::error::{MealbookError, Result};
use mealbook::format::{NutritionSummary, format_price};
use mealbook::storage::{FileStore, KeyValueStore, MemoryStore, Preferences};
use mealbook::translate::Translator;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the token pair.
    Login { email: String, password: String },
    /// Forget the stored tokens.
    Logout,
    /// Show the signed-in user's profile.
    Whoami,
    /// List all recipes with prices in the preferred language.
    Recipes,
    /// Show one recipe, translated into the preferred language.
    Recipe { id: String },
    /// Show the most recent feed posts.
    Feed {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search recipes and users.
    Search { query: String },
    /// Translate a piece of text.
    Translate {
        text: String,
        #[arg(long)]
        to: String,
    },
    /// Format a USD price for a language.
    Price {
        usd: f64,
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    match config.store_path() {
        Some(path) => Arc::new(FileStore::new(path)),
        None => {
            tracing::warn!("No data directory available, tokens will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn run(command: Command, config: Config) -> Result<()> {
    let store = open_store(&config);
    let prefs = Preferences::new(store.clone());
    let api = ApiClient::from_config(&config, TokenStore::new(store))?;

    match command {
        Command::Login { email, password } => {
            let user = api.login(&email, &password).await?;
            match user {
                Some(user) => println!("Signed in as {}", user.username),
                None => println!("Signed in"),
            }
        }
        Command::Logout => {
            api.logout().await;
            println!("Signed out");
        }
        Command::Whoami => {
            let profile = api.get_profile().await?;
            println!("{} <{}>", profile.username, profile.email);
        }
        Command::Recipes => {
            let language = prefs.language().await;
            for recipe in api.get_all_recipes().await? {
                println!(
                    "{:<24} {:<40} {}",
                    recipe.id,
                    recipe.title,
                    format_price(recipe.price, &language)
                );
            }
        }
        Command::Recipe { id } => {
            let language = prefs.language().await;
            let translator = Translator::from_config(&config)?;
            let recipe = api.get_recipe(&id).await?;
            let text = translator.translate_recipe(&recipe.id, &recipe, &language).await;
            let summary = NutritionSummary::from_map(&recipe.nutrition, 1.0);

            println!("{} ({})", text.title, format_price(recipe.price, &language));
            println!("{}", text.description);
            println!(
                "kcal {:.1}  protein {:.1}  fat {:.1}  carbs {:.1}",
                summary.calories, summary.protein, summary.fat, summary.carbs
            );
            for ingredient in &text.ingredients {
                println!("  - {}", ingredient);
            }
            for (i, step) in text.instructions.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
        }
        Command::Feed { page } => {
            for post in api.get_recent_feed(page).await? {
                println!(
                    "{} by {} ({} likes, {} comments)",
                    post.caption,
                    post.author,
                    post.likes,
                    post.comments.len()
                );
            }
        }
        Command::Search { query } => {
            let results = api.search(&query).await?;
            for recipe in results.recipes {
                println!("recipe {:<24} {}", recipe.id, recipe.title);
            }
            for user in results.users {
                println!("user   {:<24} {}", user.id, user.username);
            }
        }
        Command::Translate { text, to } => {
            let translator = Translator::from_config(&config)?;
            println!("{}", translator.translate(&text, &to).await?);
        }
        Command::Price { usd, lang } => {
            println!("{}", format_price(Some(usd), &lang));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mealbook=info")),
        )
        .init();

    let args = Args::parse();
    match run(args.command, Config::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(MealbookError::Authentication(reason)) => {
            error!("Session expired ({}), please sign in again", reason);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
