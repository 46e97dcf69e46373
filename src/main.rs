use anyhow::{Context, Result};
use recipe_consolidator::cli::{parse_args, Command, OutputFormat};
use recipe_consolidator::config::EngineConfig;
use recipe_consolidator::consolidation::{ConsolidatedEntry, ConsolidationEngine, ScaledRecipe};
use recipe_consolidator::export::{render_text, write_csv};
use recipe_consolidator::recipe::Recipe;
use recipe_consolidator::scaling::validate_target_servings;
use serde::Serialize;
use tokio::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScaleResponse<'a> {
    scaled_recipes: &'a [ScaledRecipe],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CombinedListResponse<'a> {
    combined_list: &'a [ConsolidatedEntry],
}

async fn load_recipes(path: &str) -> Result<Vec<Recipe>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipes file '{}'", path))?;
    let recipes: Vec<Recipe> = serde_json::from_str(&content)
        .with_context(|| format!("Recipes file '{}' is not a JSON array of recipes", path))?;
    info!("Loaded {} recipes from {}", recipes.len(), path);
    Ok(recipes)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli_args = parse_args();

    let config = match cli_args.default_servings {
        Some(servings) => EngineConfig::with_default_servings(servings)?,
        None => EngineConfig::from_env()?,
    };
    let engine = ConsolidationEngine::new(config);

    match cli_args.command {
        Command::Scale { recipes, servings } => {
            let target = validate_target_servings(servings)?;
            let recipes = load_recipes(&recipes).await?;
            let scaled_recipes = engine.scale_recipes(&recipes, target)?;
            let response = ScaleResponse { scaled_recipes: &scaled_recipes };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Consolidate { recipes, servings, format } => {
            let target = validate_target_servings(servings)?;
            let recipes = load_recipes(&recipes).await?;
            let combined_list = engine.consolidate(&recipes, target)?;
            match format {
                OutputFormat::Json => {
                    let response = CombinedListResponse { combined_list: &combined_list };
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Csv => write_csv(&combined_list, std::io::stdout().lock())?,
                OutputFormat::Text => print!("{}", render_text(&combined_list)),
            }
        }
    }

    Ok(())
}
