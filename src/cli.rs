use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scale recipes and merge them into one shopping list", long_about = None)]
pub struct Cli {
    /// Servings assumed for recipes without a serving count (overrides RECIPE_DEFAULT_SERVINGS)
    #[arg(long, global = true)]
    pub default_servings: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scale every recipe to the target servings, one result per recipe
    Scale {
        /// Path to a JSON array of recipe records
        #[arg(short, long)]
        recipes: String,
        /// Target number of servings
        #[arg(short, long, allow_negative_numbers = true)]
        servings: i64,
    },
    /// Scale all recipes and merge their ingredients into one shopping list
    Consolidate {
        /// Path to a JSON array of recipe records
        #[arg(short, long)]
        recipes: String,
        /// Target number of servings
        #[arg(short, long, allow_negative_numbers = true)]
        servings: i64,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
