use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use recipe_scout::config::{ClientConfig, DEFAULT_API_BASE_URL, DietaryPreference};
use recipe_scout::photo::ImageDescriptor;
use recipe_scout::recipes::{SortOrder, render_recipe};
use recipe_scout::SubmissionSession;
use tracing_subscriber::EnvFilter;

/// Find recipes for what is in your kitchen.
///
/// Attach a photo of your ingredients, type some in, or both; the
/// recommendation service replies with recipes ranked by how much of what you
/// have they use.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "🍳 Recipe recommendations from an ingredient photo and/or a typed list")]
struct Args {
    /// Photo of your ingredients (JPG, PNG, WebP or GIF, up to 10MB)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Comma-separated ingredient names; may be repeated
    #[arg(short = 'g', long = "ingredients", value_name = "CSV")]
    ingredients: Vec<String>,

    /// Dietary preference: vegetarian, vegan, gluten-free, dairy-free, nut-free; may be repeated
    #[arg(short, long = "diet", value_name = "LABEL", value_parser = parse_preference)]
    diet: Vec<DietaryPreference>,

    /// Order of the recipe list
    #[arg(short, long, value_enum, default_value_t = SortOrder::Coverage)]
    sort: SortOrder,

    /// Upload the photo as-is instead of downscaling it first
    #[arg(long)]
    no_compress: bool,

    /// Print each recipe's steps
    #[arg(long)]
    steps: bool,

    /// Recommendation service root URL
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
}

fn parse_preference(s: &str) -> Result<DietaryPreference, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::new(args.api_base_url);
    config.compress_images = !args.no_compress;
    config.validate().map_err(anyhow::Error::msg)?;

    let mut session = SubmissionSession::builder()
        .with_config(config)
        .with_sort_order(args.sort)
        .build()?;

    for preference in args.diet {
        if !session.preferences().contains(&preference) {
            session.toggle_preference(preference);
        }
    }

    for raw in &args.ingredients {
        match session.add_ingredients(raw) {
            Ok(outcome) => {
                for notice in outcome.notices() {
                    eprintln!("{}", notice);
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    if let Some(path) = &args.image {
        let image = ImageDescriptor::from_path(path)
            .await
            .with_context(|| format!("could not load {}", path.display()))?;
        session.select_image(image)?;
    }

    let response = session.submit().await?;

    if let Some(summary) = response.provenance_summary() {
        println!("Ingredients ({})", summary);
        for (name, origin) in response.provenance() {
            println!("  - {} ({})", name, origin.label());
        }
        println!();
    }

    if let Some(message) = response.message.as_deref().filter(|m| !m.is_empty()) {
        println!("{}", message);
    }
    if let Some(banner) = response.fallback_banner() {
        println!("{}", banner);
        println!();
    }

    let recipes = session.sorted_recipes();
    if recipes.is_empty() {
        println!("No recipes found. Try adding more ingredients.");
        return Ok(());
    }

    println!("{} recipes, sorted by {}", recipes.len(), session.sort_order());
    println!();
    for recipe in &recipes {
        println!("{}", render_recipe(recipe, args.steps));
    }
    Ok(())
}
