use anyhow::{Context, Result};
use meal_planner::catalog::RecipeCatalog;
use meal_planner::cli::parse_args;
use meal_planner::meal_plan::{MealType, WeeklyPlan};
use meal_planner::profile::ProfileStore;
use meal_planner::shopping_list::{aggregate, AggregatedList};
use meal_planner::suggestions::suggest_recipes;
use meal_planner::swipe_deck::SwipeDeckEngine;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Fallback plan when no plan file is given: the first few catalog recipes
/// spread over dinner slots, starting today.
fn demo_plan(catalog: &RecipeCatalog) -> WeeklyPlan {
    let week_start = chrono::Local::now().date_naive();
    let mut plan = WeeklyPlan::new("week-1", week_start);
    for (offset, recipe) in catalog.recipes().iter().take(3).enumerate() {
        let date = meal_planner::meal_plan::date_for_offset(week_start, offset as i64);
        plan = plan.set_slot(date, MealType::Dinner, &recipe.id);
    }
    plan
}

fn print_shopping_list(list: &AggregatedList) {
    if list.items.is_empty() {
        println!("Your list is empty. Add meals to your plan to generate a list.");
        return;
    }

    for (category, items) in list.grouped_by_category() {
        println!("\n{}", category.to_uppercase());
        for item in items {
            let mark = if item.checked { "x" } else { " " };
            println!("  [{}] {} - {} {}", mark, item.name, item.amount, item.unit);
        }
    }
    println!(
        "\n{} items remaining ({:.0}% done)",
        list.remaining_count(),
        list.completion_ratio() * 100.0
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let cli_args = parse_args();

    let mut catalog = RecipeCatalog::from_json_file(Path::new(&cli_args.catalog_file))
        .with_context(|| format!("Failed to load catalog '{}'", cli_args.catalog_file))?;
    println!("Loaded {} recipes from {}.", catalog.len(), cli_args.catalog_file);

    let profile_store = ProfileStore::new(&cli_args.profile_file);
    let profile = profile_store.load()?;
    match &profile {
        Some(p) => println!("Welcome back, {}.", p.name),
        None => println!("No saved profile found; complete onboarding to personalize suggestions."),
    }

    let plan: WeeklyPlan = match &cli_args.plan_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read plan file '{}'", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse plan file '{}'", path))?
        }
        None => {
            println!("No plan file given; building a demo plan from the catalog.");
            demo_plan(&catalog)
        }
    };

    if cli_args.suggest {
        match &profile {
            Some(profile) => {
                println!("\nRequesting recipe suggestions...");
                let suggested =
                    suggest_recipes(profile, "I want ideas for the week.", API_KEY_ENV_VAR).await;
                if suggested.is_empty() {
                    println!("No suggestions available right now.");
                } else {
                    let added = catalog.merge(suggested);
                    println!("Added {} suggested recipes to the catalog.", added);
                }
            }
            None => println!("\n--suggest needs a saved profile; skipping suggestions."),
        }
    }

    let deck = SwipeDeckEngine::new(cli_args.max_prep_minutes);
    println!(
        "\nDiscovery deck: {} cards within {} minutes prep time.",
        deck.active_cards(&catalog).len(),
        deck.max_prep_minutes()
    );
    if let Some(current) = deck.current_card(&catalog) {
        println!("Up first: {} ({} min)", current.name, current.prep_time_minutes);
    }
    if let Some(next) = deck.next_card(&catalog) {
        println!("Then: {} ({} min)", next.name, next.prep_time_minutes);
    }

    println!("\nShopping list for the week starting {}:", plan.week_start);
    let list = aggregate(&plan, &catalog, &HashMap::new());
    print_shopping_list(&list);

    Ok(())
}
