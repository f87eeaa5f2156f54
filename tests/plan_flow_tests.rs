//! End-to-end flow over the two cores: swipe decisions mutate the plan, the
//! plan drives the shopping list, and checked state survives recomputation.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use meal_planner::catalog::{Ingredient, Recipe, RecipeCatalog};
use meal_planner::meal_plan::{MealType, WeeklyPlan};
use meal_planner::shopping_list::{aggregate, toggle_item};
use meal_planner::swipe_deck::{SwipeDeckEngine, SwipeOutcome};

fn ingredient(name: &str, amount: f64, unit: &str, category: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount,
        unit: unit.to_string(),
        category: category.to_string(),
    }
}

fn sample_catalog() -> RecipeCatalog {
    RecipeCatalog::new(vec![
        Recipe {
            id: "soup".to_string(),
            name: "Tomato Basil Soup".to_string(),
            description: "Classic comfort food.".to_string(),
            image: String::new(),
            prep_time_minutes: 30,
            calories: Some(300),
            category: "soup".to_string(),
            tags: vec!["vegetarian".to_string()],
            ingredients: vec![
                ingredient("Tomatoes", 5.0, "whole", "Produce"),
                ingredient("Heavy Cream", 50.0, "ml", "Dairy"),
                ingredient("Basil", 1.0, "bunch", "Produce"),
            ],
        },
        Recipe {
            id: "salad".to_string(),
            name: "Tomato Salad".to_string(),
            description: "Fresh and quick.".to_string(),
            image: String::new(),
            prep_time_minutes: 10,
            calories: Some(200),
            category: "salad".to_string(),
            tags: vec!["quick".to_string()],
            ingredients: vec![
                ingredient("tomatoes", 3.0, "whole", "Produce"),
                ingredient("Feta", 100.0, "g", "Dairy"),
            ],
        },
    ])
}

fn week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

#[test]
fn test_swipe_to_list_flow() {
    let catalog = sample_catalog();
    let mut deck = SwipeDeckEngine::new(60);
    let mut plan = WeeklyPlan::new("week-1", week_start());
    let mut favorites: HashSet<String> = HashSet::new();

    // Swipe right on the soup: favorite intent, no plan change.
    deck.begin_drag(&catalog, 0.0, 0.0);
    deck.update_drag(120.0, 5.0);
    match deck.end_drag(&catalog) {
        SwipeOutcome::Liked { recipe_id } => {
            favorites.insert(recipe_id);
        }
        other => panic!("expected a like, got {:?}", other),
    }
    assert!(favorites.contains("soup"));
    assert!(plan.slots.is_empty());

    // Swipe up on the salad and schedule it for Wednesday dinner.
    deck.begin_drag(&catalog, 0.0, 200.0);
    deck.update_drag(0.0, 80.0);
    match deck.end_drag(&catalog) {
        SwipeOutcome::SchedulePending { recipe_id } => assert_eq!(recipe_id, "salad"),
        other => panic!("expected a pending schedule, got {:?}", other),
    }
    let assignment = deck
        .confirm_schedule(plan.week_start, 2, MealType::Dinner)
        .expect("pending schedule");
    plan = plan.set_slot(assignment.date, assignment.meal_type, &assignment.recipe_id);

    assert_eq!(
        plan.slot(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            MealType::Dinner
        )
        .and_then(|s| s.recipe_id.as_deref()),
        Some("salad")
    );

    // Both recipes scheduled: tomato amounts merge across slots.
    plan = plan.set_slot(week_start(), MealType::Lunch, "soup");
    let list = aggregate(&plan, &catalog, &HashMap::new());
    let tomatoes = list
        .items
        .iter()
        .find(|i| i.key() == "tomatoes")
        .expect("tomatoes on the list");
    assert_eq!(tomatoes.amount, 8.0);
    assert_eq!(list.categories, vec!["Produce", "Dairy"]);

    // Check off the tomatoes, replace the salad with nothing, recompute.
    let overlay = toggle_item(&list.checked_overlay(), "tomatoes");
    let list = aggregate(&plan, &catalog, &overlay);
    assert_eq!(list.remaining_count(), list.items.len() - 1);

    let plan = plan.clear_slot(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        MealType::Dinner,
    );
    let list = aggregate(&plan, &catalog, &list.checked_overlay());
    // Feta came only from the salad and is gone; tomatoes stay checked.
    assert!(list.items.iter().all(|i| i.key() != "feta"));
    let tomatoes = list
        .items
        .iter()
        .find(|i| i.key() == "tomatoes")
        .expect("tomatoes still on the list");
    assert!(tomatoes.checked);
    assert_eq!(tomatoes.amount, 5.0);
}

#[test]
fn test_plan_json_roundtrip() {
    let plan = WeeklyPlan::new("week-1", week_start())
        .set_slot(week_start(), MealType::Breakfast, "soup")
        .set_slot(week_start(), MealType::Dinner, "salad");

    let json = serde_json::to_string(&plan).expect("plan serializes");
    assert!(json.contains("\"2024-01-08\""));
    assert!(json.contains("\"breakfast\""));

    let parsed: WeeklyPlan = serde_json::from_str(&json).expect("plan parses");
    assert_eq!(parsed, plan);
}
