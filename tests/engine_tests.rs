use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use recipe_consolidator::config::EngineConfig;
use recipe_consolidator::consolidation::ConsolidationEngine;
use recipe_consolidator::error::EngineError;
use recipe_consolidator::quantity::{format_quantity, parse_quantity, Quantity};
use recipe_consolidator::recipe::{Ingredient, Recipe};
use recipe_consolidator::scaling::scale;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

fn flour_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Recipe A", Some(4), vec![Ingredient::new("flour", "2 cups")]),
        Recipe::new("Recipe B", Some(2), vec![Ingredient::new("flour", "1 cup")]),
    ]
}

#[test]
fn test_parse_examples() {
    assert_eq!(
        parse_quantity("1 1/2 cups"),
        Some(Quantity { amount: 1.5, unit: "cups".to_string() })
    );
    assert_eq!(
        parse_quantity("2.5 oz"),
        Some(Quantity { amount: 2.5, unit: "oz".to_string() })
    );
    assert_eq!(parse_quantity(""), None);
    assert_eq!(
        parse_quantity("3"),
        Some(Quantity { amount: 3.0, unit: String::new() })
    );
}

#[test]
fn test_scale_and_format_examples() {
    assert_eq!(scale(2.0, 4, 8), 4.0);
    assert_eq!(format_quantity(1.5, "cups").unwrap(), "1 1/2 cups");
    assert_eq!(format_quantity(2.0, "cups").unwrap(), "2 cups");

    let third = format_quantity(0.333333, "cup").unwrap();
    assert_eq!(third, "1/3 cup");
}

#[test]
fn test_end_to_end_flour_from_two_recipes() {
    let entries = ConsolidationEngine::default()
        .consolidate(&flour_recipes(), 8)
        .unwrap();

    assert_eq!(entries.len(), 1);
    let flour = &entries[0];
    assert_eq!(flour.name, "flour");
    assert_eq!(flour.quantity, "8 cups");
    assert_eq!(flour.recipes, vec!["Recipe A", "Recipe B"]);
    assert_eq!(flour.notes, "For: Recipe A, Recipe B");
}

#[test]
fn test_unparsable_quantity_dropped_in_list_kept_in_scaling() {
    let recipes = vec![Recipe::new(
        "Seasoned Fries",
        Some(4),
        vec![Ingredient::new("salt", "a pinch"), Ingredient::new("potatoes", "2 lbs")],
    )];
    let engine = ConsolidationEngine::default();

    let entries = engine.consolidate(&recipes, 8).unwrap();
    assert!(entries.iter().all(|entry| entry.name != "salt"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, "4 lbs");

    let scaled = engine.scale_recipes(&recipes, 8).unwrap();
    let salt = &scaled[0].scaled_ingredients[0];
    assert!(!salt.parsed);
    assert_eq!(salt.ingredient.quantity_text(), "a pinch");
    assert_eq!(salt.scaling_factor, None);
    assert_eq!(scaled[0].scaled_ingredients[1].ingredient.quantity_text(), "4 lbs");
}

#[test]
fn test_consolidation_is_idempotent_and_leaves_input_alone() {
    let recipes = flour_recipes();
    let before = recipes.clone();
    let engine = ConsolidationEngine::default();

    let first = serde_json::to_string(&engine.consolidate(&recipes, 8).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.consolidate(&recipes, 8).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(recipes, before);

    let first = serde_json::to_string(&engine.scale_recipes(&recipes, 3).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.scale_recipes(&recipes, 3).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(recipes, before);
}

#[test]
fn test_random_lists_never_merge_different_units() {
    let names = ["flour", "Flour", "sugar", "butter", "Milk", "milk"];
    let units = ["cup", "g", "tbsp", "oz", ""];
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let recipes: Vec<Recipe> = (0..rng.gen_range(1..5))
            .map(|index| {
                let ingredients = (0..rng.gen_range(0..8))
                    .map(|_| {
                        let name = names.choose(&mut rng).unwrap();
                        let unit = units.choose(&mut rng).unwrap();
                        Ingredient::new(*name, format!("{} {}", rng.gen_range(1..10), unit))
                    })
                    .collect();
                Recipe::new(format!("Recipe {}", index), Some(rng.gen_range(1..9)), ingredients)
            })
            .collect();

        let entries = ConsolidationEngine::default().consolidate(&recipes, 4).unwrap();

        let mut expected = HashSet::new();
        for ingredient in recipes.iter().flat_map(|r| r.ingredients().unwrap()) {
            let quantity = parse_quantity(ingredient.quantity_text()).unwrap();
            expected.insert((ingredient.normalized_name(), quantity.unit));
        }
        let produced: Vec<(String, String)> = entries
            .iter()
            .map(|entry| (entry.normalized_name.clone(), entry.unit.clone()))
            .collect();
        let produced_set: HashSet<_> = produced.iter().cloned().collect();

        assert_eq!(produced.len(), produced_set.len(), "duplicate entries in {:?}", produced);
        assert_eq!(produced_set, expected);

        for entry in &entries {
            let titles: HashSet<_> = entry.recipes.iter().collect();
            assert_eq!(titles.len(), entry.recipes.len());
        }
    }
}

#[test]
fn test_random_totals_match_sum_of_scaled_amounts() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let recipes: Vec<Recipe> = (0..rng.gen_range(1..6))
            .map(|index| {
                let whole = rng.gen_range(0..4);
                let quarter = rng.gen_range(1..4);
                Recipe::new(
                    format!("R{}", index),
                    Some(rng.gen_range(1..7)),
                    vec![Ingredient::new("rice", format!("{} {}/4 cup", whole, quarter))],
                )
            })
            .collect();
        let target = rng.gen_range(1..13);

        let expected: f64 = recipes
            .iter()
            .map(|recipe| {
                let text = recipe.ingredients().unwrap()[0].quantity_text();
                let servings = recipe.effective_servings(4);
                scale(parse_quantity(text).unwrap().amount, servings, target)
            })
            .sum();

        let entries = ConsolidationEngine::default().consolidate(&recipes, target).unwrap();
        assert_eq!(entries.len(), 1);
        assert!((entries[0].total_amount - expected).abs() < 1e-9);
        assert_eq!(entries[0].recipes.len(), recipes.len());
    }
}

#[test]
fn test_json_wire_shapes() {
    let json = r#"[
        {
            "_id": "r1",
            "title": "Recipe A",
            "servings": 4,
            "cookTime": "30 minutes",
            "ingredients": [
                {"name": "flour", "quantity": "2 cups", "category": "Baking"},
                {"name": "salt", "quantity": "a pinch"}
            ]
        },
        {
            "title": "Recipe B",
            "servings": null,
            "ingredients": [{"name": "Flour", "quantity": "1 cup"}]
        }
    ]"#;
    let recipes: Vec<Recipe> = serde_json::from_str(json).unwrap();
    let engine = ConsolidationEngine::default();

    let combined = serde_json::to_value(engine.consolidate(&recipes, 8).unwrap()).unwrap();
    assert_eq!(
        combined,
        serde_json::json!([{
            "name": "flour",
            "quantity": "6 cups",
            "category": "Baking",
            "notes": "For: Recipe A, Recipe B",
            "recipes": ["Recipe A", "Recipe B"]
        }])
    );

    let scaled = serde_json::to_value(engine.scale_recipes(&recipes, 8).unwrap()).unwrap();
    let first = &scaled[0];
    assert_eq!(first["_id"], "r1");
    assert_eq!(first["title"], "Recipe A");
    assert_eq!(first["scalingFactor"], 2.0);
    assert_eq!(first["originalServings"], 4);
    assert_eq!(first["targetServings"], 8);
    assert_eq!(first["scaledCookTime"], "39 minutes");
    assert_eq!(first["scaledIngredients"][0]["quantity"], "4 cups");
    assert_eq!(first["scaledIngredients"][0]["originalQuantity"], "2 cups");
    assert_eq!(first["scaledIngredients"][0]["category"], "Baking");
    assert_eq!(first["scaledIngredients"][1]["quantity"], "a pinch");
    assert_eq!(first["scaledIngredients"][1]["parsed"], false);
    assert!(first["scaledIngredients"][1].get("originalQuantity").is_none());
    assert_eq!(scaled[1]["originalServings"], 4);
    assert_eq!(scaled[1]["scalingFactor"], 2.0);
}

#[test]
fn test_recipes_loaded_from_file() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"[{{"title": "Porridge", "servings": 1, "ingredients": [{{"name": "oats", "quantity": "1/2 cup"}}]}}]"#
    )?;
    file.flush()?;

    let content = std::fs::read_to_string(file.path())?;
    let recipes: Vec<Recipe> = serde_json::from_str(&content)?;
    let engine = ConsolidationEngine::new(EngineConfig::default());
    let entries = engine.consolidate(&recipes, 3)?;
    assert_eq!(entries[0].quantity, "1 1/2 cup");
    Ok(())
}

#[test]
fn test_missing_ingredients_array_is_hard_failure() {
    let recipes: Vec<Recipe> = serde_json::from_str(r#"[{"title": "Ghost", "servings": 2}]"#).unwrap();
    let result = ConsolidationEngine::default().consolidate(&recipes, 4);
    assert_eq!(result, Err(EngineError::MissingIngredients { title: "Ghost".to_string() }));
}
