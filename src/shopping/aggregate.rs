//! Shopping-list shortfall aggregation.
//!
//! Pure function over planned meals and pantry stock: sums the ingredient
//! amounts every meal needs, subtracts what is on hand and keeps only the
//! positive remainder. Identity is the exact ingredient name; the unit label
//! of the first occurrence is kept for the whole entry.

use std::collections::HashMap;

use serde::Serialize;

/// One ingredient requirement inside a recipe, per single serving.
#[derive(Debug, Clone)]
pub struct IngredientAmount {
    pub name: String,
    pub amount: f64,
    pub amount_type: String,
}

/// A planned meal: a recipe's ingredient list and how many servings of it
/// are planned. Calendar entries contribute one serving each; cart items
/// carry their stored quantity.
#[derive(Debug, Clone)]
pub struct PlannedMeal {
    pub quantity: f64,
    pub ingredients: Vec<IngredientAmount>,
}

impl PlannedMeal {
    pub fn single(ingredients: Vec<IngredientAmount>) -> Self {
        Self {
            quantity: 1.0,
            ingredients,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeededIngredient {
    pub name: String,
    pub amount: f64,
    pub amount_type: String,
}

struct Needed {
    amount: f64,
    amount_type: String,
}

/// Net shortfall across the planned meals given the current stock
/// (ingredient name -> amount on hand). Fully covered ingredients are
/// dropped; stock for ingredients nothing needs is ignored. Output order is
/// not significant.
pub fn shortfall(meals: &[PlannedMeal], stock: &HashMap<String, f64>) -> Vec<NeededIngredient> {
    let mut needed: HashMap<String, Needed> = HashMap::new();

    for meal in meals {
        for ingredient in &meal.ingredients {
            let entry = needed
                .entry(ingredient.name.clone())
                .or_insert_with(|| Needed {
                    amount: 0.0,
                    amount_type: ingredient.amount_type.clone(),
                });
            entry.amount += ingredient.amount * meal.quantity;
        }
    }

    for (name, available) in stock {
        if let Some(entry) = needed.get_mut(name) {
            let remaining = (entry.amount - available).max(0.0);
            if remaining > 0.0 {
                entry.amount = remaining;
            } else {
                needed.remove(name);
            }
        }
    }

    needed
        .into_iter()
        .map(|(name, entry)| NeededIngredient {
            name,
            amount: entry.amount,
            amount_type: entry.amount_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ing(name: &str, amount: f64, amount_type: &str) -> IngredientAmount {
        IngredientAmount {
            name: name.into(),
            amount,
            amount_type: amount_type.into(),
        }
    }

    fn by_name(items: &[NeededIngredient], name: &str) -> Option<NeededIngredient> {
        items.iter().find(|i| i.name == name).cloned()
    }

    #[test]
    fn empty_meals_give_empty_output_regardless_of_stock() {
        let stock = HashMap::from([("Мука".to_string(), 500.0)]);
        assert!(shortfall(&[], &stock).is_empty());
    }

    #[test]
    fn no_stock_passes_full_need_through_with_unit() {
        let meals = [PlannedMeal::single(vec![ing("Яйцо", 60.0, "гр")])];
        let items = shortfall(&meals, &HashMap::new());
        assert_eq!(items.len(), 1);
        let egg = by_name(&items, "Яйцо").unwrap();
        assert_eq!(egg.amount, 60.0);
        assert_eq!(egg.amount_type, "гр");
    }

    #[test]
    fn amounts_accumulate_across_meals() {
        let meals = [
            PlannedMeal::single(vec![ing("Яйцо", 60.0, "гр")]),
            PlannedMeal::single(vec![ing("Яйцо", 120.0, "гр")]),
        ];
        let items = shortfall(&meals, &HashMap::new());
        assert_eq!(items.len(), 1);
        assert_eq!(by_name(&items, "Яйцо").unwrap().amount, 180.0);
    }

    #[test]
    fn cart_quantity_scales_ingredient_amounts() {
        let meals = [PlannedMeal {
            quantity: 3.0,
            ingredients: vec![ing("Молоко 3,2%", 200.0, "мл")],
        }];
        let items = shortfall(&meals, &HashMap::new());
        assert_eq!(by_name(&items, "Молоко 3,2%").unwrap().amount, 600.0);
    }

    #[test]
    fn partial_stock_leaves_the_difference() {
        let meals = [PlannedMeal::single(vec![ing("Сахар", 100.0, "гр")])];
        let stock = HashMap::from([("Сахар".to_string(), 40.0)]);
        let items = shortfall(&meals, &stock);
        assert_eq!(by_name(&items, "Сахар").unwrap().amount, 60.0);
    }

    #[test]
    fn exact_stock_coverage_drops_the_ingredient() {
        let meals = [PlannedMeal::single(vec![ing("Сахар", 100.0, "гр")])];
        let stock = HashMap::from([("Сахар".to_string(), 100.0)]);
        assert!(shortfall(&meals, &stock).is_empty());
    }

    #[test]
    fn surplus_stock_also_drops_the_ingredient() {
        let meals = [PlannedMeal::single(vec![ing("Мука", 380.0, "гр")])];
        let stock = HashMap::from([("Мука".to_string(), 1000.0)]);
        assert!(shortfall(&meals, &stock).is_empty());
    }

    #[test]
    fn stock_for_unneeded_ingredients_is_invisible() {
        let meals = [PlannedMeal::single(vec![ing("Творог 5%", 720.0, "гр")])];
        let stock = HashMap::from([
            ("Творог 5%".to_string(), 100.0),
            ("Ванилин".to_string(), 50.0),
        ]);
        let items = shortfall(&meals, &stock);
        assert_eq!(items.len(), 1);
        assert_eq!(by_name(&items, "Творог 5%").unwrap().amount, 620.0);
        assert!(by_name(&items, "Ванилин").is_none());
    }

    #[test]
    fn first_seen_amount_type_wins() {
        let meals = [
            PlannedMeal::single(vec![ing("Соль", 5.0, "гр")]),
            PlannedMeal::single(vec![ing("Соль", 1.0, "по вкусу")]),
        ];
        let items = shortfall(&meals, &HashMap::new());
        let salt = by_name(&items, "Соль").unwrap();
        assert_eq!(salt.amount, 6.0);
        assert_eq!(salt.amount_type, "гр");
    }

    #[test]
    fn ingredient_names_match_case_sensitively() {
        let meals = [PlannedMeal::single(vec![ing("яйцо", 60.0, "гр")])];
        let stock = HashMap::from([("Яйцо".to_string(), 60.0)]);
        let items = shortfall(&meals, &stock);
        assert_eq!(by_name(&items, "яйцо").unwrap().amount, 60.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let meals = [
            PlannedMeal::single(vec![ing("Яйцо", 60.0, "гр"), ing("Мука", 380.0, "гр")]),
            PlannedMeal {
                quantity: 2.0,
                ingredients: vec![ing("Мука", 100.0, "гр")],
            },
        ];
        let stock = HashMap::from([("Мука".to_string(), 200.0)]);
        let mut first = shortfall(&meals, &stock);
        let mut second = shortfall(&meals, &stock);
        first.sort_by(|a, b| a.name.cmp(&b.name));
        second.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(first, second);
    }
}
