use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    calendar,
    dates::{format_day, parse_day, today},
    recipes::repo as recipes_repo,
    shopping::aggregate::{shortfall, IngredientAmount, NeededIngredient, PlannedMeal},
    state::AppState,
    stock,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/shopping-list", get(shopping_list))
}

#[derive(Debug, Deserialize)]
pub struct ShoppingListQuery {
    pub date: Option<String>,
}

/// Recipe planned for the requested day, reported for display only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRecipe {
    pub id: Uuid,
    pub name: String,
    pub meal_type: String,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<NeededIngredient>,
    pub date: String,
    pub recipes: Vec<PlannedRecipe>,
}

/// What still has to be bought for the given day: every calendar entry
/// contributes one serving of its recipe, then the pantry is subtracted.
#[instrument(skip(state))]
pub async fn shopping_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ShoppingListQuery>,
) -> Result<Json<ShoppingListResponse>, (StatusCode, String)> {
    let date = match query.date.as_deref() {
        Some(s) => parse_day(s).ok_or((StatusCode::BAD_REQUEST, "Invalid date".to_string()))?,
        None => today(),
    };

    let planned = calendar::repo::list_for_day(&state.db, user_id, date)
        .await
        .map_err(internal)?;

    let recipe_ids: Vec<Uuid> = planned.iter().map(|p| p.recipe_id).collect();
    let ingredient_rows = recipes_repo::ingredients_for(&state.db, &recipe_ids)
        .await
        .map_err(internal)?;

    let mut by_recipe: HashMap<Uuid, Vec<IngredientAmount>> = HashMap::new();
    for row in ingredient_rows {
        by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(IngredientAmount {
                name: row.name,
                amount: row.amount,
                amount_type: row.amount_type,
            });
    }

    let meals: Vec<PlannedMeal> = planned
        .iter()
        .map(|item| {
            PlannedMeal::single(by_recipe.get(&item.recipe_id).cloned().unwrap_or_default())
        })
        .collect();

    let pantry = stock::repo::amounts_by_name(&state.db)
        .await
        .map_err(internal)?;

    let items = shortfall(&meals, &pantry);

    Ok(Json(ShoppingListResponse {
        items,
        date: format_day(date),
        recipes: planned
            .into_iter()
            .map(|item| PlannedRecipe {
                id: item.recipe_id,
                name: item.recipe_name,
                meal_type: item.meal_type,
            })
            .collect(),
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
