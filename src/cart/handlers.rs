use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    cart::repo::{self, CartRow},
    recipes::dto::{DeletedResponse, IngredientEntry},
    recipes::repo as recipes_repo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route(
            "/cart/:id",
            axum::routing::put(set_quantity).delete(remove_item),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecipe {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: i32,
    pub recipe: CartRecipe,
}

fn assemble(row: CartRow, ingredients: Vec<IngredientEntry>) -> CartItemResponse {
    CartItemResponse {
        id: row.id,
        recipe_id: row.recipe_id,
        quantity: row.quantity,
        recipe: CartRecipe {
            id: row.recipe_id,
            name: row.recipe_name,
            calories: row.calories,
            proteins: row.proteins,
            fats: row.fats,
            carbohydrates: row.carbohydrates,
            ingredients,
        },
    }
}

async fn assemble_all(
    state: &AppState,
    rows: Vec<CartRow>,
) -> anyhow::Result<Vec<CartItemResponse>> {
    let recipe_ids: Vec<Uuid> = rows.iter().map(|r| r.recipe_id).collect();
    let ingredient_rows = recipes_repo::ingredients_for(&state.db, &recipe_ids).await?;
    let mut by_recipe: HashMap<Uuid, Vec<IngredientEntry>> = HashMap::new();
    for row in ingredient_rows {
        by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(row.into_entry());
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let ingredients = by_recipe.get(&row.recipe_id).cloned().unwrap_or_default();
            assemble(row, ingredients)
        })
        .collect())
}

pub(crate) async fn assemble_one(
    state: &AppState,
    row: CartRow,
) -> anyhow::Result<CartItemResponse> {
    let ingredient_rows = recipes_repo::ingredients_for(&state.db, &[row.recipe_id]).await?;
    let ingredients = ingredient_rows
        .into_iter()
        .map(|r| r.into_entry())
        .collect();
    Ok(assemble(row, ingredients))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub recipe_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantity {
    pub quantity: i32,
}

#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<CartItemResponse>>, (StatusCode, String)> {
    let rows = repo::list(&state.db).await.map_err(internal)?;
    let items = assemble_all(&state, rows).await.map_err(internal)?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddToCart>,
) -> Result<Json<CartItemResponse>, (StatusCode, String)> {
    let row = repo::increment_or_insert(&state.db, payload.recipe_id)
        .await
        .map_err(internal)?;
    info!(recipe_id = %payload.recipe_id, %user_id, quantity = row.quantity, "cart add");
    let item = assemble_one(&state, row).await.map_err(internal)?;
    Ok(Json(item))
}

/// Quantities of zero or less drop the item, mirroring the stock endpoint.
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetQuantity>,
) -> Result<Response, (StatusCode, String)> {
    if payload.quantity <= 0 {
        repo::delete(&state.db, id).await.map_err(internal)?;
        return Ok(Json(DeletedResponse { deleted: true }).into_response());
    }

    let row = repo::set_quantity(&state.db, id, payload.quantity)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Cart item not found".to_string()))?;
    let item = assemble_one(&state, row).await.map_err(internal)?;
    Ok(Json(item).into_response())
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    repo::delete(&state.db, id).await.map_err(internal)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    repo::clear(&state.db).await.map_err(internal)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
