use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AdminUser, AuthUser},
    recipes::{
        dto::{
            DeletedResponse, IngredientEntry, PublicRecipePayload, PublicRecipeQuery,
            RecipePayload, RecipeResponse,
        },
        repo,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/public/recipes", get(list_public_recipes))
        .route(
            "/public/recipes/:id",
            put(update_public_recipe).delete(delete_public_recipe),
        )
}

/// Groups ingredient rows by recipe for response assembly.
async fn ingredient_map(
    state: &AppState,
    recipe_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<IngredientEntry>>> {
    let rows = repo::ingredients_for(&state.db, recipe_ids).await?;
    let mut map: HashMap<Uuid, Vec<IngredientEntry>> = HashMap::new();
    for row in rows {
        map.entry(row.recipe_id).or_default().push(row.into_entry());
    }
    Ok(map)
}

async fn with_ingredients(
    state: &AppState,
    rows: Vec<repo::RecipeRow>,
) -> anyhow::Result<Vec<RecipeResponse>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut map = ingredient_map(state, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let ingredients = map.remove(&row.id).unwrap_or_default();
            RecipeResponse::from_row(row, ingredients)
        })
        .collect())
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, (StatusCode, String)> {
    let rows = repo::list_visible(&state.db, user_id)
        .await
        .map_err(internal)?;
    let recipes = with_ingredients(&state, rows).await.map_err(internal)?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, (StatusCode, String)> {
    let row = repo::find_visible(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    let mut map = ingredient_map(&state, &[id]).await.map_err(internal)?;
    let ingredients = map.remove(&id).unwrap_or_default();
    Ok(Json(RecipeResponse::from_row(row, ingredients)))
}

async fn sync_ingredients(
    state: &AppState,
    recipe_id: Uuid,
    ingredients: &[IngredientEntry],
    refresh_units: bool,
) -> anyhow::Result<()> {
    for ing in ingredients {
        let ingredient_id =
            repo::upsert_ingredient(&state.db, &ing.name, &ing.amount_type, refresh_units).await?;
        repo::link_ingredient(&state.db, recipe_id, ingredient_id, ing.amount).await?;
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeResponse>), (StatusCode, String)> {
    let id = repo::insert(&state.db, user_id, &payload)
        .await
        .map_err(internal)?;
    sync_ingredients(&state, id, &payload.ingredients, false)
        .await
        .map_err(internal)?;

    info!(recipe_id = %id, %user_id, "recipe created");
    let row = repo::find_owned(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    let mut map = ingredient_map(&state, &[id]).await.map_err(internal)?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::from_row(row, map.remove(&id).unwrap_or_default())),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipePayload>,
) -> Result<Json<RecipeResponse>, (StatusCode, String)> {
    if repo::find_owned(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }

    repo::update_fields(&state.db, id, &payload)
        .await
        .map_err(internal)?;
    sync_ingredients(&state, id, &payload.ingredients, true)
        .await
        .map_err(internal)?;

    let keep: Vec<String> = payload.ingredients.iter().map(|i| i.name.clone()).collect();
    repo::prune_links(&state.db, id, &keep)
        .await
        .map_err(internal)?;

    let row = repo::find_owned(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    let mut map = ingredient_map(&state, &[id]).await.map_err(internal)?;
    Ok(Json(RecipeResponse::from_row(
        row,
        map.remove(&id).unwrap_or_default(),
    )))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    if repo::find_owned(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }
    repo::delete(&state.db, id).await.map_err(internal)?;
    info!(recipe_id = %id, %user_id, "recipe deleted");
    Ok(Json(DeletedResponse { deleted: true }))
}

#[instrument(skip(state))]
pub async fn list_public_recipes(
    State(state): State<AppState>,
    Query(query): Query<PublicRecipeQuery>,
) -> Result<Json<Vec<RecipeResponse>>, (StatusCode, String)> {
    let rows = repo::list_public(
        &state.db,
        &state.config.admin_email,
        query.search.as_deref(),
        query.min_calories,
        query.max_calories,
        query.difficulty.as_deref(),
        query.max_cooking_time,
        query.sort_by.as_deref(),
        query.sort_order.as_deref(),
    )
    .await
    .map_err(internal)?;

    // Calorie band filter applied in memory, same as the catalogue UI expects.
    let rows: Vec<_> = match query.category.as_deref() {
        Some("low") => rows.into_iter().filter(|r| r.calories < 300.0).collect(),
        Some("medium") => rows
            .into_iter()
            .filter(|r| (300.0..=600.0).contains(&r.calories))
            .collect(),
        Some("high") => rows.into_iter().filter(|r| r.calories > 600.0).collect(),
        _ => rows,
    };

    let recipes = with_ingredients(&state, rows).await.map_err(internal)?;
    Ok(Json(recipes))
}

async fn find_public(
    state: &AppState,
    id: Uuid,
) -> Result<repo::RecipeRow, (StatusCode, String)> {
    let row = repo::find_any(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    if row.author_id.is_some() {
        warn!(recipe_id = %id, "attempt to edit a personal recipe via public route");
        return Err((
            StatusCode::FORBIDDEN,
            "Only public recipes can be edited here".into(),
        ));
    }
    Ok(row)
}

#[instrument(skip(state, payload))]
pub async fn update_public_recipe(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PublicRecipePayload>,
) -> Result<Json<RecipeResponse>, (StatusCode, String)> {
    find_public(&state, id).await?;
    let payload = RecipePayload {
        name: payload.name,
        calories: payload.calories,
        proteins: payload.proteins,
        fats: payload.fats,
        carbohydrates: payload.carbohydrates,
        instructions: payload.instructions,
        cooking_time: payload.cooking_time,
        difficulty: payload.difficulty,
        ingredients: Vec::new(),
    };
    repo::update_fields(&state.db, id, &payload)
        .await
        .map_err(internal)?;
    info!(recipe_id = %id, %admin_id, "public recipe updated");

    let row = repo::find_any(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;
    let mut map = ingredient_map(&state, &[id]).await.map_err(internal)?;
    Ok(Json(RecipeResponse::from_row(
        row,
        map.remove(&id).unwrap_or_default(),
    )))
}

#[instrument(skip(state))]
pub async fn delete_public_recipe(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    find_public(&state, id).await?;
    repo::delete(&state.db, id).await.map_err(internal)?;
    info!(recipe_id = %id, %admin_id, "public recipe deleted");
    Ok(Json(DeletedResponse { deleted: true }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
