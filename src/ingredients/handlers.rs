use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    ingredients::repo::{self, Ingredient},
    recipes::dto::DeletedResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/ingredients/:id", axum::routing::delete(delete_ingredient))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredient {
    pub name: String,
    pub amount_type: String,
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Ingredient>>, (StatusCode, String)> {
    let rows = repo::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateIngredient>,
) -> Result<(StatusCode, Json<Ingredient>), (StatusCode, String)> {
    if repo::find_by_name(&state.db, &payload.name)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(name = %payload.name, "ingredient already exists");
        return Err((StatusCode::CONFLICT, "Ingredient already exists".into()));
    }

    let ingredient = repo::insert(&state.db, &payload.name, &payload.amount_type)
        .await
        .map_err(internal)?;
    info!(ingredient_id = %ingredient.id, %user_id, "ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient)))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    if repo::used_by_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
    {
        return Err((
            StatusCode::CONFLICT,
            "Ingredient is still used by your recipes".into(),
        ));
    }
    repo::delete(&state.db, id).await.map_err(internal)?;
    info!(ingredient_id = %id, %user_id, "ingredient deleted");
    Ok(Json(DeletedResponse { deleted: true }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
