use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    ingredients,
    recipes::dto::DeletedResponse,
    state::AppState,
    stock::repo::{self, StockRow},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(list_stock))
        .route("/stock/:ingredient_id", put(set_stock))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemResponse {
    pub ingredient_id: Uuid,
    pub amount: f64,
    pub ingredient: ingredients::repo::Ingredient,
}

impl From<StockRow> for StockItemResponse {
    fn from(row: StockRow) -> Self {
        Self {
            ingredient_id: row.ingredient_id,
            amount: row.amount,
            ingredient: ingredients::repo::Ingredient {
                id: row.ingredient_id,
                name: row.name,
                amount_type: row.amount_type,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStock {
    pub amount: f64,
}

#[instrument(skip(state))]
pub async fn list_stock(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<StockItemResponse>>, (StatusCode, String)> {
    let rows = repo::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Sets the on-hand amount for an ingredient; non-positive amounts remove
/// the pantry row entirely.
#[instrument(skip(state, payload))]
pub async fn set_stock(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(ingredient_id): Path<Uuid>,
    Json(payload): Json<SetStock>,
) -> Result<Response, (StatusCode, String)> {
    if !ingredients::repo::used_by_user(&state.db, user_id, ingredient_id)
        .await
        .map_err(internal)?
    {
        return Err((
            StatusCode::NOT_FOUND,
            "Ingredient not found in your recipes".into(),
        ));
    }

    if payload.amount <= 0.0 {
        repo::delete(&state.db, ingredient_id)
            .await
            .map_err(internal)?;
        info!(%ingredient_id, %user_id, "stock row removed");
        return Ok(Json(DeletedResponse { deleted: true }).into_response());
    }

    let row = repo::upsert(&state.db, ingredient_id, payload.amount)
        .await
        .map_err(internal)?;
    info!(%ingredient_id, %user_id, amount = payload.amount, "stock updated");
    Ok(Json(StockItemResponse::from(row)).into_response())
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
