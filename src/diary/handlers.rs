use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser},
    dates::{format_day, parse_day, today},
    diary::{
        dto::{CreateDiaryEntry, DaySummaryResponse, DiaryEntryResponse, DiaryQuery},
        repo,
    },
    nutrition,
    recipes::dto::DeletedResponse,
    recipes::repo as recipes_repo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/food-diary", get(list_entries).post(create_entry))
        .route("/food-diary/summary", get(day_summary))
        .route("/food-diary/:id", axum::routing::delete(delete_entry))
}

fn bad_date() -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, "Invalid date".into())
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DiaryQuery>,
) -> Result<Json<Vec<DiaryEntryResponse>>, (StatusCode, String)> {
    let date = match query.date.as_deref() {
        Some(s) => Some(parse_day(s).ok_or_else(bad_date)?),
        None => None,
    };
    let rows = repo::list_for_user(&state.db, user_id, date)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateDiaryEntry>,
) -> Result<(StatusCode, Json<DiaryEntryResponse>), (StatusCode, String)> {
    let date = parse_day(&payload.date).ok_or_else(bad_date)?;

    let recipe = recipes_repo::find_any(&state.db, payload.recipe_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Recipe not found".to_string()))?;

    let row = repo::insert(
        &state.db,
        user_id,
        payload.recipe_id,
        date,
        &payload.meal_type,
        payload.serving_size,
        recipe.calories * payload.serving_size,
        recipe.proteins * payload.serving_size,
        recipe.fats * payload.serving_size,
        recipe.carbohydrates * payload.serving_size,
    )
    .await
    .map_err(internal)?;

    info!(entry_id = %row.id, %user_id, "diary entry created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    repo::delete_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

/// Totals for one day classified against the profile's recommended target;
/// without a complete profile the fixed thresholds apply.
#[instrument(skip(state))]
pub async fn day_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DiaryQuery>,
) -> Result<Json<DaySummaryResponse>, (StatusCode, String)> {
    let date = match query.date.as_deref() {
        Some(s) => parse_day(s).ok_or_else(bad_date)?,
        None => today(),
    };

    let rows = repo::list_for_user(&state.db, user_id, Some(date))
        .await
        .map_err(internal)?;

    let total_calories: f64 = rows.iter().map(|r| r.calories).sum();
    let total_proteins: f64 = rows.iter().map(|r| r.proteins).sum();
    let total_fats: f64 = rows.iter().map(|r| r.fats).sum();
    let total_carbohydrates: f64 = rows.iter().map(|r| r.carbohydrates).sum();

    let recommended = match User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
    {
        Some(user) => nutrition::recommended_calories(&user.nutrition_profile()),
        None => None,
    };

    Ok(Json(DaySummaryResponse {
        date: format_day(date),
        total_calories,
        total_proteins,
        total_fats,
        total_carbohydrates,
        recommended_calories: recommended,
        status: nutrition::classify_day(total_calories, recommended),
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
