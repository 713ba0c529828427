use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    calendar::{
        dto::{CalendarItemResponse, CreateCalendarItem, UpdateCalendarItem},
        repo,
    },
    cart,
    dates::parse_day,
    recipes::dto::DeletedResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(list_calendar).post(create_item))
        .route(
            "/calendar/:id",
            axum::routing::put(move_item).delete(delete_item),
        )
        .route("/calendar/add-to-cart", post(add_all_to_cart))
}

fn bad_date() -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, "Invalid date".into())
}

fn duplicate() -> (StatusCode, String) {
    (
        StatusCode::CONFLICT,
        "This recipe is already planned for that date and meal".into(),
    )
}

#[instrument(skip(state))]
pub async fn list_calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CalendarItemResponse>>, (StatusCode, String)> {
    let rows = repo::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCalendarItem>,
) -> Result<(StatusCode, Json<CalendarItemResponse>), (StatusCode, String)> {
    let date = parse_day(&payload.date).ok_or_else(bad_date)?;

    if repo::conflict_exists(&state.db, user_id, date, payload.recipe_id, &payload.meal_type, None)
        .await
        .map_err(internal)?
    {
        warn!(%user_id, recipe_id = %payload.recipe_id, date = %payload.date, "duplicate calendar entry");
        return Err(duplicate());
    }

    let row = repo::insert(&state.db, user_id, date, payload.recipe_id, &payload.meal_type)
        .await
        .map_err(internal)?;
    info!(calendar_id = %row.id, %user_id, "calendar entry created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state, payload))]
pub async fn move_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCalendarItem>,
) -> Result<Json<CalendarItemResponse>, (StatusCode, String)> {
    let date = parse_day(&payload.date).ok_or_else(bad_date)?;

    let existing = repo::find_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Calendar item not found".to_string()))?;
    let meal_type = payload.meal_type.unwrap_or(existing.meal_type);

    if repo::conflict_exists(
        &state.db,
        user_id,
        date,
        existing.recipe_id,
        &meal_type,
        Some(id),
    )
    .await
    .map_err(internal)?
    {
        return Err(duplicate());
    }

    repo::reschedule(&state.db, id, date, &meal_type)
        .await
        .map_err(internal)?;
    let row = repo::find_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Calendar item not found".to_string()))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    repo::delete_for_user(&state.db, user_id, id)
        .await
        .map_err(internal)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

/// Pushes every planned recipe into the shared cart, one serving per
/// calendar entry.
#[instrument(skip(state))]
pub async fn add_all_to_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<cart::handlers::CartItemResponse>>, (StatusCode, String)> {
    let items = repo::list_for_user(&state.db, user_id)
        .await
        .map_err(internal)?;

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let row = cart::repo::increment_or_insert(&state.db, item.recipe_id)
            .await
            .map_err(internal)?;
        results.push(row);
    }

    info!(%user_id, count = results.len(), "calendar pushed to cart");
    let mut responses = Vec::with_capacity(results.len());
    for row in results {
        responses.push(
            cart::handlers::assemble_one(&state, row)
                .await
                .map_err(internal)?,
        );
    }
    Ok(Json(responses))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
