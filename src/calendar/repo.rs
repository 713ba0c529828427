use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

/// Planning entry joined with its recipe's nutrition columns.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub recipe_name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

const CALENDAR_SELECT: &str = r#"
    SELECT ci.id, ci.user_id, ci.recipe_id, ci.date, ci.meal_type,
           r.name AS recipe_name, r.calories, r.proteins, r.fats, r.carbohydrates
    FROM calendar_items ci
    JOIN recipes r ON r.id = ci.recipe_id
"#;

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<CalendarRow>> {
    let rows = sqlx::query_as::<_, CalendarRow>(&format!(
        "{CALENDAR_SELECT} WHERE ci.user_id = $1 ORDER BY ci.date"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_for_day(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<CalendarRow>> {
    let rows = sqlx::query_as::<_, CalendarRow>(&format!(
        "{CALENDAR_SELECT} WHERE ci.user_id = $1 AND ci.date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_for_user(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<CalendarRow>> {
    let row = sqlx::query_as::<_, CalendarRow>(&format!(
        "{CALENDAR_SELECT} WHERE ci.id = $1 AND ci.user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// At most one entry per (user, date, recipe, meal type); `exclude` skips
/// the entry being moved so it does not conflict with itself.
pub async fn conflict_exists(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    recipe_id: Uuid,
    meal_type: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM calendar_items
            WHERE user_id = $1 AND date = $2 AND recipe_id = $3 AND meal_type = $4
              AND ($5::uuid IS NULL OR id <> $5)
        )
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(recipe_id)
    .bind(meal_type)
    .bind(exclude)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    recipe_id: Uuid,
    meal_type: &str,
) -> anyhow::Result<CalendarRow> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO calendar_items (user_id, date, recipe_id, meal_type)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(recipe_id)
    .bind(meal_type)
    .fetch_one(db)
    .await?;
    find_for_user(db, user_id, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("calendar item vanished after insert"))
}

pub async fn reschedule(
    db: &PgPool,
    id: Uuid,
    date: Date,
    meal_type: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE calendar_items SET date = $2, meal_type = $3 WHERE id = $1")
        .bind(id)
        .bind(date)
        .bind(meal_type)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete_for_user(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM calendar_items WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
