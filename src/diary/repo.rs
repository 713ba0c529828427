use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

/// Diary entry with its recipe joined. Totals are denormalized at insert
/// time (recipe values × serving size) so later recipe edits do not rewrite
/// history.
#[derive(Debug, Clone, FromRow)]
pub struct DiaryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub serving_size: f64,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub recipe_name: String,
    pub recipe_calories: f64,
    pub recipe_proteins: f64,
    pub recipe_fats: f64,
    pub recipe_carbohydrates: f64,
}

const DIARY_SELECT: &str = r#"
    SELECT d.id, d.user_id, d.recipe_id, d.date, d.meal_type, d.serving_size,
           d.calories, d.proteins, d.fats, d.carbohydrates,
           r.name AS recipe_name, r.calories AS recipe_calories,
           r.proteins AS recipe_proteins, r.fats AS recipe_fats,
           r.carbohydrates AS recipe_carbohydrates
    FROM food_diary_entries d
    JOIN recipes r ON r.id = d.recipe_id
"#;

pub async fn list_for_user(
    db: &PgPool,
    user_id: Uuid,
    date: Option<Date>,
) -> anyhow::Result<Vec<DiaryRow>> {
    let rows = sqlx::query_as::<_, DiaryRow>(&format!(
        r#"
        {DIARY_SELECT}
        WHERE d.user_id = $1 AND ($2::date IS NULL OR d.date = $2)
        ORDER BY d.date
        "#
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    recipe_id: Uuid,
    date: Date,
    meal_type: &str,
    serving_size: f64,
    calories: f64,
    proteins: f64,
    fats: f64,
    carbohydrates: f64,
) -> anyhow::Result<DiaryRow> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO food_diary_entries
            (user_id, recipe_id, date, meal_type, serving_size,
             calories, proteins, fats, carbohydrates)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(date)
    .bind(meal_type)
    .bind(serving_size)
    .bind(calories)
    .bind(proteins)
    .bind(fats)
    .bind(carbohydrates)
    .fetch_one(db)
    .await?;

    let row = sqlx::query_as::<_, DiaryRow>(&format!("{DIARY_SELECT} WHERE d.id = $1"))
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(row)
}

pub async fn delete_for_user(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM food_diary_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
