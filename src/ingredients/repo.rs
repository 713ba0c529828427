use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub amount_type: String,
}

/// Distinct ingredients referenced by the user's own recipes.
pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT DISTINCT i.id, i.name, i.amount_type
        FROM ingredients i
        JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        JOIN recipes r ON r.id = ri.recipe_id
        WHERE r.author_id = $1
        ORDER BY i.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, amount_type FROM ingredients WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, name: &str, amount_type: &str) -> anyhow::Result<Ingredient> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        INSERT INTO ingredients (name, amount_type)
        VALUES ($1, $2)
        RETURNING id, name, amount_type
        "#,
    )
    .bind(name)
    .bind(amount_type)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// True while any of the user's recipes still references the ingredient.
pub async fn used_by_user(db: &PgPool, user_id: Uuid, ingredient_id: Uuid) -> anyhow::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM recipe_ingredients ri
            JOIN recipes r ON r.id = ri.recipe_id
            WHERE ri.ingredient_id = $1 AND r.author_id = $2
        )
        "#,
    )
    .bind(ingredient_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

/// Removes the ingredient together with its pantry rows.
pub async fn delete(db: &PgPool, ingredient_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM stock_items WHERE ingredient_id = $1")
        .bind(ingredient_id)
        .execute(db)
        .await?;
    sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(ingredient_id)
        .execute(db)
        .await?;
    Ok(())
}
