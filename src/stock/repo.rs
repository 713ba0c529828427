use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Pantry row joined with its ingredient.
#[derive(Debug, Clone, FromRow)]
pub struct StockRow {
    pub ingredient_id: Uuid,
    pub amount: f64,
    pub name: String,
    pub amount_type: String,
}

/// Pantry rows for the ingredients appearing in the user's recipes. The
/// table itself is global; only the view is scoped.
pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<StockRow>> {
    let rows = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT s.ingredient_id, s.amount, i.name, i.amount_type
        FROM stock_items s
        JOIN ingredients i ON i.id = s.ingredient_id
        WHERE s.ingredient_id IN (
            SELECT DISTINCT ri.ingredient_id
            FROM recipe_ingredients ri
            JOIN recipes r ON r.id = ri.recipe_id
            WHERE r.author_id = $1
        )
        ORDER BY i.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Whole pantry as `name -> amount`, the shape the aggregator consumes.
pub async fn amounts_by_name(db: &PgPool) -> anyhow::Result<HashMap<String, f64>> {
    let rows: Vec<(String, f64)> = sqlx::query_as(
        r#"
        SELECT i.name, s.amount
        FROM stock_items s
        JOIN ingredients i ON i.id = s.ingredient_id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn upsert(db: &PgPool, ingredient_id: Uuid, amount: f64) -> anyhow::Result<StockRow> {
    let row = sqlx::query_as::<_, StockRow>(
        r#"
        WITH upserted AS (
            INSERT INTO stock_items (ingredient_id, amount)
            VALUES ($1, $2)
            ON CONFLICT (ingredient_id) DO UPDATE SET amount = EXCLUDED.amount
            RETURNING ingredient_id, amount
        )
        SELECT u.ingredient_id, u.amount, i.name, i.amount_type
        FROM upserted u
        JOIN ingredients i ON i.id = u.ingredient_id
        "#,
    )
    .bind(ingredient_id)
    .bind(amount)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Zero or negative amounts delete the row rather than storing them.
pub async fn delete(db: &PgPool, ingredient_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM stock_items WHERE ingredient_id = $1")
        .bind(ingredient_id)
        .execute(db)
        .await?;
    Ok(())
}
