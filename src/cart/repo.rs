use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Cart row joined with its recipe's nutrition columns.
#[derive(Debug, Clone, FromRow)]
pub struct CartRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: i32,
    pub recipe_name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

const CART_SELECT: &str = r#"
    SELECT c.id, c.recipe_id, c.quantity, r.name AS recipe_name,
           r.calories, r.proteins, r.fats, r.carbohydrates
    FROM cart_items c
    JOIN recipes r ON r.id = c.recipe_id
"#;

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<CartRow>> {
    let rows = sqlx::query_as::<_, CartRow>(&format!("{CART_SELECT} ORDER BY r.name"))
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<CartRow>> {
    let row = sqlx::query_as::<_, CartRow>(&format!("{CART_SELECT} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Adds one serving of the recipe: bumps the quantity when the recipe is
/// already in the cart, inserts a fresh row otherwise.
pub async fn increment_or_insert(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<CartRow> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO cart_items (recipe_id, quantity)
        VALUES ($1, 1)
        ON CONFLICT (recipe_id) DO UPDATE SET quantity = cart_items.quantity + 1
        RETURNING id
        "#,
    )
    .bind(recipe_id)
    .fetch_one(db)
    .await?;
    find(db, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("cart item vanished after upsert"))
}

pub async fn set_quantity(db: &PgPool, id: Uuid, quantity: i32) -> anyhow::Result<Option<CartRow>> {
    sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
        .bind(id)
        .bind(quantity)
        .execute(db)
        .await?;
    find(db, id).await
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn clear(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM cart_items").execute(db).await?;
    Ok(())
}
