use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::recipes::dto::{IngredientEntry, RecipePayload};

/// Recipe joined with its author's public columns.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub instructions: Option<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<String>,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

/// Ingredient line joined through recipe_ingredients, keyed by recipe.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub amount_type: String,
}

impl RecipeIngredientRow {
    pub fn into_entry(self) -> IngredientEntry {
        IngredientEntry {
            name: self.name,
            amount: self.amount,
            amount_type: self.amount_type,
        }
    }
}

const RECIPE_COLUMNS: &str = r#"
    r.id, r.name, r.calories, r.proteins, r.fats, r.carbohydrates,
    r.instructions, r.cooking_time, r.difficulty, r.author_id,
    u.name AS author_name, u.email AS author_email
"#;

/// The user's own recipes plus the public catalogue.
pub async fn list_visible(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RecipeRow>> {
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE r.author_id = $1 OR r.author_id IS NULL
        ORDER BY r.created_at
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_visible(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<RecipeRow>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE r.id = $1 AND (r.author_id = $2 OR r.author_id IS NULL)
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<RecipeRow>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE r.id = $1 AND r.author_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_any(db: &PgPool, id: Uuid) -> anyhow::Result<Option<RecipeRow>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE r.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Ingredient lines for a batch of recipes, one round-trip.
pub async fn ingredients_for(
    db: &PgPool,
    recipe_ids: &[Uuid],
) -> anyhow::Result<Vec<RecipeIngredientRow>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, RecipeIngredientRow>(
        r#"
        SELECT ri.recipe_id, i.name, ri.amount, i.amount_type
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ANY($1)
        "#,
    )
    .bind(recipe_ids.to_vec())
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    author_id: Uuid,
    payload: &RecipePayload,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO recipes
            (name, calories, proteins, fats, carbohydrates, instructions,
             cooking_time, difficulty, author_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(payload.calories)
    .bind(payload.proteins)
    .bind(payload.fats)
    .bind(payload.carbohydrates)
    .bind(&payload.instructions)
    .bind(payload.cooking_time)
    .bind(&payload.difficulty)
    .bind(author_id)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn update_fields(db: &PgPool, id: Uuid, payload: &RecipePayload) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE recipes
        SET name = $2, calories = $3, proteins = $4, fats = $5,
            carbohydrates = $6, instructions = $7, cooking_time = $8,
            difficulty = $9
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(payload.calories)
    .bind(payload.proteins)
    .bind(payload.fats)
    .bind(payload.carbohydrates)
    .bind(&payload.instructions)
    .bind(payload.cooking_time)
    .bind(&payload.difficulty)
    .execute(db)
    .await?;
    Ok(())
}

/// Ingredients are identified by exact name and shared across recipes;
/// referencing a new name creates the row on the fly. `refresh_unit`
/// propagates a changed unit label on edit, matching the original behavior.
pub async fn upsert_ingredient(
    db: &PgPool,
    name: &str,
    amount_type: &str,
    refresh_unit: bool,
) -> anyhow::Result<Uuid> {
    let sql = if refresh_unit {
        r#"
        INSERT INTO ingredients (name, amount_type)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET amount_type = EXCLUDED.amount_type
        RETURNING id
        "#
    } else {
        r#"
        INSERT INTO ingredients (name, amount_type)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#
    };
    let (id,): (Uuid,) = sqlx::query_as(sql)
        .bind(name)
        .bind(amount_type)
        .fetch_one(db)
        .await?;
    Ok(id)
}

pub async fn link_ingredient(
    db: &PgPool,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    amount: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
        VALUES ($1, $2, $3)
        ON CONFLICT (recipe_id, ingredient_id) DO UPDATE SET amount = EXCLUDED.amount
        "#,
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(amount)
    .execute(db)
    .await?;
    Ok(())
}

/// Drops links to ingredients no longer present in the edited recipe.
pub async fn prune_links(db: &PgPool, recipe_id: Uuid, keep: &[String]) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM recipe_ingredients ri
        USING ingredients i
        WHERE ri.ingredient_id = i.id
          AND ri.recipe_id = $1
          AND i.name <> ALL($2)
        "#,
    )
    .bind(recipe_id)
    .bind(keep.to_vec())
    .execute(db)
    .await?;
    Ok(())
}

/// Calendar entries and ingredient links go with the recipe (FK cascades).
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

const PUBLIC_SORT_COLUMNS: [(&str, &str); 4] = [
    ("name", "r.name"),
    ("calories", "r.calories"),
    ("cookingTime", "r.cooking_time"),
    ("difficulty", "r.difficulty"),
];

/// Public catalogue with optional filters. Sort column and direction are
/// whitelisted before being spliced into the statement.
pub async fn list_public(
    db: &PgPool,
    admin_email: &str,
    search: Option<&str>,
    min_calories: Option<f64>,
    max_calories: Option<f64>,
    difficulty: Option<&str>,
    max_cooking_time: Option<i32>,
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> anyhow::Result<Vec<RecipeRow>> {
    let order_column = PUBLIC_SORT_COLUMNS
        .iter()
        .find(|(key, _)| Some(*key) == sort_by)
        .map_or("r.name", |(_, col)| col);
    let order_dir = match sort_order {
        Some("desc") => "DESC",
        _ => "ASC",
    };

    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE (r.author_id IS NULL OR u.email = $1)
          AND ($2::text IS NULL OR r.name ILIKE '%' || $2 || '%')
          AND ($3::float8 IS NULL OR r.calories >= $3)
          AND ($4::float8 IS NULL OR r.calories <= $4)
          AND ($5::text IS NULL OR r.difficulty = $5)
          AND ($6::int IS NULL OR r.cooking_time <= $6)
        ORDER BY {order_column} {order_dir}
        "#
    ))
    .bind(admin_email)
    .bind(search)
    .bind(min_calories)
    .bind(max_calories)
    .bind(difficulty)
    .bind(max_cooking_time)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
