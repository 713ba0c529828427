use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recipes::repo::RecipeRow;

/// One ingredient line of a recipe, amounts per single serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientEntry {
    pub name: String,
    pub amount: f64,
    pub amount_type: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
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
    pub author: Option<AuthorInfo>,
    pub ingredients: Vec<IngredientEntry>,
}

impl RecipeResponse {
    pub fn from_row(row: RecipeRow, ingredients: Vec<IngredientEntry>) -> Self {
        let author = row.author_id.map(|id| AuthorInfo {
            id,
            name: row.author_name,
            email: row.author_email.unwrap_or_default(),
        });
        Self {
            id: row.id,
            name: row.name,
            calories: row.calories,
            proteins: row.proteins,
            fats: row.fats,
            carbohydrates: row.carbohydrates,
            instructions: row.instructions,
            cooking_time: row.cooking_time,
            difficulty: row.difficulty,
            author_id: row.author_id,
            author,
            ingredients,
        }
    }
}

/// Compact recipe shape embedded in calendar and diary responses.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub instructions: Option<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<String>,
    pub ingredients: Vec<IngredientEntry>,
}

/// Public catalogue edit payload; ingredient lists stay untouched there.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRecipePayload {
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub instructions: Option<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRecipeQuery {
    pub search: Option<String>,
    /// Calorie band: low (<300), medium (300–600), high (>600).
    pub category: Option<String>,
    pub min_calories: Option<f64>,
    pub max_calories: Option<f64>,
    pub difficulty: Option<String>,
    pub max_cooking_time: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}
