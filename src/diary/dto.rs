use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::format_day;
use crate::diary::repo::DiaryRow;
use crate::nutrition::CalorieStatus;
use crate::recipes::dto::RecipeSummary;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryResponse {
    pub id: Uuid,
    pub date: String,
    pub meal_type: String,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub serving_size: f64,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub recipe: RecipeSummary,
}

impl From<DiaryRow> for DiaryEntryResponse {
    fn from(row: DiaryRow) -> Self {
        Self {
            id: row.id,
            date: format_day(row.date),
            meal_type: row.meal_type,
            recipe_id: row.recipe_id,
            user_id: row.user_id,
            serving_size: row.serving_size,
            calories: row.calories,
            proteins: row.proteins,
            fats: row.fats,
            carbohydrates: row.carbohydrates,
            recipe: RecipeSummary {
                id: row.recipe_id,
                name: row.recipe_name,
                calories: row.recipe_calories,
                proteins: row.recipe_proteins,
                fats: row.recipe_fats,
                carbohydrates: row.recipe_carbohydrates,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaryEntry {
    pub date: String,
    pub recipe_id: Uuid,
    pub meal_type: String,
    pub serving_size: f64,
}

#[derive(Debug, Deserialize)]
pub struct DiaryQuery {
    pub date: Option<String>,
}

/// Day totals with the calorie target comparison driving the diary UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummaryResponse {
    pub date: String,
    pub total_calories: f64,
    pub total_proteins: f64,
    pub total_fats: f64,
    pub total_carbohydrates: f64,
    pub recommended_calories: Option<i32>,
    pub status: CalorieStatus,
}
