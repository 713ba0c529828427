use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::repo::CalendarRow;
use crate::dates::format_day;
use crate::recipes::dto::RecipeSummary;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItemResponse {
    pub id: Uuid,
    pub date: String,
    pub meal_type: String,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub recipe: RecipeSummary,
}

impl From<CalendarRow> for CalendarItemResponse {
    fn from(row: CalendarRow) -> Self {
        Self {
            id: row.id,
            date: format_day(row.date),
            meal_type: row.meal_type,
            recipe_id: row.recipe_id,
            user_id: row.user_id,
            recipe: RecipeSummary {
                id: row.recipe_id,
                name: row.recipe_name,
                calories: row.calories,
                proteins: row.proteins,
                fats: row.fats,
                carbohydrates: row.carbohydrates,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarItem {
    pub date: String,
    pub recipe_id: Uuid,
    pub meal_type: String,
}

/// Move payload; an absent meal type keeps the current one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalendarItem {
    pub date: String,
    pub meal_type: Option<String>,
}
