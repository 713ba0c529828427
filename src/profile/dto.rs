use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::User;
use crate::nutrition;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub daily_calories: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub recommended_calories: Option<i32>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let recommended = nutrition::recommended_calories(&user.nutrition_profile());
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            picture: user.picture,
            height: user.height,
            weight: user.weight,
            target_weight: user.target_weight,
            daily_calories: user.daily_calories,
            age: user.age,
            gender: user.gender,
            activity_level: user.activity_level,
            goal: user.goal,
            recommended_calories: recommended,
        }
    }
}

/// Whole-profile write: fields left out of the payload are cleared, not kept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub daily_calories: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}
