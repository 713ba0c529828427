use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::google::GoogleUserInfo;
use crate::nutrition::{self, ActivityLevel, Gender, Goal};

/// User record in the database. Profile fields are all nullable; the
/// calorie recommendation stays unavailable until they are filled in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub google_id: String,
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
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = r#"
    id, google_id, email, name, picture, height, weight, target_weight,
    daily_calories, age, gender, activity_level, goal, created_at
"#;

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Creates the user on first login; refreshes email, name and picture
    /// from Google on every subsequent one.
    pub async fn upsert_from_google(db: &PgPool, info: &GoogleUserInfo) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (google_id, email, name, picture)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (google_id) DO UPDATE
                SET email = EXCLUDED.email,
                    name = EXCLUDED.name,
                    picture = EXCLUDED.picture
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&info.id)
        .bind(&info.email)
        .bind(&info.name)
        .bind(&info.picture)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Typed view of the nullable profile columns for the calculator.
    pub fn nutrition_profile(&self) -> nutrition::Profile {
        nutrition::Profile {
            age: self.age.map(f64::from),
            weight_kg: self.weight,
            height_cm: self.height,
            gender: self.gender.as_deref().and_then(Gender::parse),
            activity_level: self.activity_level.as_deref().and_then(ActivityLevel::parse),
            goal: self.goal.as_deref().and_then(Goal::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(
        age: Option<i32>,
        gender: Option<&str>,
        activity: Option<&str>,
        goal: Option<&str>,
    ) -> User {
        User {
            id: Uuid::new_v4(),
            google_id: "g-1".into(),
            email: "user@example.com".into(),
            name: None,
            picture: None,
            height: Some(175.0),
            weight: Some(70.0),
            target_weight: None,
            daily_calories: None,
            age,
            gender: gender.map(Into::into),
            activity_level: activity.map(Into::into),
            goal: goal.map(Into::into),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn complete_profile_converts_to_typed_fields() {
        let user = user_with(
            Some(30),
            Some("male"),
            Some("moderately_active"),
            Some("lose_weight"),
        );
        let profile = user.nutrition_profile();
        assert_eq!(profile.age, Some(30.0));
        assert_eq!(profile.gender, Some(Gender::Male));
        assert_eq!(profile.activity_level, Some(ActivityLevel::ModeratelyActive));
        assert_eq!(profile.goal, Some(Goal::LoseWeight));
        assert!(nutrition::recommended_calories(&profile).is_some());
    }

    #[test]
    fn missing_columns_leave_recommendation_unavailable() {
        let user = user_with(None, Some("female"), Some("sedentary"), None);
        assert_eq!(
            nutrition::recommended_calories(&user.nutrition_profile()),
            None
        );
    }
}
