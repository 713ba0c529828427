use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::profile::dto::UpdateProfile;

pub async fn replace_profile(
    db: &PgPool,
    user_id: Uuid,
    payload: &UpdateProfile,
) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET height = $2,
            weight = $3,
            target_weight = $4,
            daily_calories = $5,
            age = $6,
            gender = $7,
            activity_level = $8,
            goal = $9
        WHERE id = $1
        RETURNING id, google_id, email, name, picture, height, weight,
                  target_weight, daily_calories, age, gender, activity_level,
                  goal, created_at
        "#,
    )
    .bind(user_id)
    .bind(payload.height)
    .bind(payload.weight)
    .bind(payload.target_weight)
    .bind(payload.daily_calories)
    .bind(payload.age)
    .bind(&payload.gender)
    .bind(&payload.activity_level)
    .bind(&payload.goal)
    .fetch_optional(db)
    .await?;
    Ok(user)
}
