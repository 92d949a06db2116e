// db/preferencedb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::preferencemodel::{Theme, UserPreference};

#[async_trait]
pub trait PreferenceExt: Send + Sync {
    async fn get_theme(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error>;

    async fn save_theme(&self, user_id: Uuid, theme: Theme) -> Result<UserPreference, sqlx::Error>;
}

#[async_trait]
impl PreferenceExt for DBClient {
    async fn get_theme(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"SELECT theme FROM user_preferences WHERE user_id = $1"#
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_theme(&self, user_id: Uuid, theme: Theme) -> Result<UserPreference, sqlx::Error> {
        sqlx::query_as::<_, UserPreference>(
            r#"
            INSERT INTO user_preferences (user_id, theme)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET theme = EXCLUDED.theme, updated_at = NOW()
            RETURNING user_id, theme, updated_at
            "#
        )
        .bind(user_id)
        .bind(theme.to_str())
        .fetch_one(&self.pool)
        .await
    }
}
