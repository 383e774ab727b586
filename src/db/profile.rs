use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::UserId;
use crate::AppState;

id_struct!(ProfileId, Profile);

/// Per-user profile row, created during registration.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub created: DateTime<Utc>,
}

impl AppState {
    pub async fn get_profile(&self, user_id: UserId) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM UserProfile WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }
}
