use eyre::Result;

use crate::AppState;

const TABLES: [&str; 6] = [
    "Comment",
    "Article",
    "UserProfile",
    "RevokedToken",
    "UserAccount",
    "_sqlx_migrations",
];

impl AppState {
    /// Drops every table, including the migrations ledger.
    pub async fn reset(&self) -> Result<()> {
        let mut transaction = self.pool.begin().await?;
        for table in TABLES {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *transaction)
                .await?;
        }
        transaction.commit().await?;
        tracing::info!("database reset");
        Ok(())
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}
