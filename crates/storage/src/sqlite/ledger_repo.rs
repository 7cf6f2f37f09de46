use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{LEDGER_STORAGE_KEY, LedgerRepository, StorageError};
use quiz_core::model::AnswerLedger;

use super::SqliteRepository;

#[async_trait]
impl LedgerRepository for SqliteRepository {
    async fn load_ledger(&self) -> Result<AnswerLedger, StorageError> {
        let row = sqlx::query("SELECT data FROM answer_ledger WHERE key = ?1")
            .bind(LEDGER_STORAGE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        // No row yet means no answer was ever recorded.
        let Some(row) = row else {
            return Ok(AnswerLedger::new());
        };

        let data: String = row
            .try_get("data")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        serde_json::from_str(&data).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_ledger(&self, ledger: &AnswerLedger) -> Result<(), StorageError> {
        let data = serde_json::to_string(ledger)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO answer_ledger (key, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            ",
        )
        .bind(LEDGER_STORAGE_KEY)
        .bind(data)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
