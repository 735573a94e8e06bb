use crate::domain::prediction::{PredictionRecord, PredictionResult, Timeframe};
use crate::domain::repositories::{HistoricalPriceStore, PredictionRepository};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

pub struct SqlitePriceHistoryStore {
    pool: SqlitePool,
}

impl SqlitePriceHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store one price per day, the last one dated `end`
    pub async fn save_daily_prices(
        &self,
        token_id: &str,
        end: DateTime<Utc>,
        prices: &[f64],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let count = prices.len() as i64;

        for (i, price) in prices.iter().enumerate() {
            let timestamp = end - Duration::days(count - 1 - i as i64);
            sqlx::query(
                r#"
                INSERT INTO price_history (token_id, timestamp, price)
                VALUES (?, ?, ?)
                ON CONFLICT(token_id, timestamp) DO UPDATE SET price = excluded.price
                "#,
            )
            .bind(token_id)
            .bind(timestamp.timestamp_millis())
            .bind(price)
            .execute(&mut *tx)
            .await
            .context("Failed to save price")?;
        }

        tx.commit().await.context("Failed to commit price history")?;
        info!("Persisted {} prices for {}", prices.len(), token_id);
        Ok(())
    }
}

#[async_trait]
impl HistoricalPriceStore for SqlitePriceHistoryStore {
    async fn fetch_historical_prices(&self, token_id: &str, days: usize) -> Result<Vec<f64>> {
        let rows = sqlx::query(
            r#"
            SELECT price FROM (
                SELECT price, timestamp FROM price_history
                WHERE token_id = ?
                ORDER BY timestamp DESC
                LIMIT ?
            ) ORDER BY timestamp ASC
            "#,
        )
        .bind(token_id)
        .bind(days as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch price history")?;

        let prices = rows
            .iter()
            .map(|row| row.try_get::<f64, _>("price"))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Fetched {} prices for {}", prices.len(), token_id);
        Ok(prices)
    }
}

pub struct SqlitePredictionRepository {
    pool: SqlitePool,
}

impl SqlitePredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<PredictionRecord> {
        let id: String = row.try_get("id")?;
        let timeframe: String = row.try_get("timeframe")?;
        let created_at: i64 = row.try_get("created_at")?;

        Ok(PredictionRecord {
            id: Uuid::parse_str(&id).context("Invalid prediction id")?,
            result: PredictionResult {
                token_id: row.try_get("token_id")?,
                current_price: row.try_get("current_price")?,
                predicted_price: row.try_get("predicted_price")?,
                predicted_change: row.try_get("predicted_change")?,
                confidence: row.try_get("confidence")?,
                timeframe: timeframe.parse::<Timeframe>()?,
            },
            created_at: DateTime::from_timestamp_micros(created_at)
                .ok_or_else(|| anyhow!("Invalid created_at: {}", created_at))?,
        })
    }
}

#[async_trait]
impl PredictionRepository for SqlitePredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        let result = &record.result;
        sqlx::query(
            r#"
            INSERT INTO predictions (id, token_id, current_price, predicted_price,
                predicted_change, confidence, timeframe, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(record.id.to_string())
        .bind(&result.token_id)
        .bind(result.current_price)
        .bind(result.predicted_price)
        .bind(result.predicted_change)
        .bind(result.confidence)
        .bind(result.timeframe.as_str())
        .bind(record.created_at.timestamp_micros())
        .execute(&self.pool)
        .await
        .context("Failed to save prediction")?;

        debug!("Persisted prediction {}", record.id);
        Ok(())
    }

    async fn find_by_token(&self, token_id: &str, limit: usize) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM predictions WHERE token_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(token_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load predictions")?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM predictions")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::Database;

    fn record_at(token_id: &str, timeframe: Timeframe, micros: i64) -> PredictionRecord {
        PredictionRecord {
            id: Uuid::new_v4(),
            result: PredictionResult {
                token_id: token_id.to_string(),
                current_price: 105.0,
                predicted_price: 107.5,
                predicted_change: 2.380952380952381,
                confidence: 81.25,
                timeframe,
            },
            created_at: DateTime::from_timestamp_micros(micros).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_prediction_round_trip() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqlitePredictionRepository::new(db.pool.clone());

        let older = record_at("aptos", Timeframe::OneDay, 1_700_000_000_000_000);
        let newer = record_at("aptos", Timeframe::ThirtyDays, 1_700_000_000_123_456);
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();
        repo.save(&record_at("bitcoin", Timeframe::SevenDays, 1_700_000_000_000_001))
            .await
            .unwrap();

        let found = repo.find_by_token("aptos", 10).await.unwrap();
        assert_eq!(found, vec![newer.clone(), older]);
        assert_eq!(repo.find_by_token("aptos", 1).await.unwrap(), vec![newer]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_ignored() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqlitePredictionRepository::new(db.pool.clone());

        let record = record_at("aptos", Timeframe::SevenDays, 1_700_000_000_000_000);
        repo.save(&record).await.unwrap();
        repo.save(&record).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_price_history_returns_latest_in_order() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let store = SqlitePriceHistoryStore::new(db.pool.clone());
        let end = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        store
            .save_daily_prices("aptos", end, &[1.0, 2.0, 3.0, 4.0, 5.0])
            .await
            .unwrap();

        assert_eq!(
            store.fetch_historical_prices("aptos", 3).await.unwrap(),
            vec![3.0, 4.0, 5.0]
        );
        assert_eq!(store.fetch_historical_prices("aptos", 30).await.unwrap().len(), 5);
        assert!(store.fetch_historical_prices("bitcoin", 30).await.unwrap().is_empty());

        // Re-seeding the same days overwrites instead of duplicating
        store.save_daily_prices("aptos", end, &[9.0]).await.unwrap();
        assert_eq!(
            store.fetch_historical_prices("aptos", 2).await.unwrap(),
            vec![4.0, 9.0]
        );
    }
}
