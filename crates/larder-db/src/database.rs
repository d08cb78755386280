//! Database connection and table management.

use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::error::{DbError, Result};
use crate::schema;

/// Main relational store handle. One long-lived connection per orchestrator
/// run; dropped when the run ends.
pub struct Database {
    client: Client,
}

impl Database {
    /// Connect to the store. An unreachable database is fatal to the run,
    /// so the distinct [`DbError::Connect`] variant surfaces here.
    pub async fn connect(conn_str: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(DbError::Connect)?;

        // The connection task owns the socket; it ends when the client drops.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "relational store connection closed");
            }
        });

        Ok(Self { client })
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create the tables if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        self.client.batch_execute(schema::SCHEMA_DDL).await?;
        Ok(())
    }

    /// Get table statistics.
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            foods: self.count(schema::TABLE_FOOD).await?,
            nutrients: self.count(schema::TABLE_NUTRIENT).await?,
            measurements: self.count(schema::TABLE_FOOD_NUTRIENT).await?,
        })
    }

    async fn count(&self, table: &str) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        let row = self.client.query_one(query.as_str(), &[]).await?;
        let n: i64 = row.get(0);
        Ok(n as u64)
    }
}

/// Database statistics.
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub foods: u64,
    pub nutrients: u64,
    pub measurements: u64,
}
