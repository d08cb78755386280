//! Document store connection handle.

use mongodb::bson::doc;
use mongodb::{Client, Database};

use crate::error::Result;

/// Main document store handle. Like the relational handle, it lives for
/// one orchestrator run and is dropped at the end.
#[derive(Clone)]
pub struct DocStore {
    db: Database,
}

impl DocStore {
    /// Connect to the store and select the database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            db: client.database(database),
        })
    }

    /// Round-trip connectivity check. Run once at startup; an unreachable
    /// store is fatal before any item is processed.
    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
