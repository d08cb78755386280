//! Food repository.
//!
//! Foods are unique by case-insensitive name at the application level:
//! lookup-before-insert, no DB constraint. A food that already carries
//! measurements is "enriched" and must never be re-queried against the
//! nutrition API; callers check [`FoodRepository::is_enriched`] before
//! fetching external data.

use std::sync::Arc;

use crate::database::Database;
use crate::error::Result;

/// Repository for food rows.
#[derive(Clone)]
pub struct FoodRepository {
    db: Arc<Database>,
}

impl FoodRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Case-insensitive lookup by name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<i32>> {
        let row = self
            .db
            .client()
            .query_opt(
                "SELECT food_id FROM food WHERE LOWER(name) = LOWER($1)",
                &[&name],
            )
            .await?;
        Ok(row.map(|r| r.get(0)))
    }

    /// Insert the food if absent, returning its id either way. Existing
    /// rows are returned as-is whether or not they are already enriched;
    /// that distinction is a separate query.
    pub async fn upsert(&self, name: &str) -> Result<i32> {
        if let Some(id) = self.find_by_name(name).await? {
            tracing::debug!(food = name, food_id = id, "food already present");
            return Ok(id);
        }

        let row = self
            .db
            .client()
            .query_one(
                "INSERT INTO food (name) VALUES ($1) RETURNING food_id",
                &[&name],
            )
            .await?;
        let id: i32 = row.get(0);
        tracing::debug!(food = name, food_id = id, "inserted food");
        Ok(id)
    }

    /// Whether the food has at least one measurement row. Enriched foods
    /// are skipped by the enrichment pipeline; this is its idempotence
    /// guarantee.
    pub async fn is_enriched(&self, food_id: i32) -> Result<bool> {
        let row = self
            .db
            .client()
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM food_nutrient WHERE food_id = $1)",
                &[&food_id],
            )
            .await?;
        Ok(row.get(0))
    }
}
