//! Nutrient repository: nutrient rows, food–nutrient measurements, and the
//! read-path query the API layer projects.

use std::sync::Arc;

use tokio_postgres::error::SqlState;

use crate::database::Database;
use crate::error::Result;

/// One nutrient value attached to a food, as read back out.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientValue {
    pub name: String,
    pub value: Option<f64>,
    pub unit: String,
}

/// All measurements for one food, grouped for the read path.
#[derive(Debug, Clone)]
pub struct FoodNutrients {
    pub food_name: String,
    pub nutrients: Vec<NutrientValue>,
}

/// Repository for nutrient rows and measurement links.
#[derive(Clone)]
pub struct NutrientRepository {
    db: Arc<Database>,
}

impl NutrientRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Exact-name lookup; insert if absent. Names carry a DB-level unique
    /// constraint, but the lookup keeps the common re-run path quiet.
    pub async fn upsert(&self, name: &str, unit: &str) -> Result<i32> {
        if let Some(row) = self
            .db
            .client()
            .query_opt("SELECT nutrient_id FROM nutrient WHERE name = $1", &[&name])
            .await?
        {
            return Ok(row.get(0));
        }

        let row = self
            .db
            .client()
            .query_one(
                "INSERT INTO nutrient (name, unit) VALUES ($1, $2) RETURNING nutrient_id",
                &[&name, &unit],
            )
            .await?;
        let id: i32 = row.get(0);
        tracing::debug!(nutrient = name, nutrient_id = id, "inserted nutrient");
        Ok(id)
    }

    /// Insert one measurement row. The composite primary key allows at
    /// most one row per (food, nutrient) pair; a duplicate-pair violation
    /// means the desired row already exists and is swallowed.
    pub async fn link(&self, food_id: i32, nutrient_id: i32, value: f64) -> Result<()> {
        let insert = self
            .db
            .client()
            .execute(
                "INSERT INTO food_nutrient (food_id, nutrient_id, value) VALUES ($1, $2, $3)",
                &[&food_id, &nutrient_id, &value],
            )
            .await;

        match insert {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                tracing::debug!(food_id, nutrient_id, "measurement already linked");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read path: every measurement of every food whose name contains
    /// `name` (case-insensitive), grouped per food in name order.
    pub async fn nutrients_for_food_like(&self, name: &str) -> Result<Vec<FoodNutrients>> {
        let pattern = format!("%{}%", name);
        let rows = self
            .db
            .client()
            .query(
                "SELECT f.name, n.name, fn.value, n.unit
                 FROM food f
                 JOIN food_nutrient fn ON f.food_id = fn.food_id
                 JOIN nutrient n ON fn.nutrient_id = n.nutrient_id
                 WHERE LOWER(f.name) LIKE LOWER($1)
                 ORDER BY f.name",
                &[&pattern],
            )
            .await?;

        let mut grouped: Vec<FoodNutrients> = Vec::new();
        for row in rows {
            let food_name: String = row.get(0);
            let measurement = NutrientValue {
                name: row.get(1),
                value: row.get(2),
                unit: row.get(3),
            };

            match grouped.last_mut() {
                Some(entry) if entry.food_name == food_name => entry.nutrients.push(measurement),
                _ => grouped.push(FoodNutrients {
                    food_name,
                    nutrients: vec![measurement],
                }),
            }
        }

        Ok(grouped)
    }
}
