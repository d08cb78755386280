//! Table names and DDL for the relational store.

pub const TABLE_FOOD: &str = "food";
pub const TABLE_NUTRIENT: &str = "nutrient";
pub const TABLE_FOOD_NUTRIENT: &str = "food_nutrient";

/// Idempotent schema. Foods are unique by name only at the application
/// level (lookup-before-insert); nutrients carry a hard unique constraint
/// on exact name; one measurement per (food, nutrient) pair is enforced by
/// the composite primary key. Measurements disappear with their food or
/// nutrient.
pub const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS food (
    food_id SERIAL PRIMARY KEY,
    name    VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS nutrient (
    nutrient_id SERIAL PRIMARY KEY,
    name        VARCHAR(255) NOT NULL UNIQUE,
    unit        VARCHAR(50) NOT NULL
);

CREATE TABLE IF NOT EXISTS food_nutrient (
    food_id     INTEGER NOT NULL REFERENCES food (food_id) ON DELETE CASCADE,
    nutrient_id INTEGER NOT NULL REFERENCES nutrient (nutrient_id) ON DELETE CASCADE,
    value       DOUBLE PRECISION,
    PRIMARY KEY (food_id, nutrient_id)
);
";
