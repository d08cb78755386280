//! Relational store for foods, nutrients and food–nutrient measurements.
//!
//! PostgreSQL-backed. The schema is created idempotently on startup by
//! [`Database::initialize`]; all writes are single-statement autocommits so
//! an interrupted run leaves committed rows intact and a re-run completes
//! the rest.

pub mod database;
pub mod error;
pub mod foods;
pub mod nutrients;
pub mod schema;

pub use database::{Database, DatabaseStats};
pub use error::{DbError, Result};
pub use foods::FoodRepository;
pub use nutrients::NutrientRepository;
