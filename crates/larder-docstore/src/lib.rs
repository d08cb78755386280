//! Document store for scraped recipes and sandwich recipes.
//!
//! MongoDB-backed. Two collections: `recettes` (one document per scraped
//! recipe, weakly deduplicated on title) and `recettes_sandwiches` (one
//! document per sandwich label, ingredient set merged by addition-only
//! union on re-run).

pub mod database;
pub mod error;
pub mod recipes;
pub mod sandwiches;
pub mod schema;

pub use database::DocStore;
pub use error::{DocStoreError, Result};
pub use recipes::RecipeStore;
pub use sandwiches::SandwichStore;
