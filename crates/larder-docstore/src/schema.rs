//! Document shapes for the two collections.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const COLLECTION_RECIPES: &str = "recettes";
pub const COLLECTION_SANDWICHES: &str = "recettes_sandwiches";

/// One scraped recipe. Fields that could not be extracted hold their
/// sentinel string by the time a document reaches this type; the store
/// never sees partially-typed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub category: String,
    pub prep_time: String,
    pub rest_time: String,
    pub cook_time: String,
    pub image_url: String,
    pub ingredients: Vec<IngredientDoc>,
    pub steps: Vec<String>,
}

/// Embedded ingredient. `name` and `unit` are stored normalised so the
/// enrichment pipeline and the read paths match on the same key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientDoc {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub complement: String,
}

/// One sandwich recipe, folded from (sandwich, ingredient) pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandwichDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub sandwich: String,
    pub ingredients: Vec<SandwichIngredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandwichIngredient {
    pub name: String,
}
