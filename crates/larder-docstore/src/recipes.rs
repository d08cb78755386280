//! Recipe collection: title-guarded insert, the enrichment feed, and the
//! read paths the API layer projects.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Collection;

use larder_common::normalise::normalise;

use crate::database::DocStore;
use crate::error::{DocStoreError, Result};
use crate::schema::{RecipeDoc, COLLECTION_RECIPES};

/// Store for recipe documents.
#[derive(Clone)]
pub struct RecipeStore {
    collection: Collection<RecipeDoc>,
}

impl RecipeStore {
    pub fn new(store: &DocStore) -> Self {
        Self {
            collection: store.database().collection(COLLECTION_RECIPES),
        }
    }

    /// Insert the recipe unless a document with the exact same title
    /// already exists. A weak dedup guard, not a uniqueness constraint:
    /// the pre-check and the insert are not atomic, and that is accepted.
    /// Returns whether a document was inserted.
    pub async fn upsert(&self, recipe: &RecipeDoc) -> Result<bool> {
        let existing = self
            .collection
            .find_one(doc! { "title": &recipe.title })
            .await?;

        if existing.is_some() {
            tracing::debug!(title = %recipe.title, "recipe already stored, skipping");
            return Ok(false);
        }

        self.collection.insert_one(recipe).await?;
        tracing::debug!(title = %recipe.title, category = %recipe.category, "inserted recipe");
        Ok(true)
    }

    /// Every distinct ingredient name across all stored recipes. This is
    /// the input relation of the enrichment pipeline.
    pub async fn distinct_ingredient_names(&self) -> Result<Vec<String>> {
        let values = self
            .collection
            .distinct("ingredients.name", doc! {})
            .await?;

        Ok(values
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Read path: recipes whose category contains `category`, matched
    /// case- and diacritic-insensitively. Both sides are normalised in
    /// process; a `$regex` on the accented stored value cannot give
    /// diacritic-insensitivity, and the collection is small.
    pub async fn find_by_category(&self, category: &str) -> Result<Vec<RecipeDoc>> {
        let wanted = normalise(category);
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut matches = Vec::new();
        while let Some(recipe) = cursor.try_next().await? {
            if normalise(&recipe.category).contains(&wanted) {
                matches.push(recipe);
            }
        }
        Ok(matches)
    }

    /// Read path: one recipe by its hex document id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<RecipeDoc>> {
        let oid = ObjectId::parse_str(id).map_err(|_| DocStoreError::InvalidId(id.to_string()))?;
        Ok(self.collection.find_one(doc! { "_id": oid }).await?)
    }
}
