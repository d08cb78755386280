//! Sandwich collection: per-label documents whose ingredient sets only
//! ever grow.

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use crate::database::DocStore;
use crate::error::Result;
use crate::schema::{SandwichDoc, SandwichIngredient, COLLECTION_SANDWICHES};

/// Store for sandwich documents.
#[derive(Clone)]
pub struct SandwichStore {
    collection: Collection<SandwichDoc>,
}

impl SandwichStore {
    pub fn new(store: &DocStore) -> Self {
        Self {
            collection: store.database().collection(COLLECTION_SANDWICHES),
        }
    }

    /// Insert a sandwich, or merge `ingredient_names` into the existing
    /// document's set. The merge is a set union of `{name}` documents —
    /// addition-only, no duplicates, order not guaranteed. Returns whether
    /// a new document was inserted.
    pub async fn upsert(&self, label: &str, ingredient_names: &[String]) -> Result<bool> {
        let existing = self.collection.find_one(doc! { "sandwich": label }).await?;

        if existing.is_some() {
            let names: Vec<Document> = ingredient_names
                .iter()
                .map(|n| doc! { "name": n })
                .collect();
            self.collection
                .update_one(
                    doc! { "sandwich": label },
                    doc! { "$addToSet": { "ingredients": { "$each": names } } },
                )
                .await?;
            tracing::debug!(sandwich = label, "merged ingredients into existing sandwich");
            return Ok(false);
        }

        let sandwich = SandwichDoc {
            id: None,
            sandwich: label.to_string(),
            ingredients: ingredient_names
                .iter()
                .map(|n| SandwichIngredient { name: n.clone() })
                .collect(),
        };
        self.collection.insert_one(&sandwich).await?;
        tracing::debug!(sandwich = label, n = ingredient_names.len(), "inserted sandwich");
        Ok(true)
    }

    /// Read path: every sandwich recipe.
    pub async fn all(&self) -> Result<Vec<SandwichDoc>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
