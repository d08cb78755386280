//! Ingestion pipelines.
//!
//! Three run-to-completion stages, sequenced by the collect binary:
//!
//! 1. `run_recipe_scrape` — category listings → recipe documents.
//! 2. `run_sandwich_import` — (sandwich, ingredient) pairs → sandwich
//!    documents.
//! 3. `run_enrichment` — stored ingredient names → translation →
//!    nutrition API → relational rows.
//!
//! Stages are non-destructive and best-effort: a failed item is logged,
//! counted and skipped, never fatal. Every store write is an idempotent
//! upsert, so interrupting and re-running a stage completes the rest.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use larder_db::{Database, FoodRepository, NutrientRepository};
use larder_docstore::{RecipeStore, SandwichStore};

use crate::sandwich_csv;
use crate::sources::fatsecret::FatSecretClient;
use crate::sources::marmiton::MarmitonClient;
use crate::translate::TranslationClient;

/// One category to walk: display name plus the listing URL prefix the
/// page number is appended to.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub name: String,
    pub base_url: String,
}

// ── Recipe scrape ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeSummary {
    pub categories: usize,
    pub recipes_found: usize,
    pub recipes_inserted: usize,
    pub recipes_duplicate: usize,
    pub errors: Vec<String>,
}

/// Walk every category and persist what comes back. Fetch/extract
/// failures are already isolated per card inside the walker; store
/// failures are isolated per recipe here.
#[instrument(skip_all)]
pub async fn run_recipe_scrape(
    site: &MarmitonClient,
    recipes: &RecipeStore,
    categories: &[CategorySpec],
    max_pages: u32,
) -> ScrapeSummary {
    let mut summary = ScrapeSummary {
        categories: categories.len(),
        ..Default::default()
    };

    for category in categories {
        info!(category = %category.name, max_pages, "scraping category");
        let scraped = site
            .scrape_category(&category.name, &category.base_url, max_pages)
            .await;
        summary.recipes_found += scraped.len();

        for recipe in scraped {
            let doc = recipe.into_doc();
            match recipes.upsert(&doc).await {
                Ok(true) => summary.recipes_inserted += 1,
                Ok(false) => summary.recipes_duplicate += 1,
                Err(e) => {
                    let msg = format!("recipe upsert failed for '{}': {e}", doc.title);
                    warn!("{}", &msg);
                    summary.errors.push(msg);
                }
            }
        }
    }

    info!(
        found = summary.recipes_found,
        inserted = summary.recipes_inserted,
        duplicate = summary.recipes_duplicate,
        errors = summary.errors.len(),
        "recipe scrape complete"
    );
    summary
}

// ── Sandwich import ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct SandwichImportSummary {
    pub pairs: usize,
    pub sandwiches_inserted: usize,
    pub sandwiches_merged: usize,
    pub errors: Vec<String>,
}

/// Fold the flat pair relation and upsert one document per sandwich.
#[instrument(skip_all)]
pub async fn run_sandwich_import(
    sandwiches: &SandwichStore,
    pairs: &[(String, String)],
) -> SandwichImportSummary {
    let mut summary = SandwichImportSummary {
        pairs: pairs.len(),
        ..Default::default()
    };

    for (label, ingredients) in sandwich_csv::fold_pairs(pairs) {
        match sandwiches.upsert(&label, &ingredients).await {
            Ok(true) => summary.sandwiches_inserted += 1,
            Ok(false) => summary.sandwiches_merged += 1,
            Err(e) => {
                let msg = format!("sandwich upsert failed for '{label}': {e}");
                warn!("{}", &msg);
                summary.errors.push(msg);
            }
        }
    }

    info!(
        pairs = summary.pairs,
        inserted = summary.sandwiches_inserted,
        merged = summary.sandwiches_merged,
        errors = summary.errors.len(),
        "sandwich import complete"
    );
    summary
}

// ── Ingredient enrichment ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentSummary {
    pub ingredients: usize,
    pub foods_enriched: usize,
    pub already_enriched: usize,
    pub translation_failures: usize,
    pub not_found: usize,
    pub errors: Vec<String>,
}

/// Enrich every distinct stored ingredient name with nutrition data:
/// translate → upsert food → skip if already enriched → lookup → persist
/// nutrient rows. A fixed pacing delay sits between iterations to respect
/// the nutrition API's rate limits.
#[instrument(skip_all)]
pub async fn run_enrichment(
    recipes: &RecipeStore,
    db: &Arc<Database>,
    translator: &TranslationClient,
    nutrition: &FatSecretClient,
    source_lang: &str,
    target_lang: &str,
    pace: Duration,
) -> anyhow::Result<EnrichmentSummary> {
    let foods = FoodRepository::new(db.clone());
    let nutrients = NutrientRepository::new(db.clone());

    let names = recipes.distinct_ingredient_names().await?;
    let mut summary = EnrichmentSummary {
        ingredients: names.len(),
        ..Default::default()
    };
    info!(n = names.len(), "enriching stored ingredient names");

    for name in &names {
        let english = match translator.translate(name, source_lang, target_lang).await {
            Ok(t) => t.trim().to_string(),
            Err(e) => {
                warn!(ingredient = %name, error = %e, "translation failed, skipping ingredient");
                summary.translation_failures += 1;
                continue;
            }
        };

        if let Err(e) = enrich_one(&foods, &nutrients, nutrition, &english, &mut summary).await {
            let msg = format!("enrichment failed for '{name}' ({english}): {e}");
            warn!("{}", &msg);
            summary.errors.push(msg);
        }

        tokio::time::sleep(pace).await;
    }

    info!(
        enriched = summary.foods_enriched,
        already_enriched = summary.already_enriched,
        not_found = summary.not_found,
        translation_failures = summary.translation_failures,
        errors = summary.errors.len(),
        "enrichment complete"
    );
    Ok(summary)
}

async fn enrich_one(
    foods: &FoodRepository,
    nutrients: &NutrientRepository,
    nutrition: &FatSecretClient,
    english: &str,
    summary: &mut EnrichmentSummary,
) -> anyhow::Result<()> {
    let food_id = foods.upsert(english).await?;

    if foods.is_enriched(food_id).await? {
        debug!(food = english, "already enriched, skipping");
        summary.already_enriched += 1;
        return Ok(());
    }

    let Some(info) = nutrition.lookup(english).await? else {
        debug!(food = english, "no nutrition data found");
        summary.not_found += 1;
        return Ok(());
    };

    for measurement in &info.nutrients {
        let nutrient_id = nutrients
            .upsert(&capitalise(&measurement.name), &measurement.unit)
            .await?;
        nutrients.link(food_id, nutrient_id, measurement.value).await?;
    }

    summary.foods_enriched += 1;
    Ok(())
}

/// "calories" → "Calories", matching the stored nutrient naming.
fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalise() {
        assert_eq!(capitalise("calories"), "Calories");
        assert_eq!(capitalise("vitamin_a"), "Vitamin_a");
        assert_eq!(capitalise(""), "");
    }
}
