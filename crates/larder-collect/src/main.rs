//! Larder — recipe & nutrition collection pipelines.
//! Entry point for the collect binary.

mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use larder_common::sandbox::SandboxClient;
use larder_db::Database;
use larder_docstore::{DocStore, RecipeStore, SandwichStore};
use larder_ingestion::pipeline::{self, CategorySpec};
use larder_ingestion::sandwich_csv;
use larder_ingestion::sources::fatsecret::{FatSecretClient, RetryPolicy};
use larder_ingestion::sources::marmiton::MarmitonClient;
use larder_ingestion::sources::wikidata::{self, WikidataClient};
use larder_ingestion::translate::TranslationClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(
                    "info,larder_collect=debug,larder_ingestion=debug,larder_db=debug,larder_docstore=debug",
                )
            }),
        )
        .init();

    info!("🥕 Larder starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Could not load larder.toml: {e}");
            tracing::warn!("Copy larder.example.toml to larder.toml and edit it.");
            return Ok(());
        }
    };

    // Acquire both stores up front: an unreachable store is fatal before
    // any item is processed.
    info!("Connecting to document store...");
    let docs = DocStore::connect(&config.docstore.uri, &config.docstore.database).await?;
    docs.ping().await?;
    info!("✅ document store connected.");

    info!("Connecting to relational store...");
    let db = Arc::new(Database::connect(&config.relational.url).await?);
    db.initialize().await?;
    info!("✅ relational store ready.");

    let http = SandboxClient::new()?;
    let recipes = RecipeStore::new(&docs);
    let sandwiches = SandwichStore::new(&docs);

    if config.scrape.enabled {
        let site = MarmitonClient::new(http.clone());
        let categories: Vec<CategorySpec> = config
            .scrape
            .categories
            .iter()
            .map(|c| CategorySpec {
                name: c.name.clone(),
                base_url: c.base_url.clone(),
            })
            .collect();

        let summary =
            pipeline::run_recipe_scrape(&site, &recipes, &categories, config.scrape.max_pages).await;
        info!(
            inserted = summary.recipes_inserted,
            duplicate = summary.recipes_duplicate,
            errors = summary.errors.len(),
            "✅ scrape stage finished."
        );
    }

    if config.sandwiches.enabled {
        run_sandwich_stage(&http, &sandwiches, &config.sandwiches).await;
    }

    if config.enrichment.enabled {
        let translator = TranslationClient::new(http.clone());
        let nutrition = FatSecretClient::new(http.clone(), config.enrichment.token()).with_retry(
            RetryPolicy {
                max_retries: config.enrichment.max_retries,
                base_delay: Duration::from_secs(config.enrichment.backoff_secs),
            },
        );

        let summary = pipeline::run_enrichment(
            &recipes,
            &db,
            &translator,
            &nutrition,
            &config.enrichment.source_lang,
            &config.enrichment.target_lang,
            Duration::from_secs(config.enrichment.pace_secs),
        )
        .await?;
        info!(
            enriched = summary.foods_enriched,
            not_found = summary.not_found,
            errors = summary.errors.len(),
            "✅ enrichment stage finished."
        );

        let stats = db.stats().await?;
        info!(
            foods = stats.foods,
            nutrients = stats.nutrients,
            measurements = stats.measurements,
            "relational store totals"
        );
    }

    // Store handles drop here; both connections close with the run.
    info!("🥕 Larder run complete.");
    Ok(())
}

/// Sandwich import, with the optional knowledge-graph refresh in front.
/// Nothing in this stage is fatal: a failed refresh falls back to the
/// existing CSV, a missing CSV skips the stage.
async fn run_sandwich_stage(
    http: &SandboxClient,
    sandwiches: &SandwichStore,
    cfg: &config::SandwichConfig,
) {
    let csv_path = Path::new(&cfg.csv_path);

    if cfg.refresh_from_wikidata {
        let wd = WikidataClient::new(http.clone());
        match wd.sandwich_ingredients().await {
            Ok(pairs) => match wikidata::write_pairs_csv(csv_path, &pairs) {
                Ok(()) => info!(
                    n = pairs.len(),
                    path = %csv_path.display(),
                    "sandwich CSV refreshed from Wikidata"
                ),
                Err(e) => tracing::warn!(error = %e, "could not write refreshed sandwich CSV"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Wikidata refresh failed, using existing CSV");
            }
        }
    }

    let pairs = match sandwich_csv::read_pairs(csv_path) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::warn!(path = %csv_path.display(), error = %e, "sandwich CSV unreadable, skipping stage");
            return;
        }
    };

    let summary = pipeline::run_sandwich_import(sandwiches, &pairs).await;
    info!(
        inserted = summary.sandwiches_inserted,
        merged = summary.sandwiches_merged,
        errors = summary.errors.len(),
        "✅ sandwich stage finished."
    );
}
