//! Configuration loading for larder.
//! Reads larder.toml from the current directory or the path in the
//! LARDER_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub docstore: DocStoreConfig,
    pub relational: RelationalConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub sandwiches: SandwichConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocStoreConfig {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_mongo_database")]
    pub database: String,
}

fn default_mongo_uri()      -> String { "mongodb://localhost:27017".to_string() }
fn default_mongo_database() -> String { "recettes_db".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationalConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Upper bound on listing pages walked per category.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pages: default_max_pages(),
            categories: default_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Listing URL prefix; the page number is appended.
    pub base_url: String,
}

fn default_max_pages() -> u32 { 3 }

fn default_categories() -> Vec<CategoryConfig> {
    let listings = [
        ("Vegan", "https://www.marmiton.org/recettes/selection_recette_vegan.aspx?p="),
        ("Sans Gluten", "https://www.marmiton.org/recettes/selection_sans_gluten.aspx?p="),
        ("Végétarien", "https://www.marmiton.org/recettes/selection_vegetarien.aspx?p="),
        ("Healthy", "https://www.marmiton.org/recettes/selection_mincealors.aspx?p="),
    ];
    listings
        .iter()
        .map(|(name, base_url)| CategoryConfig {
            name: name.to_string(),
            base_url: base_url.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandwichConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// Re-run the knowledge-graph query and rewrite the CSV before import.
    #[serde(default)]
    pub refresh_from_wikidata: bool,
}

impl Default for SandwichConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            csv_path: default_csv_path(),
            refresh_from_wikidata: false,
        }
    }
}

fn default_csv_path() -> String { "sandwich_ingredients.csv".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Nutrition API bearer token. Left empty, LARDER_FATSECRET_TOKEN is
    /// used instead.
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Delay between external lookups.
    #[serde(default = "default_pace_secs")]
    pub pace_secs: u64,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_token: String::new(),
            max_retries: default_max_retries(),
            backoff_secs: default_backoff_secs(),
            pace_secs: default_pace_secs(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}

impl EnrichmentConfig {
    /// Token from config, or the env fallback.
    pub fn token(&self) -> String {
        if self.api_token.is_empty() {
            std::env::var("LARDER_FATSECRET_TOKEN").unwrap_or_default()
        } else {
            self.api_token.clone()
        }
    }
}

fn default_max_retries()  -> u32    { 3 }
fn default_backoff_secs() -> u64    { 5 }
fn default_pace_secs()    -> u64    { 5 }
fn default_source_lang()  -> String { "fr".to_string() }
fn default_target_lang()  -> String { "en".to_string() }

fn bool_true() -> bool { true }

mod tests;

impl Config {
    /// Load configuration from larder.toml.
    /// Checks LARDER_CONFIG env var first, then the current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("LARDER_CONFIG").unwrap_or_else(|_| "larder.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy larder.example.toml to larder.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
