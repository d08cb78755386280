//! Live source tests. These hit the real external services and are
//! ignored by default. Run with:
//! ```bash
//! cargo test --package larder-ingestion --test test_live_sources -- --ignored --nocapture
//! ```

use larder_common::sandbox::SandboxClient;
use larder_ingestion::sources::marmiton::MarmitonClient;
use larder_ingestion::sources::wikidata::WikidataClient;
use larder_ingestion::translate::TranslationClient;

#[tokio::test]
#[ignore = "hits the live recipe site"]
async fn test_scrape_vegan_category_first_page() {
    let site = MarmitonClient::new(SandboxClient::new().unwrap());
    let recipes = site
        .scrape_category(
            "Vegan",
            "https://www.marmiton.org/recettes/selection_recette_vegan.aspx?p=",
            1,
        )
        .await;

    assert!(!recipes.is_empty(), "first listing page should yield recipes");
    assert!(recipes.iter().any(|r| r.title.is_some()));
    assert!(recipes.iter().any(|r| !r.ingredients.is_empty()));
}

#[tokio::test]
#[ignore = "hits the live translation endpoint"]
async fn test_translate_french_ingredient() {
    let translator = TranslationClient::new(SandboxClient::new().unwrap());
    let english = translator.translate("pomme", "fr", "en").await.unwrap();
    assert_eq!(english.to_lowercase(), "apple");
}

#[tokio::test]
#[ignore = "hits the live SPARQL endpoint"]
async fn test_wikidata_sandwich_pairs() {
    let wikidata = WikidataClient::new(SandboxClient::new().unwrap());
    let pairs = wikidata.sandwich_ingredients().await.unwrap();
    assert!(!pairs.is_empty(), "the public graph knows at least one sandwich");
}
