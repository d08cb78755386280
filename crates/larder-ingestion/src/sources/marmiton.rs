//! Recipe site client: category listing walker and detail-page extractor.
//!
//! Listing pages expose recipe cards; each card links to a detail page
//! from which one structured recipe is extracted. Extraction is a pure
//! function over the parsed document and degrades per field — a missing
//! DOM node yields `None`, never an error. Fetch failures for one card
//! are logged and skipped; they do not abort the category.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

use larder_common::normalise::normalise;
use larder_common::sandbox::SandboxClient;

use super::fetch_document;
use crate::models::{ScrapedIngredient, ScrapedRecipe};

pub struct MarmitonClient {
    client: SandboxClient,
}

impl MarmitonClient {
    pub fn new(client: SandboxClient) -> Self {
        Self { client }
    }

    /// Walk the category's listing pages (`{base_url}{page}` for pages
    /// 1..=max_pages) and scrape every discovered recipe. No dedup here —
    /// that is the document store's job.
    #[instrument(skip(self, base_url))]
    pub async fn scrape_category(
        &self,
        category: &str,
        base_url: &str,
        max_pages: u32,
    ) -> Vec<ScrapedRecipe> {
        let mut recipes = Vec::new();

        for page in 1..=max_pages {
            let url = format!("{}{}", base_url, page);
            let links = match fetch_document(&self.client, &url).await {
                Ok(html) => extract_card_links(&html),
                Err(e) => {
                    warn!(category, page, error = %e, "listing page fetch failed, skipping page");
                    continue;
                }
            };
            debug!(category, page, n_cards = links.len(), "recipe cards discovered");

            for link in links {
                match fetch_document(&self.client, &link).await {
                    Ok(html) => recipes.push(extract_recipe(&html, category)),
                    Err(e) => {
                        warn!(category, url = %link, error = %e, "recipe fetch failed, skipping card");
                    }
                }
            }
        }

        recipes
    }
}

/// Hrefs of every recipe card on a listing page.
fn extract_card_links(html: &Html) -> Vec<String> {
    let card = Selector::parse("div.recipe-card a.recipe-card-link[href]").unwrap();
    html.select(&card)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extract one structured recipe from a detail page. Pure — no I/O, no
/// failure: each field resolves independently or stays `None`.
pub fn extract_recipe(html: &Html, category: &str) -> ScrapedRecipe {
    let times = TimeDetails::parse(html);

    ScrapedRecipe {
        title: select_text(html, "div.main-title h1"),
        category: category.to_string(),
        prep_time: select_text(html, "div.recipe-primary__item span"),
        rest_time: times.as_ref().and_then(TimeDetails::rest_time),
        cook_time: times.as_ref().and_then(TimeDetails::cook_time),
        image_url: extract_image(html),
        ingredients: extract_ingredients(html),
        steps: extract_steps(html),
    }
}

/// The "time details" block of a detail page. Field resolution is
/// label-driven (the cell after the one reading "repos" / "cuisson"),
/// falling back to the historical positional layout (value cells at
/// indices 3 and 5) on pages without labels. Layout changes are a
/// one-place fix here.
struct TimeDetails {
    cells: Vec<String>,
}

impl TimeDetails {
    fn parse(html: &Html) -> Option<Self> {
        let block = Selector::parse("div.time__details").unwrap();
        let cell = Selector::parse("div").unwrap();
        let container = html.select(&block).next()?;
        Some(Self {
            cells: container.select(&cell).map(element_text).collect(),
        })
    }

    /// Text of the cell following the one labelled `label`.
    fn labelled(&self, label: &str) -> Option<String> {
        let at = self.cells.iter().position(|c| normalise(c).contains(label))?;
        self.cells.get(at + 1).filter(|v| !v.is_empty()).cloned()
    }

    fn positional(&self, index: usize) -> Option<String> {
        self.cells.get(index).filter(|v| !v.is_empty()).cloned()
    }

    fn rest_time(&self) -> Option<String> {
        self.labelled("repos").or_else(|| self.positional(3))
    }

    fn cook_time(&self) -> Option<String> {
        self.labelled("cuisson").or_else(|| self.positional(5))
    }
}

fn extract_ingredients(html: &Html) -> Vec<ScrapedIngredient> {
    let section = Selector::parse("span.card-ingredient-title").unwrap();
    let name = Selector::parse("span.ingredient-name").unwrap();
    let count = Selector::parse("span.count").unwrap();
    let unit = Selector::parse("span.unit").unwrap();
    let complement = Selector::parse("span.ingredient-complement").unwrap();

    html.select(&section)
        .map(|sec| ScrapedIngredient {
            name: child_text(sec, &name).map(|t| normalise(&t)),
            quantity: child_text(sec, &count),
            unit: child_text(sec, &unit).map(|t| normalise(&t)),
            complement: child_text(sec, &complement),
        })
        .collect()
}

/// Step paragraphs, concatenated in document order across containers.
fn extract_steps(html: &Html) -> Vec<String> {
    let step = Selector::parse("div.recipe-step-list__container p").unwrap();
    html.select(&step)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// First of the media container's `data-src` / `src` attributes.
fn extract_image(html: &Html) -> Option<String> {
    let media = Selector::parse(
        "div.recipe-media-viewer-media-container.recipe-media-viewer-media-container-picture-only",
    )
    .unwrap();
    let el = html.select(&media).next()?;
    el.value()
        .attr("data-src")
        .or_else(|| el.value().attr("src"))
        .map(str::to_string)
}

fn select_text(html: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    html.select(&sel)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn child_text(parent: ElementRef, sel: &Selector) -> Option<String> {
    parent
        .select(sel)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
