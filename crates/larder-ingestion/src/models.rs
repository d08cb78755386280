//! Data models for the ingestion pipeline.

use serde::{Deserialize, Serialize};

use larder_docstore::schema::{IngredientDoc, RecipeDoc};

/// Rendered in place of any field the page extractor could not find.
/// These are the strings the stored documents (and the API that projects
/// them) expose; extraction itself stays `Option`-typed.
pub mod sentinel {
    pub const TITLE: &str = "Titre non trouvé";
    pub const PREP_TIME: &str = "Temps de préparation non trouvé";
    pub const REST_TIME: &str = "Temps de repos non trouvé";
    pub const COOK_TIME: &str = "Temps de cuisson non trouvé";
    pub const IMAGE: &str = "Image non trouvée";
    pub const INGREDIENT_NAME: &str = "Nom non trouvé";
    pub const INGREDIENT_QUANTITY: &str = "Quantité non trouvée";
    pub const INGREDIENT_UNIT: &str = "Unité non trouvée";
    pub const INGREDIENT_COMPLEMENT: &str = "Complément non trouvé";
}

/// A recipe as extracted from a detail page. Each field is independently
/// optional: extraction never fails, it degrades per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedRecipe {
    pub title: Option<String>,
    pub category: String,
    pub prep_time: Option<String>,
    pub rest_time: Option<String>,
    pub cook_time: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<ScrapedIngredient>,
    pub steps: Vec<String>,
}

/// One extracted ingredient line. `name` and `unit` are already
/// normalised (lower-case, diacritics stripped) by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrapedIngredient {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub complement: Option<String>,
}

impl ScrapedRecipe {
    /// Render the extraction result as a storable document. This is the
    /// single place where absent fields become their sentinel strings.
    pub fn into_doc(self) -> RecipeDoc {
        RecipeDoc {
            id: None,
            title: self.title.unwrap_or_else(|| sentinel::TITLE.to_string()),
            category: self.category,
            prep_time: self.prep_time.unwrap_or_else(|| sentinel::PREP_TIME.to_string()),
            rest_time: self.rest_time.unwrap_or_else(|| sentinel::REST_TIME.to_string()),
            cook_time: self.cook_time.unwrap_or_else(|| sentinel::COOK_TIME.to_string()),
            image_url: self.image_url.unwrap_or_else(|| sentinel::IMAGE.to_string()),
            ingredients: self.ingredients.into_iter().map(ScrapedIngredient::into_doc).collect(),
            steps: self.steps,
        }
    }
}

impl ScrapedIngredient {
    fn into_doc(self) -> IngredientDoc {
        IngredientDoc {
            name: self.name.unwrap_or_else(|| sentinel::INGREDIENT_NAME.to_string()),
            quantity: self
                .quantity
                .unwrap_or_else(|| sentinel::INGREDIENT_QUANTITY.to_string()),
            unit: self.unit.unwrap_or_else(|| sentinel::INGREDIENT_UNIT.to_string()),
            complement: self
                .complement
                .unwrap_or_else(|| sentinel::INGREDIENT_COMPLEMENT.to_string()),
        }
    }
}

/// Canonical nutrient set for one food, as extracted from the nutrition
/// API's first serving.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionInfo {
    pub portion_description: Option<String>,
    pub portion_amount: Option<String>,
    pub portion_unit: Option<String>,
    pub nutrients: Vec<NutrientMeasurement>,
}

/// One nutrient value, unit-normalised (mg/mcg collapsed to grams).
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientMeasurement {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_render_sentinels() {
        let scraped = ScrapedRecipe {
            title: Some("Tarte aux pommes".to_string()),
            category: "Dessert".to_string(),
            ..Default::default()
        };
        let doc = scraped.into_doc();
        assert_eq!(doc.title, "Tarte aux pommes");
        assert_eq!(doc.rest_time, sentinel::REST_TIME);
        assert_eq!(doc.cook_time, sentinel::COOK_TIME);
        assert_eq!(doc.image_url, sentinel::IMAGE);
        assert!(doc.steps.is_empty());
    }

    #[test]
    fn test_ingredient_fields_default_independently() {
        let scraped = ScrapedIngredient {
            name: Some("farine".to_string()),
            quantity: Some("200".to_string()),
            unit: None,
            complement: None,
        };
        let doc = scraped.into_doc();
        assert_eq!(doc.name, "farine");
        assert_eq!(doc.quantity, "200");
        assert_eq!(doc.unit, sentinel::INGREDIENT_UNIT);
        assert_eq!(doc.complement, sentinel::INGREDIENT_COMPLEMENT);
    }
}
