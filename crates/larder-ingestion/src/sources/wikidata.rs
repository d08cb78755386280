//! Wikidata SPARQL source for sandwich/ingredient pairs.
//!
//! Queries the public endpoint for sandwiches and their part-of
//! ingredients, and can export the result as the two-column CSV the
//! sandwich import consumes.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use larder_common::sandbox::SandboxClient;
use larder_common::{LarderError, Result};

const SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Sandwiches (instances/subclasses of Q28803) with their P527 parts,
/// minus plain foodstuffs, labelled in English with a French fallback.
const SANDWICH_INGREDIENTS_QUERY: &str = r#"SELECT ?sandwich ?ingredient ?sandwichLabel ?ingredientLabel
WHERE
{
  ?sandwich wdt:P31?/wdt:P279* wd:Q28803;
            wdt:P527 ?ingredient.
  MINUS { ?ingredient wdt:P279* wd:Q7802. }
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en", "fr". }
}
ORDER BY UCASE(STR(?sandwichLabel))"#;

pub struct WikidataClient {
    client: SandboxClient,
}

impl WikidataClient {
    pub fn new(client: SandboxClient) -> Self {
        Self { client }
    }

    /// Run the sandwich/ingredient query and return the label pairs.
    #[instrument(skip(self))]
    pub async fn sandwich_ingredients(&self) -> Result<Vec<(String, String)>> {
        let resp = self
            .client
            .get(SPARQL_ENDPOINT)?
            .query(&[("query", SANDWICH_INGREDIENTS_QUERY), ("format", "json")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LarderError::Http {
                status: resp.status().as_u16(),
                url: SPARQL_ENDPOINT.to_string(),
            });
        }

        let value: Value = resp.json().await?;
        let pairs = parse_bindings(&value);
        debug!(n = pairs.len(), "sandwich/ingredient pairs retrieved");
        Ok(pairs)
    }
}

fn parse_bindings(value: &Value) -> Vec<(String, String)> {
    value
        .pointer("/results/bindings")
        .and_then(Value::as_array)
        .map(|bindings| {
            bindings
                .iter()
                .filter_map(|b| {
                    let sandwich = b.pointer("/sandwichLabel/value")?.as_str()?;
                    let ingredient = b.pointer("/ingredientLabel/value")?.as_str()?;
                    Some((sandwich.to_string(), ingredient.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Export pairs as the two-column CSV the sandwich import reads.
pub fn write_pairs_csv(path: &Path, pairs: &[(String, String)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Sandwich Label", "Ingredient Label"])?;
    for (sandwich, ingredient) in pairs {
        writer.write_record([sandwich, ingredient])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bindings() {
        let value = json!({
            "results": { "bindings": [
                {
                    "sandwichLabel": { "type": "literal", "value": "Croque-monsieur" },
                    "ingredientLabel": { "type": "literal", "value": "ham" }
                },
                {
                    "sandwichLabel": { "type": "literal", "value": "Croque-monsieur" }
                    // ingredient label missing: row dropped
                },
                {
                    "sandwichLabel": { "type": "literal", "value": "BLT" },
                    "ingredientLabel": { "type": "literal", "value": "bacon" }
                }
            ] }
        });

        let pairs = parse_bindings(&value);
        assert_eq!(
            pairs,
            vec![
                ("Croque-monsieur".to_string(), "ham".to_string()),
                ("BLT".to_string(), "bacon".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_bindings_empty_or_malformed() {
        assert!(parse_bindings(&json!({})).is_empty());
        assert!(parse_bindings(&json!({ "results": { "bindings": [] } })).is_empty());
    }
}
