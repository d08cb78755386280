//! Sandwich flat-file import.
//!
//! The input is a two-column table `(Sandwich Label, Ingredient Label)`,
//! one row per pair. Rows fold into one duplicate-free ingredient list per
//! sandwich label before hitting the store.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use larder_common::Result;

/// Read `(sandwich, ingredient)` pairs from the CSV at `path`. The first
/// record is the header row; rows with an empty cell are dropped.
pub fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    read_pairs_from(std::fs::File::open(path)?)
}

fn read_pairs_from(input: impl io::Read) -> Result<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut pairs = Vec::new();

    for record in reader.records() {
        let record = record?;
        let (Some(sandwich), Some(ingredient)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if sandwich.is_empty() || ingredient.is_empty() {
            continue;
        }
        pairs.push((sandwich.to_string(), ingredient.to_string()));
    }

    Ok(pairs)
}

/// Fold pairs into one duplicate-free ingredient list per sandwich label.
/// Ingredient order is first-seen; label order is stable across runs.
pub fn fold_pairs(pairs: &[(String, String)]) -> BTreeMap<String, Vec<String>> {
    let mut folded: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (sandwich, ingredient) in pairs {
        let ingredients = folded.entry(sandwich.clone()).or_default();
        if !ingredients.contains(ingredient) {
            ingredients.push(ingredient.clone());
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(s: &str, i: &str) -> (String, String) {
        (s.to_string(), i.to_string())
    }

    #[test]
    fn test_read_pairs_skips_header_and_blanks() {
        let csv = "Sandwich Label,Ingredient Label\n\
                   BLT,bacon\n\
                   BLT,\n\
                   Croque-monsieur,ham\n";
        let pairs = read_pairs_from(csv.as_bytes()).unwrap();
        assert_eq!(pairs, vec![pair("BLT", "bacon"), pair("Croque-monsieur", "ham")]);
    }

    #[test]
    fn test_fold_groups_by_label() {
        let pairs = vec![
            pair("BLT", "bacon"),
            pair("Croque-monsieur", "ham"),
            pair("BLT", "lettuce"),
            pair("BLT", "tomato"),
        ];
        let folded = fold_pairs(&pairs);
        assert_eq!(folded.len(), 2);
        assert_eq!(folded["BLT"], vec!["bacon", "lettuce", "tomato"]);
        assert_eq!(folded["Croque-monsieur"], vec!["ham"]);
    }

    #[test]
    fn test_roundtrip_through_exported_csv() {
        let pairs = vec![pair("BLT", "bacon"), pair("Croque-monsieur", "ham")];
        let path = std::env::temp_dir().join(format!("larder_sandwich_{}.csv", std::process::id()));

        crate::sources::wikidata::write_pairs_csv(&path, &pairs).unwrap();
        let read = read_pairs(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(read.unwrap(), pairs);
    }

    #[test]
    fn test_fold_deduplicates_within_label() {
        let pairs = vec![
            pair("BLT", "bacon"),
            pair("BLT", "bacon"),
            pair("BLT", "lettuce"),
            pair("BLT", "bacon"),
        ];
        let folded = fold_pairs(&pairs);
        assert_eq!(folded["BLT"], vec!["bacon", "lettuce"]);
    }
}
