//! Document store integration tests.
//!
//! Require a running MongoDB. Run with:
//! ```bash
//! cargo test --package larder-docstore --test test_docstore -- --ignored --nocapture
//! ```
//! Each test works in its own database so they can run in parallel.

use larder_docstore::schema::{IngredientDoc, RecipeDoc};
use larder_docstore::{DocStore, RecipeStore, SandwichStore};

async fn connect(database: &str) -> DocStore {
    let uri = std::env::var("LARDER_MONGO_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let store = DocStore::connect(&uri, database).await.expect("connect");
    store.ping().await.expect("ping");
    store
}

fn sample_recipe(title: &str, category: &str) -> RecipeDoc {
    RecipeDoc {
        id: None,
        title: title.to_string(),
        category: category.to_string(),
        prep_time: "20 min".to_string(),
        rest_time: "1 h".to_string(),
        cook_time: "45 min".to_string(),
        image_url: "https://img.example/r.jpg".to_string(),
        ingredients: vec![
            IngredientDoc {
                name: "courgettes".to_string(),
                quantity: "3".to_string(),
                unit: "pieces".to_string(),
                complement: "bien fermes".to_string(),
            },
            IngredientDoc {
                name: "creme fraiche".to_string(),
                quantity: "20".to_string(),
                unit: "cl".to_string(),
                complement: "Complément non trouvé".to_string(),
            },
        ],
        steps: vec!["Couper.".to_string(), "Enfourner.".to_string()],
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_recipe_title_guard() {
    let store = connect("larder_test_recipes").await;
    store.database().drop().await.expect("drop test db");
    let recipes = RecipeStore::new(&store);

    let doc = sample_recipe("Gratin de courgettes", "Végétarien");
    assert!(recipes.upsert(&doc).await.unwrap());
    assert!(!recipes.upsert(&doc).await.unwrap());

    let found = recipes.find_by_category("Végétarien").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_find_by_category_ignores_case_and_accents() {
    let store = connect("larder_test_categories").await;
    store.database().drop().await.expect("drop test db");
    let recipes = RecipeStore::new(&store);

    recipes
        .upsert(&sample_recipe("Curry de légumes", "Végétarien"))
        .await
        .unwrap();
    recipes
        .upsert(&sample_recipe("Salade verte", "Healthy"))
        .await
        .unwrap();

    let found = recipes.find_by_category("vegetarien").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Curry de légumes");

    let found = recipes.find_by_category("VÉGÉ").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_distinct_ingredient_names() {
    let store = connect("larder_test_ingredients").await;
    store.database().drop().await.expect("drop test db");
    let recipes = RecipeStore::new(&store);

    recipes
        .upsert(&sample_recipe("Gratin de courgettes", "Végétarien"))
        .await
        .unwrap();
    recipes
        .upsert(&sample_recipe("Tian de courgettes", "Vegan"))
        .await
        .unwrap();

    let mut names = recipes.distinct_ingredient_names().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["courgettes", "creme fraiche"]);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_sandwich_union_merge() {
    let store = connect("larder_test_sandwiches").await;
    store.database().drop().await.expect("drop test db");
    let sandwiches = SandwichStore::new(&store);

    let first = ["bacon".to_string(), "lettuce".to_string()];
    let second = ["lettuce".to_string(), "tomato".to_string()];

    assert!(sandwiches.upsert("BLT", &first).await.unwrap());
    assert!(!sandwiches.upsert("BLT", &second).await.unwrap());

    let all = sandwiches.all().await.unwrap();
    assert_eq!(all.len(), 1);

    let mut names: Vec<&str> = all[0].ingredients.iter().map(|i| i.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["bacon", "lettuce", "tomato"]);
}
