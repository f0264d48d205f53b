//! Integration tests for the recipe read path.
//!
//! These tests seed a collection on disk, open it through the store and run
//! the listing/search operations and HTTP handlers against it. No LLM is
//! contacted.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{json, Value};

use mealmate::api;
use mealmate::config::Config;
use mealmate::search::filter::RecipeFilter;
use mealmate::search::listing::{self, ListQuery};
use mealmate::search::RecipeError;
use mealmate::state::AppState;
use mealmate::store::DocumentStore;

/// Helper: the three-recipe collection used by the ranking scenarios.
fn greek_and_italian() -> Vec<Value> {
    vec![
        json!({"_id": "a1", "title": "Greek Salad", "category": "Salad", "area": "Greek",
               "ingredients": [{"name": "Feta", "measure": "100g"}], "cookingTime": 10}),
        json!({"_id": "a2", "title": "Italian Pasta", "category": "Pasta", "area": "Italian",
               "tags": ["pasta"], "cookingTime": "25 Min", "servings": 2}),
        json!({"_id": "a3", "title": "Greek Moussaka", "category": "Main", "area": "Greek",
               "cookingTime": 90, "highlight": true}),
    ]
}

/// Helper: a larger collection for paging checks, with repeated scores.
fn chicken_collection() -> Vec<Value> {
    let mut docs = Vec::new();
    for i in 0..23 {
        let title = format!("Dish {:02}", (i * 7) % 23);
        let mut doc = json!({"_id": format!("c{i:02}"), "title": title, "category": "Main"});
        match i % 4 {
            0 => doc["title"] = json!(format!("Chicken {title}")),
            1 => doc["tags"] = json!(["chicken", "dinner"]),
            2 => doc["ingredients"] = json!([{"name": "Chicken thigh"}, {"name": "chicken stock"}]),
            _ => doc["area"] = json!("Chicken Coast"),
        }
        docs.push(doc);
    }
    docs.push(json!({"_id": "z1", "title": "Plain Rice", "category": "Side"}));
    docs
}

fn open_store(docs: &[Value]) -> (tempfile::TempDir, DocumentStore) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("recipes.json"),
        serde_json::to_string(docs).unwrap(),
    )
    .unwrap();
    let store = DocumentStore::open_or_create(dir.path()).unwrap();
    (dir, store)
}

fn term_query(term: &str, skip: i64, limit: i64) -> ListQuery {
    ListQuery {
        filter: RecipeFilter {
            term: Some(term.to_string()),
            ..Default::default()
        },
        skip,
        limit,
        ..Default::default()
    }
}

fn titles(recipes: &[mealmate::models::Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn test_equal_scores_break_ties_by_title() {
    let (_dir, store) = open_store(&greek_and_italian());
    let (recipes, total) = listing::search(&store, &term_query("Greek", 0, 10)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(titles(&recipes), vec!["Greek Moussaka", "Greek Salad"]);
}

#[test]
fn test_pasta_matches_single_recipe() {
    let (_dir, store) = open_store(&greek_and_italian());
    let (recipes, total) = listing::search(&store, &term_query("pasta", 0, 10)).unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&recipes), vec!["Italian Pasta"]);
}

#[test]
fn test_higher_score_ranks_first() {
    let docs = vec![
        json!({"_id": "1", "title": "Beef Stew", "ingredients": [{"name": "Onion"}]}),
        json!({"_id": "2", "title": "Onion Soup", "area": "French"}),
        json!({"_id": "3", "title": "Burger", "tags": ["onion rings"],
               "ingredients": [{"name": "Red onion"}, {"name": "onion powder"}]}),
    ];
    let (_dir, store) = open_store(&docs);
    let recipes = listing::list(&store, &term_query("onion", 0, 10)).unwrap();
    // Onion Soup 10, Burger 5+2, Beef Stew 1
    assert_eq!(titles(&recipes), vec!["Onion Soup", "Burger", "Beef Stew"]);
}

#[test]
fn test_total_ignores_paging_and_limit_zero_is_empty() {
    let (_dir, store) = open_store(&chicken_collection());
    let (page, total) = listing::search(&store, &term_query("chicken", 0, 0)).unwrap();
    assert!(page.is_empty());
    assert_eq!(total, 23);

    let (page, total) = listing::search(&store, &term_query("chicken", 20, 10)).unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(total, 23);
}

#[test]
fn test_page_is_full_until_results_run_out() {
    let (_dir, store) = open_store(&chicken_collection());
    for skip in [0, 5, 10, 15, 20, 25] {
        let page = listing::list(&store, &term_query("chicken", skip, 5)).unwrap();
        let remaining = 23usize.saturating_sub(skip as usize);
        assert_eq!(page.len(), remaining.min(5), "skip={skip}");
    }
}

#[test]
fn test_pages_concatenate_to_full_ranking() {
    let (_dir, store) = open_store(&chicken_collection());
    let (full, total) = listing::search(&store, &term_query("chicken", 0, 23)).unwrap();
    assert_eq!(full.len(), total);

    let mut stitched = Vec::new();
    let mut skip = 0;
    loop {
        let page = listing::list(&store, &term_query("chicken", skip, 4)).unwrap();
        if page.is_empty() {
            break;
        }
        skip += page.len() as i64;
        stitched.extend(page);
    }
    assert_eq!(stitched, full);
}

#[test]
fn test_repeated_search_is_identical() {
    let (_dir, store) = open_store(&chicken_collection());
    let first = listing::list(&store, &term_query("chicken", 3, 7)).unwrap();
    let second = listing::list(&store, &term_query("chicken", 3, 7)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_listing_without_term_or_sort_is_by_title() {
    let (_dir, store) = open_store(&greek_and_italian());
    let recipes = listing::list(&store, &ListQuery::default()).unwrap();
    assert_eq!(
        titles(&recipes),
        vec!["Greek Moussaka", "Greek Salad", "Italian Pasta"]
    );
}

#[test]
fn test_area_filter_without_term() {
    let (_dir, store) = open_store(&greek_and_italian());
    let query = ListQuery {
        filter: RecipeFilter {
            area: Some("greek".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let recipes = listing::list(&store, &query).unwrap();
    assert_eq!(titles(&recipes), vec!["Greek Moussaka", "Greek Salad"]);
}

#[test]
fn test_category_filter_is_anded_with_term() {
    let (_dir, store) = open_store(&greek_and_italian());
    let query = ListQuery {
        filter: RecipeFilter {
            term: Some("greek".to_string()),
            category: Some("salad".to_string()),
            area: None,
        },
        ..Default::default()
    };
    let (recipes, total) = listing::search(&store, &query).unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&recipes), vec!["Greek Salad"]);
}

#[test]
fn test_explicit_sort_overrides_relevance() {
    let (_dir, store) = open_store(&greek_and_italian());
    let mut query = term_query("greek", 0, 10);
    query.sort_by = Some("category".to_string());
    query.sort_dir = Some("DESC".to_string());
    let recipes = listing::list(&store, &query).unwrap();
    assert_eq!(titles(&recipes), vec!["Greek Salad", "Greek Moussaka"]);

    query.sort_dir = Some("asc".to_string());
    let recipes = listing::list(&store, &query).unwrap();
    assert_eq!(titles(&recipes), vec!["Greek Moussaka", "Greek Salad"]);
}

#[test]
fn test_sort_by_cooking_time_orders_numbers_before_strings() {
    let (_dir, store) = open_store(&greek_and_italian());
    let query = ListQuery {
        sort_by: Some("cookingTime".to_string()),
        ..Default::default()
    };
    let recipes = listing::list(&store, &query).unwrap();
    assert_eq!(
        titles(&recipes),
        vec!["Greek Salad", "Greek Moussaka", "Italian Pasta"]
    );
}

#[test]
fn test_unknown_sort_field_is_rejected() {
    let (_dir, store) = open_store(&greek_and_italian());
    let query = ListQuery {
        sort_by: Some("$where".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        listing::list(&store, &query),
        Err(RecipeError::InvalidInput(_))
    ));
}

#[test]
fn test_search_requires_term() {
    let (_dir, store) = open_store(&greek_and_italian());
    assert!(matches!(
        listing::search(&store, &term_query("   ", 0, 10)),
        Err(RecipeError::InvalidInput(_))
    ));
}

#[test]
fn test_results_are_normalized() {
    let (_dir, store) = open_store(&greek_and_italian());
    let recipes = listing::list(&store, &ListQuery::default()).unwrap();
    let salad = recipes.iter().find(|r| r.title == "Greek Salad").unwrap();
    assert_eq!(salad.cooking_time.as_deref(), Some("10 Min"));
    let pasta = recipes.iter().find(|r| r.title == "Italian Pasta").unwrap();
    assert_eq!(pasta.cooking_time.as_deref(), Some("25 Min"));
    assert_eq!(pasta.servings.as_deref(), Some("2 servings"));
}

#[test]
fn test_get_by_id_falls_back_to_legacy_id() {
    let docs = vec![
        json!({"_id": "0123456789abcdef0123456789abcdef", "title": "Stored", "idMeal": "111"}),
        json!({"_id": "x", "title": "Legacy", "idMeal": "52772"}),
    ];
    let (_dir, store) = open_store(&docs);

    let stored = listing::get_by_id(&store, "0123456789abcdef0123456789abcdef").unwrap();
    assert_eq!(stored.title, "Stored");

    let legacy = listing::get_by_id(&store, "52772").unwrap();
    assert_eq!(legacy.title, "Legacy");

    match listing::get_by_id(&store, "not-an-id!") {
        Err(RecipeError::NotFound { id }) => assert_eq!(id, "not-an-id!"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_every_listed_id_resolves() {
    let mut docs = greek_and_italian();
    docs.push(json!({"_id": "507f1f77bcf86cd799439011", "title": "Soup"}));
    docs.push(json!({"_id": 42, "title": "Numbered"}));
    docs.push(json!({"_id": {"$oid": "5f43a1b2c3d4e5f607182930"}, "title": "Exported"}));
    docs.push(json!({"title": "No Id", "idMeal": 52772}));
    let (_dir, store) = open_store(&docs);

    let query = ListQuery {
        limit: 100,
        ..Default::default()
    };
    let listed = listing::list(&store, &query).unwrap();
    assert_eq!(listed.len(), docs.len());
    for recipe in &listed {
        let found = listing::get_by_id(&store, &recipe.id).unwrap();
        assert_eq!(found.title, recipe.title);
    }

    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert!(ids.contains(&"42"));
    assert!(ids.contains(&"5f43a1b2c3d4e5f607182930"));

    let (found, _) = listing::search(&store, &term_query("soup", 0, 10)).unwrap();
    assert_eq!(
        listing::get_by_id(&store, &found[0].id).unwrap().title,
        "Soup"
    );

    // Numeric legacy id is reachable through its text form.
    assert_eq!(listing::get_by_id(&store, "52772").unwrap().title, "No Id");
}

#[test]
fn test_hyphenated_uuid_finds_compact_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::open_or_create(dir.path()).unwrap();
    let created = mealmate::catalog::create(
        &store,
        serde_json::from_value(json!({"title": "Flatbread"})).unwrap(),
    )
    .unwrap();

    let hyphenated = uuid::Uuid::parse_str(&created.id)
        .unwrap()
        .hyphenated()
        .to_string();
    assert_ne!(hyphenated, created.id);
    assert_eq!(
        listing::get_by_id(&store, &hyphenated).unwrap().title,
        "Flatbread"
    );
}

#[test]
fn test_sample_respects_limit_and_category() {
    let (_dir, store) = open_store(&chicken_collection());
    let picked = listing::sample(&store, 5, None).unwrap();
    assert_eq!(picked.len(), 5);

    let sides = listing::sample(&store, 5, Some("side")).unwrap();
    assert_eq!(titles(&sides), vec!["Plain Rice"]);

    assert!(listing::sample(&store, -3, None).unwrap().is_empty());
}

#[test]
fn test_highlighted_and_distinct_values() {
    let (_dir, store) = open_store(&greek_and_italian());
    let featured = listing::highlighted(&store).unwrap();
    assert_eq!(titles(&featured), vec!["Greek Moussaka"]);

    let areas: Vec<String> = listing::distinct_areas(&store).into_iter().collect();
    assert_eq!(areas, vec!["Greek", "Italian"]);
    let categories: Vec<String> = listing::distinct_categories(&store).into_iter().collect();
    assert_eq!(categories, vec!["Main", "Pasta", "Salad"]);
}

// ─── HTTP handlers ───────────────────────────────────────

fn app_state(docs: &[Value]) -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("recipes.json"),
        serde_json::to_string(docs).unwrap(),
    )
    .unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    (dir, AppState::new(config).unwrap())
}

#[tokio::test]
async fn test_search_handler_returns_total_and_page() {
    let (_dir, state) = app_state(&greek_and_italian());
    let params: api::recipes::SearchParams =
        serde_json::from_value(json!({"q": "greek", "limit": 1})).unwrap();
    let resp = api::recipes::search_recipes(State(state), Query(params))
        .await
        .unwrap();
    assert_eq!(resp.total, 2);
    assert_eq!(resp.recipes.len(), 1);
    assert_eq!(resp.recipes[0].title, "Greek Moussaka");
}

#[tokio::test]
async fn test_search_handler_without_term_is_bad_request() {
    let (_dir, state) = app_state(&greek_and_italian());
    let params: api::recipes::SearchParams = serde_json::from_value(json!({})).unwrap();
    let err = api::recipes::search_recipes(State(state), Query(params))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_handler_reports_not_found() {
    let (_dir, state) = app_state(&greek_and_italian());
    let err = api::recipes::get_recipe(State(state), Path("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
    assert!(err.1.contains("missing"));
}

#[tokio::test]
async fn test_get_handler_resolves_listed_ids() {
    let (_dir, state) = app_state(&greek_and_italian());
    let params: api::recipes::ListParams = serde_json::from_value(json!({})).unwrap();
    let listed = api::recipes::list_recipes(State(state.clone()), Query(params))
        .await
        .unwrap();
    for recipe in listed.iter() {
        let found = api::recipes::get_recipe(State(state.clone()), Path(recipe.id.clone()))
            .await
            .unwrap();
        assert_eq!(found.title, recipe.title);
    }
}

#[tokio::test]
async fn test_list_handler_uses_default_paging() {
    let (_dir, state) = app_state(&chicken_collection());
    let params: api::recipes::ListParams = serde_json::from_value(json!({})).unwrap();
    let resp = api::recipes::list_recipes(State(state), Query(params))
        .await
        .unwrap();
    assert_eq!(resp.len(), 10);
}

#[tokio::test]
async fn test_details_handler_requires_title_and_ingredients() {
    let (_dir, state) = app_state(&[]);
    let req = serde_json::from_value(json!({"recipe_title": "Soup"})).unwrap();
    let err = api::generate::generate_recipe_details(State(state), axum::Json(req))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detect_handler_without_images() {
    let (_dir, state) = app_state(&[]);
    let upload = serde_json::from_value(json!({"images": []})).unwrap();
    let resp = api::generate::detect_ingredients(State(state), axum::Json(upload)).await;
    assert!(!resp.success);
    assert_eq!(resp.message, "No images found");
}
