use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::error_response;
use crate::catalog;
use crate::models::{
    AreasResponse, CategoriesResponse, Recipe, RecipeCreate, RecipeUpdate, SearchResponse,
};
use crate::search::filter::RecipeFilter;
use crate::search::listing::{self, ListQuery};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Query string of `GET /recipes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub search: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category: Option<String>,
    pub area: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Query string of `GET /recipes/random`.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomParams {
    #[serde(default = "default_random_limit")]
    pub limit: i64,
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    10
}

fn default_random_limit() -> i64 {
    5
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        ListQuery {
            filter: RecipeFilter {
                term: p.search,
                category: p.category,
                area: p.area,
            },
            sort_by: p.sort_by,
            sort_dir: p.sort_dir,
            skip: p.skip,
            limit: p.limit,
        }
    }
}

impl From<SearchParams> for ListQuery {
    fn from(p: SearchParams) -> Self {
        ListQuery {
            filter: RecipeFilter {
                term: p.q,
                category: p.category,
                area: p.area,
            },
            sort_by: p.sort_by,
            sort_dir: p.sort_dir,
            skip: p.skip,
            limit: p.limit,
        }
    }
}

/// GET /recipes - Filtered, sorted, paginated listing
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Recipe>> {
    let query = ListQuery::from(params);
    let recipes = listing::list(&state.store, &query).map_err(error_response)?;
    Ok(Json(recipes))
}

/// GET /search - Term search with total match count
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResponse> {
    let query = ListQuery::from(params);
    let (recipes, total) = listing::search(&state.store, &query).map_err(error_response)?;
    tracing::debug!(
        "Search {:?} matched {total}, returning {}",
        query.filter.term(),
        recipes.len()
    );
    Ok(Json(SearchResponse { total, recipes }))
}

/// GET /recipes/highlights - Featured recipes
pub async fn highlighted_recipes(State(state): State<AppState>) -> ApiResult<Vec<Recipe>> {
    let recipes = listing::highlighted(&state.store).map_err(error_response)?;
    Ok(Json(recipes))
}

/// GET /recipes/random - Random selection, optionally within a category
pub async fn random_recipes(
    State(state): State<AppState>,
    Query(params): Query<RandomParams>,
) -> ApiResult<Vec<Recipe>> {
    let recipes = listing::sample(&state.store, params.limit, params.category.as_deref())
        .map_err(error_response)?;
    Ok(Json(recipes))
}

/// GET /recipes/{recipe_id} - Lookup by store id or legacy idMeal
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> ApiResult<Recipe> {
    let recipe = listing::get_by_id(&state.store, &recipe_id).map_err(error_response)?;
    Ok(Json(recipe))
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: listing::distinct_categories(&state.store).into_iter().collect(),
    })
}

/// GET /areas
pub async fn list_areas(State(state): State<AppState>) -> Json<AreasResponse> {
    Json(AreasResponse {
        areas: listing::distinct_areas(&state.store).into_iter().collect(),
    })
}

/// POST /recipes - Create a recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(req): Json<RecipeCreate>,
) -> Result<(StatusCode, Json<Recipe>), (StatusCode, String)> {
    let recipe = catalog::create(&state.store, req).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /recipes/{recipe_id} - Partial update
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(req): Json<RecipeUpdate>,
) -> ApiResult<Recipe> {
    let recipe = catalog::update(&state.store, &recipe_id, req).map_err(error_response)?;
    Ok(Json(recipe))
}

/// DELETE /recipes/{recipe_id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    catalog::delete(&state.store, &recipe_id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
