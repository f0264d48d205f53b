use serde_json::json;
use std::collections::BTreeSet;

use super::filter::{category_filter, RecipeFilter};
use super::normalize::{normalize, normalize_all};
use super::relevance::{relevance_expr, SCORE_FIELD};
use super::RecipeError;
use crate::models::Recipe;
use crate::store::{DocumentStore, Filter, SortDirection, SortKey, Stage, ID_FIELD};

/// Cap on the highlighted listing.
pub const MAX_HIGHLIGHTS: usize = 100;

/// Fields callers may sort by explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    CookingTime,
    Servings,
    Category,
    Area,
}

impl SortField {
    pub fn parse(name: &str) -> Result<Self, RecipeError> {
        match name {
            "title" => Ok(SortField::Title),
            "cookingTime" => Ok(SortField::CookingTime),
            "servings" => Ok(SortField::Servings),
            "category" => Ok(SortField::Category),
            "area" => Ok(SortField::Area),
            other => Err(RecipeError::InvalidInput(format!(
                "Unknown sort field '{other}'; expected one of title, cookingTime, servings, category, area"
            ))),
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::CookingTime => "cookingTime",
            SortField::Servings => "servings",
            SortField::Category => "category",
            SortField::Area => "area",
        }
    }
}

/// `"asc"` in any case is ascending; everything else is descending.
pub fn parse_direction(dir: Option<&str>) -> SortDirection {
    match dir {
        None => SortDirection::Ascending,
        Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Ascending,
        Some(_) => SortDirection::Descending,
    }
}

/// Parameters shared by `list` and `search`.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: RecipeFilter,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: RecipeFilter::default(),
            sort_by: None,
            sort_dir: None,
            skip: 0,
            limit: 10,
        }
    }
}

impl ListQuery {
    fn sort_field(&self) -> Result<Option<SortField>, RecipeError> {
        match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => SortField::parse(name).map(Some),
        }
    }

    fn skip(&self) -> usize {
        clamp(self.skip)
    }

    fn limit(&self) -> usize {
        clamp(self.limit)
    }
}

fn clamp(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

/// One page of recipes in the requested order.
///
/// Without an explicit sort field and with a search term, recipes are ranked
/// by relevance (score descending, then title). Without either, they are
/// listed by title.
pub fn list(store: &DocumentStore, query: &ListQuery) -> Result<Vec<Recipe>, RecipeError> {
    let filter = query.filter.to_filter()?;
    let sort_field = query.sort_field()?;

    let docs = match (sort_field, query.filter.term()) {
        (None, Some(term)) => store.aggregate(&[
            Stage::Match(filter),
            Stage::AddScore {
                field: SCORE_FIELD.to_string(),
                expr: relevance_expr(term)?,
            },
            Stage::Sort(vec![
                SortKey::desc(SCORE_FIELD),
                SortKey::asc("title"),
                SortKey::asc(ID_FIELD),
            ]),
            Stage::Skip(query.skip()),
            Stage::Limit(query.limit()),
        ]),
        (Some(field), _) => {
            let sort = vec![
                SortKey {
                    path: field.path().to_string(),
                    direction: parse_direction(query.sort_dir.as_deref()),
                },
                SortKey::asc(ID_FIELD),
            ];
            store.find(&filter, &sort, query.skip(), query.limit())
        }
        (None, None) => store.find(
            &filter,
            &[SortKey::asc("title"), SortKey::asc(ID_FIELD)],
            query.skip(),
            query.limit(),
        ),
    };

    Ok(normalize_all(docs)?)
}

/// Like [`list`], but the term is mandatory and the un-paginated match count
/// is returned alongside the page.
pub fn search(store: &DocumentStore, query: &ListQuery) -> Result<(Vec<Recipe>, usize), RecipeError> {
    if query.filter.term().is_none() {
        return Err(RecipeError::InvalidInput(
            "Search term is required".to_string(),
        ));
    }
    let total = store.count(&query.filter.to_filter()?);
    let recipes = list(store, query)?;
    Ok((recipes, total))
}

/// Up to `limit` randomly chosen recipes, optionally restricted to a category.
pub fn sample(
    store: &DocumentStore,
    limit: i64,
    category: Option<&str>,
) -> Result<Vec<Recipe>, RecipeError> {
    let docs = store.aggregate(&[
        Stage::Match(category_filter(category)?),
        Stage::Sample(clamp(limit)),
    ]);
    Ok(normalize_all(docs)?)
}

/// Editorially featured recipes, at most [`MAX_HIGHLIGHTS`].
pub fn highlighted(store: &DocumentStore) -> Result<Vec<Recipe>, RecipeError> {
    let docs = store.aggregate(&[
        Stage::Match(Filter::equals("highlight", json!(true))),
        Stage::Limit(MAX_HIGHLIGHTS),
    ]);
    Ok(normalize_all(docs)?)
}

/// Point lookup by store identifier, falling back to the legacy `idMeal`.
///
/// Any id returned by [`list`] or [`search`] resolves here. A hyphenated UUID
/// also finds the document stored under its compact form.
pub fn get_by_id(store: &DocumentStore, id: &str) -> Result<Recipe, RecipeError> {
    let mut id_forms = vec![json!(id)];
    if let Ok(uuid) = uuid::Uuid::parse_str(id) {
        let compact = uuid.simple().to_string();
        if compact != id {
            id_forms.push(json!(compact));
        }
    }
    let by_store_id = Filter::Or(
        id_forms
            .into_iter()
            .map(|form| Filter::equals(ID_FIELD, form))
            .collect(),
    );

    // Legacy ids were sometimes imported as numbers.
    let mut legacy_forms = vec![Filter::equals("idMeal", json!(id))];
    if let Ok(n) = id.parse::<i64>() {
        legacy_forms.push(Filter::equals("idMeal", json!(n)));
    }

    let doc = store
        .find_one(&by_store_id)
        .or_else(|| store.find_one(&Filter::Or(legacy_forms)))
        .ok_or_else(|| RecipeError::NotFound { id: id.to_string() })?;

    Ok(normalize(doc)?)
}

pub fn distinct_categories(store: &DocumentStore) -> BTreeSet<String> {
    store.distinct("category")
}

pub fn distinct_areas(store: &DocumentStore) -> BTreeSet<String> {
    store.distinct("area")
}
