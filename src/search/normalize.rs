use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Ingredient, Recipe};
use crate::store::StoreError;

/// Hosts whose links are always accepted as video links.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "vimeo.com"];

/// A field stored either as text or as a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleText {
    Text(String),
    Number(serde_json::Number),
}

impl FlexibleText {
    /// Display form: text passes through, numbers get `suffix` appended.
    pub fn display(&self, suffix: &str) -> String {
        match self {
            FlexibleText::Text(s) => s.clone(),
            FlexibleText::Number(n) => format!("{n} {suffix}"),
        }
    }

    /// Plain string form, no unit.
    pub fn into_plain(self) -> String {
        match self {
            FlexibleText::Text(s) => s,
            FlexibleText::Number(n) => n.to_string(),
        }
    }
}

/// Stored shape of a recipe, tolerant of the variations found in the collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecipe {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    instructions: Option<Vec<String>>,
    #[serde(default)]
    ingredients: Option<Vec<StoredIngredient>>,
    cooking_time: Option<FlexibleText>,
    servings: Option<FlexibleText>,
    category: Option<String>,
    area: Option<String>,
    image: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    youtube: Option<String>,
    id_meal: Option<FlexibleText>,
    #[serde(default)]
    highlight: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct StoredIngredient {
    name: String,
    #[serde(default)]
    measure: Option<FlexibleText>,
}

/// Convert a raw stored document into the API-facing [`Recipe`].
pub fn normalize(doc: Value) -> Result<Recipe, StoreError> {
    let id = doc
        .get(crate::store::ID_FIELD)
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();

    let stored: StoredRecipe = serde_json::from_value(doc).map_err(|e| StoreError::Malformed {
        id: id.clone(),
        reason: e.to_string(),
    })?;

    Ok(Recipe {
        id: stored.id,
        title: stored.title,
        instructions: stored.instructions.unwrap_or_default(),
        ingredients: stored
            .ingredients
            .unwrap_or_default()
            .into_iter()
            .map(|i| Ingredient {
                name: i.name,
                measure: i.measure.map(FlexibleText::into_plain).unwrap_or_default(),
            })
            .collect(),
        cooking_time: stored.cooking_time.map(|v| v.display("Min")),
        servings: stored.servings.map(|v| v.display("servings")),
        category: stored.category,
        area: stored.area,
        image: stored.image,
        tags: stored.tags.unwrap_or_default(),
        youtube: stored.youtube.and_then(|y| sanitize_youtube(&y)),
        id_meal: stored.id_meal.map(FlexibleText::into_plain),
        highlight: stored.highlight.unwrap_or(false),
    })
}

pub fn normalize_all(docs: Vec<Value>) -> Result<Vec<Recipe>, StoreError> {
    docs.into_iter().map(normalize).collect()
}

/// Loose video-link check: known video hosts or any absolute URL pass,
/// anything else is dropped.
pub fn sanitize_youtube(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if VIDEO_HOSTS.iter().any(|host| lower.contains(host)) {
        return Some(trimmed.to_string());
    }
    match reqwest::Url::parse(trimmed) {
        Ok(url) if url.has_host() => Some(trimmed.to_string()),
        _ => None,
    }
}
