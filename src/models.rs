use serde::{Deserialize, Serialize};

/// An ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub measure: String,
}

/// A recipe as returned to API callers.
///
/// `id`, `cooking_time` and `servings` are always strings here, whatever
/// shape they have in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub id_meal: Option<String>,
    pub highlight: bool,
}

/// Body of `POST /recipes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCreate {
    pub title: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub id_meal: Option<String>,
    #[serde(default)]
    pub highlight: bool,
}

/// Body of `PUT /recipes/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub instructions: Option<Vec<String>>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub youtube: Option<String>,
    pub highlight: Option<bool>,
}

/// Response of `GET /search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub total: usize,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreasResponse {
    pub areas: Vec<String>,
}

// ─── LLM collaborator payloads ───────────────────────────

/// Body of `POST /detect-ingredients`: base64-encoded photos.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    #[serde(default)]
    pub images: Vec<String>,
}

/// A food item detected in a photo, or supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientItem {
    pub name: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientsResponse {
    pub success: bool,
    pub message: String,
    pub ingredients: Vec<IngredientItem>,
    pub error: Option<String>,
}

impl IngredientsResponse {
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ingredients: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Body of `POST /recipes/generate/details`.
///
/// Both fields are optional at the wire level so that the handler can
/// report a missing one as a bad request.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDetailsRequest {
    pub recipe_title: Option<String>,
    pub ingredients: Option<Vec<IngredientRef>>,
}

/// Ingredients may be sent as bare names or as full items.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Name(String),
    Item(IngredientItem),
}

impl IngredientRef {
    pub fn name(&self) -> &str {
        match self {
            IngredientRef::Name(name) => name,
            IngredientRef::Item(item) => &item.name,
        }
    }
}

/// A recipe generated by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<IngredientItem>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
}
