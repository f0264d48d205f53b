//! Write path for recipes: create, partial update, delete.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::models::{Recipe, RecipeCreate, RecipeUpdate};
use crate::search::listing::get_by_id;
use crate::search::normalize::sanitize_youtube;
use crate::search::RecipeError;
use crate::store::DocumentStore;

pub fn create(store: &DocumentStore, recipe: RecipeCreate) -> Result<Recipe, RecipeError> {
    let title = recipe.title.trim();
    if title.is_empty() {
        return Err(RecipeError::InvalidInput("Title is required".to_string()));
    }

    let now = Value::String(Utc::now().to_rfc3339());
    let mut doc = Map::new();
    doc.insert("title".into(), Value::String(title.to_string()));
    doc.insert("instructions".into(), serde_json::to_value(&recipe.instructions).map_err(store_json)?);
    doc.insert("ingredients".into(), serde_json::to_value(&recipe.ingredients).map_err(store_json)?);
    insert_opt(&mut doc, "cookingTime", recipe.cooking_time);
    insert_opt(&mut doc, "servings", recipe.servings);
    insert_opt(&mut doc, "category", recipe.category);
    insert_opt(&mut doc, "area", recipe.area);
    insert_opt(&mut doc, "image", recipe.image);
    doc.insert("tags".into(), serde_json::to_value(&recipe.tags).map_err(store_json)?);
    insert_opt(&mut doc, "youtube", recipe.youtube.as_deref().and_then(sanitize_youtube));
    insert_opt(&mut doc, "idMeal", recipe.id_meal);
    doc.insert("highlight".into(), Value::Bool(recipe.highlight));
    doc.insert("created_at".into(), now.clone());
    doc.insert("updated_at".into(), now);

    let id = store.insert(doc)?;
    tracing::info!("Created recipe {id}");
    get_by_id(store, &id)
}

/// Apply the fields present in `update`; a rejected youtube link clears the stored one.
pub fn update(store: &DocumentStore, id: &str, update: RecipeUpdate) -> Result<Recipe, RecipeError> {
    let existing = get_by_id(store, id)?;

    let mut fields = Map::new();
    if let Some(title) = update.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(RecipeError::InvalidInput("Title must not be empty".to_string()));
        }
        fields.insert("title".into(), Value::String(title));
    }
    if let Some(instructions) = update.instructions {
        fields.insert("instructions".into(), serde_json::to_value(instructions).map_err(store_json)?);
    }
    if let Some(ingredients) = update.ingredients {
        fields.insert("ingredients".into(), serde_json::to_value(ingredients).map_err(store_json)?);
    }
    if let Some(tags) = update.tags {
        fields.insert("tags".into(), serde_json::to_value(tags).map_err(store_json)?);
    }
    insert_opt(&mut fields, "cookingTime", update.cooking_time);
    insert_opt(&mut fields, "servings", update.servings);
    insert_opt(&mut fields, "category", update.category);
    insert_opt(&mut fields, "area", update.area);
    insert_opt(&mut fields, "image", update.image);
    if let Some(youtube) = update.youtube {
        let value = sanitize_youtube(&youtube).map(Value::String).unwrap_or(Value::Null);
        fields.insert("youtube".into(), value);
    }
    if let Some(highlight) = update.highlight {
        fields.insert("highlight".into(), Value::Bool(highlight));
    }
    fields.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));

    if !store.update(&existing.id, fields)? {
        return Err(RecipeError::NotFound { id: id.to_string() });
    }
    get_by_id(store, &existing.id)
}

pub fn delete(store: &DocumentStore, id: &str) -> Result<(), RecipeError> {
    let existing = get_by_id(store, id)?;
    if !store.delete(&existing.id)? {
        return Err(RecipeError::NotFound { id: id.to_string() });
    }
    tracing::info!("Deleted recipe {}", existing.id);
    Ok(())
}

fn insert_opt(doc: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        doc.insert(key.to_string(), Value::String(v));
    }
}

fn store_json(e: serde_json::Error) -> RecipeError {
    RecipeError::Store(e.into())
}
