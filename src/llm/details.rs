use anyhow::Result;
use serde::Deserialize;

use super::chat::{complete, ChatPrompt};
use super::cleanup::parse_json;
use super::JSON_ONLY_SYSTEM_COOKING;
use crate::config::LlmConfig;
use crate::models::{GeneratedRecipe, IngredientItem};
use crate::search::normalize::FlexibleText;

const DEFAULT_SERVINGS: &str = "2";
const FALLBACK_DESCRIPTION: &str = "Recipe details could not be generated. Please try again.";

/// Generate a full recipe for `title` using the given ingredients.
///
/// Fields the model leaves out are backfilled; if the model cannot be
/// reached or its answer cannot be parsed, a placeholder recipe carrying
/// the requested title and ingredients is returned instead.
pub async fn generate_details(
    client: &reqwest::Client,
    config: &LlmConfig,
    title: &str,
    ingredients: &[String],
) -> GeneratedRecipe {
    match request_details(client, config, title, ingredients).await {
        Ok(partial) => backfill(partial, title, ingredients),
        Err(e) => {
            tracing::warn!("Recipe detail generation for '{title}' failed: {e:#}");
            placeholder(title, ingredients)
        }
    }
}

async fn request_details(
    client: &reqwest::Client,
    config: &LlmConfig,
    title: &str,
    ingredients: &[String],
) -> Result<PartialRecipe> {
    let ingredients_text = ingredients.join(", ");
    let prompt = format!(
        "Create a detailed recipe for \"{title}\" using these available ingredients: {ingredients_text}.\n\
         You can assume basic pantry items like salt, pepper, oil, common spices, and water are available.\n\n\
         Answer with a JSON object in exactly this format:\n\
         {{\n  \"title\": \"Recipe title\",\n  \"description\": \"Short description\",\n  \
         \"prep_time\": \"15 minutes\",\n  \"cook_time\": \"30 minutes\",\n  \"servings\": \"4\",\n  \
         \"ingredients\": [{{\"name\": \"Ingredient\", \"amount\": \"200\", \"unit\": \"g\"}}],\n  \
         \"instructions\": [\"Step 1\", \"Step 2\"],\n  \"tips\": [\"Tip 1\"]\n}}\n\
         Answer ONLY with the JSON object, without additional text."
    );

    let answer = complete(
        client,
        config,
        &ChatPrompt {
            system: JSON_ONLY_SYSTEM_COOKING,
            user: &prompt,
            image_base64: None,
        },
    )
    .await?;
    tracing::debug!("Recipe detail answer: {answer}");
    parse_json(&answer)
}

/// Model output with every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialRecipe {
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "prepTime")]
    prep_time: Option<FlexibleText>,
    #[serde(alias = "cookTime", alias = "cooking_time")]
    cook_time: Option<FlexibleText>,
    servings: Option<FlexibleText>,
    ingredients: Option<Vec<GeneratedIngredient>>,
    #[serde(alias = "steps")]
    instructions: Option<Vec<String>>,
    tips: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedIngredient {
    Name(String),
    Item {
        name: String,
        #[serde(default)]
        amount: Option<FlexibleText>,
        #[serde(default)]
        unit: Option<FlexibleText>,
    },
}

impl From<GeneratedIngredient> for IngredientItem {
    fn from(value: GeneratedIngredient) -> Self {
        match value {
            GeneratedIngredient::Name(name) => IngredientItem {
                name,
                amount: None,
                unit: None,
            },
            GeneratedIngredient::Item { name, amount, unit } => IngredientItem {
                name,
                amount: amount.map(FlexibleText::into_plain),
                unit: unit.map(FlexibleText::into_plain),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn supplied_items(ingredients: &[String]) -> Vec<IngredientItem> {
    ingredients
        .iter()
        .map(|name| IngredientItem {
            name: name.clone(),
            amount: None,
            unit: None,
        })
        .collect()
}

fn backfill(partial: PartialRecipe, title: &str, ingredients: &[String]) -> GeneratedRecipe {
    let generated_ingredients: Vec<IngredientItem> = partial
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .map(IngredientItem::from)
        .filter(|i| !i.name.trim().is_empty())
        .collect();

    GeneratedRecipe {
        title: non_empty(partial.title).unwrap_or_else(|| title.to_string()),
        description: partial.description.unwrap_or_default(),
        prep_time: partial.prep_time.map(FlexibleText::into_plain).unwrap_or_default(),
        cook_time: partial.cook_time.map(FlexibleText::into_plain).unwrap_or_default(),
        servings: non_empty(partial.servings.map(FlexibleText::into_plain))
            .unwrap_or_else(|| DEFAULT_SERVINGS.to_string()),
        ingredients: if generated_ingredients.is_empty() {
            supplied_items(ingredients)
        } else {
            generated_ingredients
        },
        instructions: partial.instructions.unwrap_or_default(),
        tips: partial.tips.unwrap_or_default(),
    }
}

fn placeholder(title: &str, ingredients: &[String]) -> GeneratedRecipe {
    GeneratedRecipe {
        title: title.to_string(),
        description: FALLBACK_DESCRIPTION.to_string(),
        prep_time: String::new(),
        cook_time: String::new(),
        servings: DEFAULT_SERVINGS.to_string(),
        ingredients: supplied_items(ingredients),
        instructions: Vec::new(),
        tips: Vec::new(),
    }
}
