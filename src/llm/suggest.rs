use anyhow::Result;
use serde_json::Value;

use super::chat::{complete, ChatPrompt};
use super::cleanup::parse_json;
use super::JSON_ONLY_SYSTEM_COOKING;
use crate::config::LlmConfig;

pub const MAX_SUGGESTIONS: usize = 5;
pub const NO_INGREDIENTS: &str = "No ingredients provided";
pub const GENERATION_FAILED: &str = "Unable to generate recipes. Please try again.";

/// Suggest up to [`MAX_SUGGESTIONS`] recipe titles for the given ingredients.
///
/// Never fails: an empty ingredient list or a model failure yields a
/// single-entry placeholder list.
pub async fn suggest_titles(
    client: &reqwest::Client,
    config: &LlmConfig,
    ingredients: &[String],
) -> Vec<String> {
    let names: Vec<&str> = ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if names.is_empty() {
        return vec![NO_INGREDIENTS.to_string()];
    }

    match request_titles(client, config, &names).await {
        Ok(titles) if !titles.is_empty() => titles,
        Ok(_) => {
            tracing::warn!("Recipe suggestion returned no titles");
            vec![GENERATION_FAILED.to_string()]
        }
        Err(e) => {
            tracing::warn!("Recipe suggestion failed: {e:#}");
            vec![GENERATION_FAILED.to_string()]
        }
    }
}

async fn request_titles(
    client: &reqwest::Client,
    config: &LlmConfig,
    names: &[&str],
) -> Result<Vec<String>> {
    let ingredients_text = names.join(", ");
    let prompt = format!(
        "Given the following ingredients: {ingredients_text}\n\n\
         Generate a list of {MAX_SUGGESTIONS} recipe titles that can be made with these ingredients.\n\
         You can assume basic pantry items like salt, pepper, oil, common spices, and water are available.\n\
         Focus on practical, well-known recipes that would be simple to make.\n\
         Focus on the main ingredients and create a list of recipes that can be made with them. \
         Don't combine them all into one recipe.\n\n\
         Answer with a JSON array of strings, each string being a recipe title.\n\
         Example: [\"Pasta Carbonara\", \"Mushroom Risotto\"]"
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
    tracing::debug!("Recipe suggestion answer: {answer}");
    parse_titles(&answer)
}

/// Keep string entries only, trimmed and non-empty, at most [`MAX_SUGGESTIONS`].
fn parse_titles(answer: &str) -> Result<Vec<String>> {
    let value: Value = parse_json(answer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("Unexpected response format: object without a recipes list"),
        },
        other => anyhow::bail!("Unexpected response format: {other}"),
    };

    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(map) => map
                .get("title")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect())
}
