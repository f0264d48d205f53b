use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use super::chat::{complete, ChatPrompt};
use super::cleanup::parse_json;
use super::JSON_ONLY_SYSTEM;
use crate::config::LlmConfig;
use crate::models::{IngredientItem, IngredientsResponse};
use crate::search::normalize::FlexibleText;

const DETECT_PROMPT: &str = "Analyze this image of a refrigerator or kitchen and identify all \
visible food items and ingredients. If possible, also provide quantities and units.\n\n\
Answer with a JSON list in the following format:\n\
[\n  {\"name\": \"Ingredient1\", \"amount\": \"Quantity1\", \"unit\": \"Unit1\"},\n  \
{\"name\": \"Ingredient2\", \"amount\": \"Quantity2\", \"unit\": \"Unit2\"}\n]\n\n\
If quantity or unit cannot be determined, omit the corresponding fields.\n\
Answer ONLY with the JSON list, without additional text.";

/// Detect food ingredients in one or more base64-encoded photos.
///
/// Every image is analysed; results are merged, keeping the first occurrence
/// of each name (case-insensitive). Failures are reported in the response,
/// never raised.
pub async fn detect_ingredients(
    client: &reqwest::Client,
    config: &LlmConfig,
    images: &[String],
) -> IngredientsResponse {
    let images: Vec<&str> = images
        .iter()
        .map(|i| strip_data_url(i.trim()))
        .filter(|i| !i.is_empty())
        .collect();
    if images.is_empty() {
        return IngredientsResponse::failure("No images found", "At least one image is required");
    }

    let mut merged: Vec<IngredientItem> = Vec::new();
    let mut seen = HashSet::new();
    let mut last_error = None;
    let mut analysed = 0usize;

    for (i, image) in images.iter().enumerate() {
        match detect_in_image(client, config, image).await {
            Ok(items) => {
                analysed += 1;
                for item in items {
                    if seen.insert(item.name.to_lowercase()) {
                        merged.push(item);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Ingredient detection failed for image {}: {e:#}", i + 1);
                last_error = Some(e);
            }
        }
    }

    if analysed == 0 {
        let cause = last_error
            .map(|e| format!("{e:#}"))
            .unwrap_or_else(|| "unknown error".to_string());
        return IngredientsResponse::failure("Error analyzing the images", cause);
    }

    if merged.is_empty() {
        return IngredientsResponse::failure(
            "No ingredients detected",
            "The AI could not identify any food ingredients in the image",
        );
    }

    IngredientsResponse {
        success: true,
        message: format!("{} ingredients detected", merged.len()),
        ingredients: merged,
        error: None,
    }
}

async fn detect_in_image(
    client: &reqwest::Client,
    config: &LlmConfig,
    image_base64: &str,
) -> Result<Vec<IngredientItem>> {
    let answer = complete(
        client,
        config,
        &ChatPrompt {
            system: JSON_ONLY_SYSTEM,
            user: DETECT_PROMPT,
            image_base64: Some(image_base64),
        },
    )
    .await?;
    tracing::debug!("Ingredient detection answer: {answer}");
    parse_detected(&answer)
}

#[derive(Deserialize)]
struct DetectedItem {
    name: Option<String>,
    amount: Option<FlexibleText>,
    unit: Option<FlexibleText>,
}

/// Accepts a bare list or an object with an `ingredients` list. Entries
/// without a usable name are skipped.
fn parse_detected(answer: &str) -> Result<Vec<IngredientItem>> {
    let value: Value = parse_json(answer)?;
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("ingredients") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("Unexpected response format: object without an ingredients list"),
        },
        other => anyhow::bail!("Unexpected response format: {other}"),
    };

    Ok(list
        .into_iter()
        .filter_map(|item| serde_json::from_value::<DetectedItem>(item).ok())
        .filter_map(|item| {
            let name = item.name?.trim().to_string();
            (!name.is_empty()).then(|| IngredientItem {
                name,
                amount: item.amount.map(FlexibleText::into_plain),
                unit: item.unit.map(FlexibleText::into_plain),
            })
        })
        .collect())
}

/// Accept `data:image/...;base64,` URLs as well as bare base64.
fn strip_data_url(image: &str) -> &str {
    if image.starts_with("data:") {
        image.split_once(',').map(|(_, data)| data).unwrap_or(image)
    } else {
        image
    }
}
