use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::LlmConfig;

/// A single-turn request: system instruction, user prompt, optional photo.
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    /// Base64-encoded JPEG, without a data-URL prefix
    pub image_base64: Option<&'a str>,
}

/// Send one prompt to the configured provider and return the raw text answer.
pub async fn complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &ChatPrompt<'_>,
) -> Result<String> {
    match config.provider.as_str() {
        "ollama" => call_ollama(client, config, prompt).await,
        "openai" => {
            let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));
            let api_key = config.api_key.as_deref().unwrap_or_default();
            let req = client
                .post(&url)
                .header("Authorization", format!("Bearer {api_key}"));
            call_openai_compatible(req, config, prompt, true).await
        }
        "azure" => {
            let url = format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                config.base_url.trim_end_matches('/'),
                config.chat_model,
                config.api_version
            );
            let api_key = config.api_key.as_deref().unwrap_or_default();
            let req = client.post(&url).header("api-key", api_key);
            call_openai_compatible(req, config, prompt, false).await
        }
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &ChatPrompt<'_>,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url.trim_end_matches('/'));

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages: vec![
            OllamaMessage {
                role: "system".to_string(),
                content: prompt.system.to_string(),
                images: Vec::new(),
            },
            OllamaMessage {
                role: "user".to_string(),
                content: prompt.user.to_string(),
                images: prompt.image_base64.map(str::to_string).into_iter().collect(),
            },
        ],
        stream: false,
    };

    let resp = client
        .post(&url)
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama chat API returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama chat response")?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible (OpenAI, Azure OpenAI) ────────────

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn openai_user_content(prompt: &ChatPrompt<'_>) -> Value {
    match prompt.image_base64 {
        None => Value::String(prompt.user.to_string()),
        Some(image) => json!([
            {"type": "text", "text": prompt.user},
            {
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/jpeg;base64,{image}"),
                    "detail": "high"
                }
            }
        ]),
    }
}

async fn call_openai_compatible(
    req: reqwest::RequestBuilder,
    config: &LlmConfig,
    prompt: &ChatPrompt<'_>,
    send_model: bool,
) -> Result<String> {
    let mut body = json!({
        "messages": [
            {"role": "system", "content": prompt.system},
            {"role": "user", "content": openai_user_content(prompt)}
        ],
        "temperature": 0.3
    });
    // Azure routes by deployment in the URL instead of a model field
    if send_model {
        body["model"] = Value::String(config.chat_model.clone());
    }

    let resp = req
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .json(&body)
        .send()
        .await
        .with_context(|| format!("Failed to call {} chat API", config.provider))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{} chat API returned {status}: {body}", config.provider);
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .with_context(|| format!("Failed to parse {} chat response", config.provider))?;
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("Chat response contained no message content")
}
