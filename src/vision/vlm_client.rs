// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! VLM sidecar captioner via OpenAI-compatible API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::captioner::Captioner;
use super::image_utils::EncodedImage;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

const TITLE_PROMPT: &str = "Give a title to the item in the picture.";
const TITLE_MAX_TOKENS: u32 = 10;

const DESCRIPTION_PROMPT: &str = "Describe the object in detail, mention color and attributes";
const DESCRIPTION_MAX_TOKENS: u32 = 35;

pub const DEFAULT_VLM_TIMEOUT_SECS: u64 = 120;

/// Captioner backed by a VLM sidecar (llama.cpp server, vLLM, ...)
pub struct VlmCaptioner {
    client: Client,
    endpoint: String,
    model_name: String,
}

impl VlmCaptioner {
    pub fn new(endpoint: &str, model_name: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build VLM HTTP client")?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "VLM captioner configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the VLM sidecar is healthy
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("VLM health check failed: {}", e);
                false
            }
        }
    }

    async fn complete(&self, image: &EncodedImage, prompt: &str, max_tokens: u32) -> Result<String> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "image_url", "image_url": {"url": image.data_url()}},
                    {"type": "text", "text": prompt}
                ]),
            }],
            max_tokens,
            temperature: 0.2,
        };

        let chat_response: ChatResponse = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await
            .context("VLM request failed")?
            .error_for_status()
            .context("VLM returned an error status")?
            .json()
            .await
            .context("Failed to parse VLM response")?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        let tokens_used = chat_response.usage.map(|u| u.total_tokens).unwrap_or(0);

        debug!(
            "VLM completion: {} tokens in {}ms",
            tokens_used,
            start.elapsed().as_millis()
        );

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Captioner for VlmCaptioner {
    async fn title(&self, image: &EncodedImage) -> Result<String> {
        self.complete(image, TITLE_PROMPT, TITLE_MAX_TOKENS).await
    }

    async fn description(&self, image: &EncodedImage) -> Result<String> {
        self.complete(image, DESCRIPTION_PROMPT, DESCRIPTION_MAX_TOKENS)
            .await
    }
}
