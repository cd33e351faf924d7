use anyhow::{anyhow, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use serde::{Deserialize, Serialize};
use std::env;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Provider {
    OpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIModel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIModelsResponse {
    data: Vec<OpenAIModel>,
}

pub struct LLMProvider {
    provider: Provider,
    model_name: String,
}

impl LLMProvider {
    /// Resolves the provider from the saved configuration, falling back to an
    /// interactive selection (which is then persisted).
    pub async fn new() -> Result<Self> {
        if let Some(config) = Config::load()? {
            return Ok(Self {
                provider: config.provider,
                model_name: config.model_name,
            });
        }

        let provider = Self::new_interactive().await?;
        Config {
            provider: provider.provider.clone(),
            model_name: provider.model_name.clone(),
        }
        .save()?;

        Ok(provider)
    }

    pub async fn new_interactive() -> Result<Self> {
        let provider = Provider::OpenAI;
        let model_name = Self::select_model(&provider).await?;

        Ok(Self {
            provider,
            model_name,
        })
    }

    async fn select_model(provider: &Provider) -> Result<String> {
        let models = Self::list_models(provider).await?;

        if models.is_empty() {
            return Err(anyhow!("No models available for {:?}", provider));
        }

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select Model")
            .items(&models)
            .interact()?;

        Ok(models[selection].clone())
    }

    async fn list_models(provider: &Provider) -> Result<Vec<String>> {
        match provider {
            Provider::OpenAI => Self::list_openai_models().await,
        }
    }

    async fn list_openai_models() -> Result<Vec<String>> {
        let api_key = Self::api_key()?;

        let client = reqwest::Client::new();
        let response = client
            .get("https://api.openai.com/v1/models")
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await?;

        let models: OpenAIModelsResponse = response.json().await?;

        let mut model_names: Vec<String> = models
            .data
            .iter()
            .filter(|m| m.id.contains("gpt"))
            .map(|m| m.id.clone())
            .collect();

        model_names.sort();
        model_names.dedup();

        if model_names.is_empty() {
            model_names = vec!["gpt-5".to_string(), "gpt-5-mini".to_string()];
        }

        Ok(model_names)
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY").map_err(|_| anyhow!("OPENAI_API_KEY not set"))
    }

    pub fn get_model_name(&self) -> &str {
        &self.model_name
    }

    pub fn get_provider(&self) -> &Provider {
        &self.provider
    }
}
