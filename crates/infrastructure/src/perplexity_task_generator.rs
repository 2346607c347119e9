//! Chat-completion client used by the task-generation proxy.

use async_trait::async_trait;
use motify_application::TaskGenerator;
use motify_core::{AppError, AppResult};
use motify_domain::TaskSuggestion;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

/// Default upstream chat-completion endpoint.
pub const DEFAULT_PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// Default model requested from the upstream provider.
pub const DEFAULT_PERPLEXITY_MODEL: &str = "sonar";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TasksEnvelope {
    tasks: Vec<TaskSuggestion>,
}

/// Perplexity-backed implementation of the task-generation port.
///
/// Forwards the prompt with a fixed structured-output schema and reshapes
/// the first choice's JSON content into task suggestions. Single request,
/// no retries.
pub struct PerplexityTaskGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl PerplexityTaskGenerator {
    /// Creates a task generator against the given provider base URL.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tasks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "week_estimate": { "type": "integer" },
                            "day_estimate": { "type": "integer" },
                            "acceptance_criteria": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        },
                        "required": [
                            "title",
                            "description",
                            "week_estimate",
                            "day_estimate",
                            "acceptance_criteria"
                        ]
                    }
                }
            },
            "required": ["tasks"]
        })
    }

    /// Parses the structured content returned by the provider.
    ///
    /// Accepts either the requested `{"tasks": [...]}` envelope or a bare
    /// task array, which some models emit despite the schema.
    fn parse_task_content(content: &str) -> AppResult<Vec<TaskSuggestion>> {
        if let Ok(envelope) = serde_json::from_str::<TasksEnvelope>(content) {
            return Ok(envelope.tasks);
        }

        serde_json::from_str::<Vec<TaskSuggestion>>(content).map_err(|error| {
            AppError::Internal(format!(
                "task generation returned unparseable content: {error}"
            ))
        })
    }
}

#[async_trait]
impl TaskGenerator for PerplexityTaskGenerator {
    async fn generate_tasks(&self, prompt: &str) -> AppResult<Vec<TaskSuggestion>> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "schema": Self::response_schema() }
            }
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call task generation provider: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Internal(format!(
                "task generation provider returned status {}: {body}",
                status.as_u16()
            )));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to parse task generation response: {error}"))
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Internal("task generation response contained no choices".to_owned())
            })?;

        let tasks = Self::parse_task_content(&content)?;
        debug!(task_count = tasks.len(), "task generation succeeded");
        Ok(tasks)
    }
}
