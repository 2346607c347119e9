use async_trait::async_trait;
use motify_core::AppResult;
use motify_domain::TaskSuggestion;

/// Port for the upstream task-generation provider.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    /// Generates a list of task suggestions for a free-form prompt.
    async fn generate_tasks(&self, prompt: &str) -> AppResult<Vec<TaskSuggestion>>;
}
