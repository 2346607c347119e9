use serde::{Deserialize, Serialize};

/// One task suggestion produced by the generation proxy.
///
/// Mirrors the structured-output schema requested from the upstream
/// chat-completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    /// Short task title.
    pub title: String,
    /// Longer task description.
    pub description: String,
    /// Estimated effort in weeks.
    pub week_estimate: u32,
    /// Estimated effort in days.
    pub day_estimate: u32,
    /// Conditions under which the task counts as done.
    pub acceptance_criteria: Vec<String>,
}
