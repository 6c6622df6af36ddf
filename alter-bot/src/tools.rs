//! LLM tools exposed to the completion loop.

use async_trait::async_trait;
use chat_memory::MemoryStore;
use llm_client::Tool;
use std::sync::Arc;

/// `remember` tool: stores a short note into the current user's long-term
/// memory. Bound to one user for the duration of a turn.
pub struct RememberTool {
    memory: Arc<MemoryStore>,
    user_id: i64,
}

impl RememberTool {
    pub fn new(memory: Arc<MemoryStore>, user_id: i64) -> Self {
        Self { memory, user_id }
    }
}

#[async_trait]
impl Tool for RememberTool {
    fn name(&self) -> &str {
        "remember"
    }

    fn description(&self) -> &str {
        "store a piece of information into long-term memory"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "the information to be remembered"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> String {
        let Some(text) = arguments.get("text").and_then(|t| t.as_str()) else {
            return "Error: the `text` argument is required".to_string();
        };
        self.memory.remember(self.user_id, text);
        "Got it! I've remembered.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_memory::DEFAULT_MEMORY_CAPACITY;

    #[tokio::test]
    async fn remember_tool_appends_to_the_bound_user() {
        let memory = Arc::new(MemoryStore::new(DEFAULT_MEMORY_CAPACITY));
        let tool = RememberTool::new(memory.clone(), 7);

        let ack = tool.execute(serde_json::json!({ "text": "likes tea" })).await;
        assert_eq!(ack, "Got it! I've remembered.");
        assert_eq!(memory.memories(7), vec!["likes tea".to_string()]);
        assert!(memory.memories(8).is_empty());
    }

    #[tokio::test]
    async fn missing_text_becomes_an_error_string() {
        let memory = Arc::new(MemoryStore::new(DEFAULT_MEMORY_CAPACITY));
        let tool = RememberTool::new(memory.clone(), 7);

        let out = tool.execute(serde_json::json!({})).await;
        assert!(out.starts_with("Error:"));
        assert!(memory.memories(7).is_empty());
    }
}
