//! Tool seam for the completion loop.
//!
//! A tool is a named capability with a JSON-schema parameter description.
//! `execute` is infallible by contract: failures come back as error-shaped
//! strings so the completion loop can continue and the model can react.

use async_trait::async_trait;
use std::sync::Arc;

/// A named capability the model may invoke during a completion.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> serde_json::Value;
    /// Runs the tool. Errors must be returned as descriptive strings, not
    /// propagated; the result is appended to the model's context verbatim.
    async fn execute(&self, arguments: serde_json::Value) -> String;
}

/// Resolves and runs one tool call. Unknown tools and malformed argument
/// JSON become error strings, keeping the loop alive.
pub async fn run_tool_call(tools: &[Arc<dyn Tool>], name: &str, raw_arguments: &str) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == name) else {
        return format!("Error: unknown tool `{}`", name);
    };
    let arguments: serde_json::Value = if raw_arguments.trim().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_str(raw_arguments) {
            Ok(v) => v,
            Err(e) => return format!("Error: invalid arguments for `{}`: {}", name, e),
        }
    };
    tool.execute(arguments).await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes the text argument"
        }
        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> String {
            arguments["text"].as_str().unwrap_or("").to_string()
        }
    }

    #[tokio::test]
    async fn runs_known_tool() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(Echo)];
        let out = run_tool_call(&tools, "echo", r#"{"text":"hi"}"#).await;
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_json_become_error_strings() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(Echo)];
        assert!(run_tool_call(&tools, "nope", "{}").await.starts_with("Error: unknown tool"));
        assert!(run_tool_call(&tools, "echo", "{not json").await.starts_with("Error: invalid arguments"));
    }

    #[tokio::test]
    async fn empty_arguments_default_to_empty_object() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(Echo)];
        assert_eq!(run_tool_call(&tools, "echo", "  ").await, "");
    }
}
