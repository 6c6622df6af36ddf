//! OpenAI-compatible implementation of [`ChatClient`].
//!
//! One `stream_chat` call may span several completion requests: when the
//! model finishes a step by requesting tools, the calls are executed and
//! their string results appended to the conversation, then the next step
//! streams. The step count is bounded by `max_steps`.

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::accumulate::{ToolCallAccumulator, ToolInvocation};
use crate::tool::{run_tool_call, Tool};
use crate::{ChatClient, ChatMessage, LlmError, Role, StreamEvent};

/// Chat client over an OpenAI-compatible API (OpenRouter, OpenAI, ...).
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    max_steps: u32,
}

impl OpenAiChatClient {
    /// Creates a client for the given endpoint and model.
    pub fn new(api_key: String, base_url: String, model: String, max_steps: u32) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
            max_steps: max_steps.max(1),
        }
    }

    fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
        let converted = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.clone())
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.clone())
                .build()?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.clone())
                .build()?
                .into(),
        };
        Ok(converted)
    }

    fn tool_definitions(tools: &[Arc<dyn Tool>]) -> Result<Vec<ChatCompletionTool>, LlmError> {
        tools
            .iter()
            .map(|tool| {
                let function = FunctionObjectArgs::default()
                    .name(tool.name())
                    .description(tool.description())
                    .parameters(tool.parameters())
                    .build()?;
                Ok(ChatCompletionToolArgs::default()
                    .r#type(ChatCompletionToolType::Function)
                    .function(function)
                    .build()?)
            })
            .collect()
    }

    fn assistant_step_message(
        step_text: &str,
        calls: &[ToolInvocation],
    ) -> Result<ChatCompletionRequestMessage, LlmError> {
        let tool_calls: Vec<ChatCompletionMessageToolCall> = calls
            .iter()
            .map(|call| ChatCompletionMessageToolCall {
                id: call.id.clone(),
                r#type: ChatCompletionToolType::Function,
                function: FunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            })
            .collect();

        let mut args = ChatCompletionRequestAssistantMessageArgs::default();
        args.tool_calls(tool_calls);
        if !step_text.is_empty() {
            args.content(step_text.to_string());
        }
        Ok(args.build()?.into())
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: &[Arc<dyn Tool>],
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<String, LlmError> {
        let mut request_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<_, _>>()?;
        let tool_definitions = Self::tool_definitions(tools)?;

        let mut full_text = String::new();

        for step in 0..self.max_steps {
            let mut builder = CreateChatCompletionRequestArgs::default();
            builder
                .model(self.model.as_str())
                .messages(request_messages.clone());
            if !tool_definitions.is_empty() {
                builder.tools(tool_definitions.clone());
            }
            let request = builder.build()?;

            debug!(step, model = %self.model, messages = request_messages.len(), "opening completion stream");
            let mut stream = self.client.chat().create_stream(request).await?;

            let mut accumulator = ToolCallAccumulator::new();
            let mut step_text = String::new();

            while let Some(item) = stream.next().await {
                let chunk = item?;
                let Some(choice) = chunk.choices.first() else {
                    continue;
                };
                if let Some(content) = &choice.delta.content {
                    step_text.push_str(content);
                    full_text.push_str(content);
                    on_event(StreamEvent::TextDelta(content.to_string()));
                }
                if let Some(chunks) = &choice.delta.tool_calls {
                    for call in chunks {
                        accumulator.apply(
                            call.index as u32,
                            call.id.as_deref(),
                            call.function.as_ref().and_then(|f| f.name.as_deref()),
                            call.function.as_ref().and_then(|f| f.arguments.as_deref()),
                        );
                        on_event(StreamEvent::ToolCallDelta);
                    }
                }
            }

            let calls = accumulator.finish();
            if calls.is_empty() {
                break;
            }

            request_messages.push(Self::assistant_step_message(&step_text, &calls)?);
            for call in calls {
                info!(tool = %call.name, arguments = %call.arguments, "executing tool call");
                on_event(StreamEvent::ToolCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });
                let result = run_tool_call(tools, &call.name, &call.arguments).await;
                debug!(tool = %call.name, result_len = result.len(), "tool call finished");
                request_messages.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .content(result)
                        .tool_call_id(call.id)
                        .build()?
                        .into(),
                );
            }

            if step + 1 == self.max_steps {
                warn!(max_steps = self.max_steps, "tool loop hit step limit; returning accumulated text");
            }
        }

        Ok(full_text)
    }
}
