//! Assembles streamed tool-call fragments into complete invocations.
//!
//! Providers stream tool calls as per-index chunks: the id and name arrive
//! once, the JSON arguments arrive as string fragments. The accumulator is
//! transport-agnostic so it can be tested without a live stream.

use std::collections::BTreeMap;

/// A fully assembled tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Default)]
struct PendingCall {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

/// Collects tool-call chunks keyed by stream index.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u32, PendingCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Applies one chunk: id/name are set once, argument fragments append.
    pub fn apply(&mut self, index: u32, id: Option<&str>, name: Option<&str>, arguments: Option<&str>) {
        let call = self.calls.entry(index).or_default();
        if let Some(id) = id {
            call.id.get_or_insert_with(|| id.to_string());
        }
        if let Some(name) = name {
            call.name.get_or_insert_with(|| name.to_string());
        }
        if let Some(fragment) = arguments {
            call.arguments.push_str(fragment);
        }
    }

    /// Returns assembled calls in stream order. Calls that never received a
    /// name are dropped; a missing id gets a synthetic `call_{index}` so the
    /// tool-result message can still reference it.
    pub fn finish(self) -> Vec<ToolInvocation> {
        self.calls
            .into_iter()
            .filter_map(|(index, call)| {
                let name = call.name?;
                Some(ToolInvocation {
                    id: call.id.unwrap_or_else(|| format!("call_{}", index)),
                    name,
                    arguments: call.arguments,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_fragmented_arguments_in_order() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(0, Some("a1"), Some("weather"), Some("{\"loc"));
        acc.apply(0, None, None, Some("ation\":\"Tokyo\"}"));
        acc.apply(1, Some("a2"), Some("remember"), Some("{}"));

        let calls = acc.finish();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "weather");
        assert_eq!(calls[0].arguments, "{\"location\":\"Tokyo\"}");
        assert_eq!(calls[1].name, "remember");
    }

    #[test]
    fn missing_id_gets_synthetic_one_and_nameless_calls_drop() {
        let mut acc = ToolCallAccumulator::new();
        acc.apply(0, None, Some("search"), Some("{}"));
        acc.apply(3, None, None, Some("{\"orphan\":true}"));

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_0");
        assert_eq!(calls[0].name, "search");
    }

    #[test]
    fn empty_accumulator_finishes_empty() {
        assert!(ToolCallAccumulator::new().finish().is_empty());
    }
}
