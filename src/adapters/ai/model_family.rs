//! Payload shapes for the model families Bedrock hosts.
//!
//! Each family has its own request body and reply envelope. The family is
//! picked once from the configured model identifier.

use serde_json::{json, Value};

use crate::ports::{AIError, CompletionRequest};

const ANTHROPIC_BEDROCK_VERSION: &str = "bedrock-2023-05-31";
const SAMPLING_TEMPERATURE: f64 = 0.3;
const TITAN_TOP_P: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Anthropic Claude (messages API).
    Claude,
    /// Amazon Titan text models.
    Titan,
    /// Anything else (Meta Llama, Mistral, ...), prompt-completion style.
    Generic,
}

impl ModelFamily {
    /// Ordered, case-sensitive substring match on the model identifier.
    pub fn from_model_id(model_id: &str) -> Self {
        if model_id.contains("anthropic") || model_id.contains("claude") {
            ModelFamily::Claude
        } else if model_id.contains("titan") {
            ModelFamily::Titan
        } else {
            ModelFamily::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Claude => "claude",
            ModelFamily::Titan => "titan",
            ModelFamily::Generic => "generic",
        }
    }

    /// Builds the InvokeModel body for this family.
    pub fn build_payload(&self, request: &CompletionRequest, max_tokens: u32) -> Value {
        let system = &request.system_prompt;
        let user = &request.user_message;

        match self {
            ModelFamily::Claude => json!({
                "anthropic_version": ANTHROPIC_BEDROCK_VERSION,
                "max_tokens": max_tokens,
                "system": system,
                "messages": [{"role": "user", "content": user}],
            }),
            ModelFamily::Titan => json!({
                "inputText": format!("{system}\n\nUser: {user}"),
                "textGenerationConfig": {
                    "maxTokenCount": max_tokens,
                    "temperature": SAMPLING_TEMPERATURE,
                    "topP": TITAN_TOP_P,
                },
            }),
            ModelFamily::Generic => json!({
                "prompt": format!("{system}\n\nUser: {user}\n\nAssistant:"),
                "max_gen_len": max_tokens,
                "temperature": SAMPLING_TEMPERATURE,
            }),
        }
    }

    /// Pulls the reply text out of this family's response envelope.
    pub fn extract_text(&self, reply: &Value) -> Result<String, AIError> {
        match self {
            ModelFamily::Claude => reply
                .pointer("/content/0/text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| AIError::parse("Claude reply has no content[0].text")),
            ModelFamily::Titan => reply
                .pointer("/results/0/outputText")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| AIError::parse("Titan reply has no results[0].outputText")),
            ModelFamily::Generic => Ok(["generation", "output"]
                .iter()
                .filter_map(|field| reply.get(*field).and_then(Value::as_str))
                .find(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| reply.to_string())),
        }
    }
}
