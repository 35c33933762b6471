//! Recovery of a JSON document from free-text model output.
//!
//! Models wrap JSON in code fences or surround it with prose. Recovery runs a
//! strict stage on the fence-stripped text, then falls back to the greedy
//! span from the first `{` to the last `}`. It never fails: when neither
//! stage yields a `T`, the raw text is handed back as [`Recovered::Unparsed`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::schema::ReplySchema;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("code fence pattern is valid"));

static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));

static ARRAY_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern is valid"));

/// Outcome of JSON recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovered<T> {
    Parsed(T),
    Unparsed { raw_text: String },
}

impl<T> Recovered<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Recovered::Parsed(_))
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Recovered::Parsed(value) => Some(value),
            Recovered::Unparsed { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Recovered<U> {
        match self {
            Recovered::Parsed(value) => Recovered::Parsed(f(value)),
            Recovered::Unparsed { raw_text } => Recovered::Unparsed { raw_text },
        }
    }
}

impl<T: ReplySchema> Recovered<T> {
    /// Resolves to a value the relay can always return.
    pub fn into_reply(self) -> StructuredReply<T> {
        match self {
            Recovered::Parsed(value) => StructuredReply {
                value: value.normalize(),
                raw_text: None,
            },
            Recovered::Unparsed { raw_text } => StructuredReply {
                value: T::unparsed(&raw_text),
                raw_text: Some(raw_text),
            },
        }
    }
}

/// A schema value plus the raw reply when it had to be synthesised.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredReply<T> {
    pub value: T,
    pub raw_text: Option<String>,
}

impl<T> StructuredReply<T> {
    pub fn is_structured(&self) -> bool {
        self.raw_text.is_none()
    }
}

/// Removes code-fence markers and trims.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// Recovers a `T` from a model reply.
pub fn recover<T: DeserializeOwned>(raw: &str) -> Recovered<T> {
    let cleaned = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str::<T>(&cleaned) {
        return Recovered::Parsed(value);
    }

    if let Some(span) = OBJECT_SPAN.find(&cleaned) {
        if let Ok(value) = serde_json::from_str::<T>(span.as_str()) {
            return Recovered::Parsed(value);
        }
    }

    tracing::debug!(reply_len = raw.len(), "model reply held no parsable JSON");
    Recovered::Unparsed {
        raw_text: raw.to_string(),
    }
}

/// Recovers a JSON array of `T` from a model reply.
///
/// Same stages as [`recover`], with the greedy span running from the first
/// `[` to the last `]`. Items that do not deserialize are dropped.
pub fn recover_list<T: DeserializeOwned>(raw: &str) -> Recovered<Vec<T>> {
    let cleaned = strip_code_fences(raw);

    let items = json_array(&cleaned).or_else(|| {
        ARRAY_SPAN
            .find(&cleaned)
            .and_then(|span| json_array(span.as_str()))
    });

    match items {
        Some(items) => Recovered::Parsed(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        None => {
            tracing::debug!(reply_len = raw.len(), "model reply held no JSON array");
            Recovered::Unparsed {
                raw_text: raw.to_string(),
            }
        }
    }
}

fn json_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Recovers an untyped JSON value.
pub fn recover_value(raw: &str) -> Recovered<Value> {
    recover::<Value>(raw)
}
