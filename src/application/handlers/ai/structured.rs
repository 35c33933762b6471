//! Shared model round trip for tasks that expect a JSON reply.

use serde::de::DeserializeOwned;

use crate::domain::analysis::{recover, ModelPrompt, ReplySchema, StructuredReply};
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Sends `prompt` and recovers a `T` from the reply.
///
/// A reply that holds no usable JSON is not an error: it comes back as the
/// schema's unparsed form with the raw text attached.
pub(crate) async fn complete_structured<T>(
    provider: &dyn AIProvider,
    prompt: ModelPrompt,
) -> Result<StructuredReply<T>, AIError>
where
    T: DeserializeOwned + ReplySchema,
{
    let task = prompt.task_kind;
    let response = provider.complete(CompletionRequest::from(prompt)).await?;
    let recovered = recover::<T>(&response.content);

    if !recovered.is_parsed() {
        tracing::warn!(task = %task, "model reply held no parseable JSON");
    }

    Ok(recovered.into_reply())
}
