//! Request body extractors for the relay endpoints.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::application::handlers::ai::{AnalysisError, AnalyzeDocumentCommand, UploadedFile};
use crate::ports::AnalyzeTextRequest;

use super::super::error::RelayError;
use super::handlers::RelayAppState;

/// A JSON body read the way the browser client expects.
///
/// A request without a JSON content type, an empty body, or a JSON value of
/// the wrong shape reads as `{}`, so the handler's own validation decides the
/// response. Only unparsable JSON is rejected here, with a 400.
pub struct RelayJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for RelayJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(&req) {
            return empty_body().map(RelayJson);
        }
        let bytes = Bytes::from_request(req, state).await?;
        parse_body(&bytes).map(RelayJson)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RelayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return empty_body();
    }
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| RelayError::bad_request(format!("Invalid JSON body: {}", err)))?;
    serde_json::from_value(value).or_else(|_| empty_body())
}

fn empty_body<T: DeserializeOwned>() -> Result<T, RelayError> {
    serde_json::from_value(Value::Object(Map::new()))
        .map_err(|err| RelayError::bad_request(err.to_string()))
}

/// The body of `analyze-document`: a multipart upload or a JSON text body.
pub struct DocumentUpload(pub AnalyzeDocumentCommand);

#[async_trait]
impl FromRequest<RelayAppState> for DocumentUpload {
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &RelayAppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let body = if is_json(&req) {
                let bytes = Bytes::from_request(req, state).await?;
                if bytes.len() > state.json_body_limit_bytes {
                    return Err(RelayError::payload_too_large());
                }
                parse_body::<AnalyzeTextRequest>(&bytes)?
            } else {
                empty_body::<AnalyzeTextRequest>()?
            };
            return Ok(DocumentUpload(AnalyzeDocumentCommand {
                file: None,
                text: body.text,
                file_name: body.file_name,
            }));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| RelayError::new(rejection.status(), rejection.body_text()))?;

        let mut command = AnalyzeDocumentCommand::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("file") => {
                    let file_name = field.file_name().unwrap_or("document").to_string();
                    let bytes = field.bytes().await?;
                    if bytes.len() > state.upload_limit_bytes {
                        return Err(AnalysisError::UploadTooLarge {
                            limit_bytes: state.upload_limit_bytes,
                        }
                        .into());
                    }
                    command.file = Some(UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                Some("text") => command.text = Some(field.text().await?),
                Some("fileName") => command.file_name = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(DocumentUpload(command))
    }
}

fn content_type(req: &Request) -> Option<&str> {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

fn is_multipart(req: &Request) -> bool {
    content_type(req).is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn is_json(req: &Request) -> bool {
    content_type(req).is_some_and(|value| {
        let essence = value.split(';').next().unwrap_or_default().trim();
        essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
    })
}
