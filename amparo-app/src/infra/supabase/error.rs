//! Provider error bodies to [`ProviderError`].
//!
//! GoTrue answers with `error_description`, `msg` or `message` depending on
//! the endpoint and version; PostgREST with `message` plus a SQLSTATE `code`.

use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::infra::services::ProviderError;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    code: Option<String>,
}

/// GoTrue sends `code` as the HTTP status number, PostgREST as a string.
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(code)) => Some(code),
        Some(serde_json::Value::Number(code)) => Some(code.to_string()),
        _ => None,
    })
}

pub async fn from_response(response: Response) -> ProviderError {
    let status = response.status();
    match response.text().await {
        Ok(body) => from_body(status, &body),
        Err(err) => ProviderError::Network(err.to_string()),
    }
}

pub fn from_body(status: StatusCode, body: &str) -> ProviderError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = [
        parsed.error_description,
        parsed.msg,
        parsed.message,
        parsed.error.clone(),
    ]
    .into_iter()
    .flatten()
    .map(|text| text.trim().to_string())
    .find(|text| !text.is_empty())
    .or_else(|| {
        let raw = body.trim();
        (!raw.is_empty() && !raw.starts_with('{')).then(|| raw.to_string())
    })
    .unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Erro desconhecido")
            .to_string()
    });

    ProviderError::Rejected {
        status: status.as_u16(),
        code: parsed.error_code.or(parsed.error).or(parsed.code),
        message,
    }
}

pub fn network(err: reqwest::Error) -> ProviderError {
    ProviderError::Network(err.to_string())
}

pub fn decode(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Decode(err.to_string())
}
