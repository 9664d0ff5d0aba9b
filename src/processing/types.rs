//! Request-scoped data and error definitions for the summarization pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The upload could not be turned into text.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    ExtractionTask(#[from] tokio::task::JoinError),
    /// The provider call failed.
    #[error("{0}")]
    Summarization(#[from] SummarizationClientError),
    /// The provider replied with something other than the expected JSON object.
    #[error("Provider returned malformed summary JSON: {0}")]
    MalformedSummary(#[from] serde_json::Error),
}

impl ProcessingError {
    /// True when the request was rejected for its format rather than failing downstream.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::Extraction(ExtractionError::UnsupportedFormat))
    }
}

/// A single uploaded file, owned by the request that received it.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Content type declared by the client, if any.
    pub content_type: Option<String>,
    /// Filename declared by the client, if any.
    pub filename: Option<String>,
}

/// Four-tier summary returned to the caller.
///
/// The model reply is passed through as-is: each variant keeps whatever JSON value the model
/// produced (a string normally, but `null` or a list of points are accepted), and any extra
/// keys are carried in `extra`. A key the model omitted stays absent in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// 30–50 word overview.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub short_version: Option<Value>,
    /// 100–200 word summary.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub detailed_version: Option<Value>,
    /// Summary that keeps domain-specific terminology.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub technical_version: Option<Value>,
    /// Plain-language summary.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub layman_version: Option<Value>,
    /// Keys beyond the four variants.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummaryResult {
    /// Parse the provider's raw reply. Anything other than a JSON object is rejected.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// A present key maps to `Some`, including an explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_provider_json() {
        let summary = SummaryResult::from_json(
            r#"{"short_version":"a","detailed_version":"b","technical_version":"c","layman_version":"d"}"#,
        )
        .expect("summary");
        assert_eq!(summary.short_version, Some(json!("a")));
        assert_eq!(summary.layman_version, Some(json!("d")));
        assert!(summary.extra.is_empty());
    }

    #[test]
    fn null_and_list_variants_are_kept() {
        let raw = json!({
            "short_version": "a",
            "detailed_version": ["p1", "p2"],
            "technical_version": null,
            "layman_version": "d"
        });
        let summary = SummaryResult::from_json(&raw.to_string()).expect("summary");
        assert_eq!(summary.technical_version, Some(Value::Null));
        assert_eq!(summary.detailed_version, Some(json!(["p1", "p2"])));
        assert_eq!(serde_json::to_value(&summary).expect("serialize"), raw);
    }

    #[test]
    fn extra_and_missing_keys_pass_through() {
        let raw = json!({ "short_version": "a", "key_points": ["x"] });
        let summary = SummaryResult::from_json(&raw.to_string()).expect("summary");
        assert_eq!(summary.detailed_version, None);
        assert_eq!(summary.extra.get("key_points"), Some(&json!(["x"])));
        assert_eq!(serde_json::to_value(&summary).expect("serialize"), raw);
    }

    #[test]
    fn non_object_reply_is_an_error() {
        assert!(SummaryResult::from_json("Here is your summary!").is_err());
        assert!(SummaryResult::from_json(r#"["a", "b"]"#).is_err());
    }

    #[test]
    fn only_unsupported_format_is_flagged() {
        assert!(ProcessingError::Extraction(ExtractionError::UnsupportedFormat)
            .is_unsupported_format());
        let malformed = SummaryResult::from_json("nope").expect_err("malformed");
        assert!(!ProcessingError::MalformedSummary(malformed).is_unsupported_format());
    }
}
