//! Summary service coordinating extraction, prompt assembly and the provider call.

use crate::{
    config::Config,
    extraction,
    processing::types::{ProcessingError, SummaryResult, UploadedDocument},
    prompt::PromptTemplate,
    summarization::{OpenAiSummarizationClient, SummarizationClient, SummarizationClientError},
};
use async_trait::async_trait;

/// Runs the linear pipeline: extract text, build the prompt, call the provider, parse JSON.
///
/// The service holds only read-only handles (the provider client and the prompt template), so
/// one instance is built at startup and shared through an `Arc` by every request.
pub struct SummaryService {
    client: Box<dyn SummarizationClient>,
    template: PromptTemplate,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Summarize one uploaded document.
    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryResult, ProcessingError>;
}

impl SummaryService {
    /// Assemble a service from an explicit client and template.
    pub fn new(client: Box<dyn SummarizationClient>, template: PromptTemplate) -> Self {
        Self { client, template }
    }

    /// Build the production service: OpenAI-compatible client plus the configured template.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        tracing::info!(model = %config.openai_model, "Initializing summarization client");
        let client = OpenAiSummarizationClient::new(config)?;
        let template = config
            .prompt_template
            .as_deref()
            .map(PromptTemplate::new)
            .unwrap_or_default();
        Ok(Self::new(Box::new(client), template))
    }
}

#[async_trait]
impl SummarizeApi for SummaryService {
    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryResult, ProcessingError> {
        let UploadedDocument {
            bytes,
            content_type,
            filename,
        } = document;

        let text = tokio::task::spawn_blocking(move || {
            extraction::extract(&bytes, content_type.as_deref(), filename.as_deref())
        })
        .await??;
        tracing::debug!(chars = text.len(), "Document text extracted");

        let prompt = self.template.build_prompt(&text);
        let raw = self.client.summarize_text(&prompt).await?;
        tracing::debug!(chars = raw.len(), "Provider reply received");

        Ok(SummaryResult::from_json(&raw)?)
    }
}
