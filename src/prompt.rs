//! Prompt assembly for the four-tier summary request.

/// Placeholder replaced by the document text in a prompt template.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// System message sent ahead of every summarization prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant that summarizes documents. \
Your task is to summarize the given document in four formats.";

/// Built-in user prompt. The model is asked for a JSON object with exactly four keys.
pub const DEFAULT_TEMPLATE: &str = r#"Summarize the following text into key points and return a structured JSON response.

Provide four distinct summaries:

1. **Short Version** (30-50 words)
2. **Detailed Version** (100-200 words)
3. **Technical Version** (if applicable): (Keep domain-specific terms)
4. **Layman Version** (simplify complex ideas)

Return the response strictly in this JSON format:
{
    "short_version": "...",
    "detailed_version": "...",
    "technical_version": "...",
    "layman_version": "..."
}

Here is the text to summarize:
{text}
"#;

/// User prompt template with a `{text}` slot.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Wrap a custom template. Callers validate the placeholder at configuration time.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Embed `text` verbatim into the template. No escaping is applied.
    pub fn build_prompt(&self, text: &str) -> String {
        self.template.replace(TEXT_PLACEHOLDER, text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// Build a prompt from the built-in template.
pub fn build_prompt(text: &str) -> String {
    PromptTemplate::default().build_prompt(text)
}
