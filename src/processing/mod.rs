//! Summarization pipeline: extraction, prompt assembly and provider orchestration.

mod service;
pub mod types;

pub use service::{SummarizeApi, SummaryService};
pub use types::{ProcessingError, SummaryResult, UploadedDocument};
