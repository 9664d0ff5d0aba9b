#![deny(missing_docs)]

//! Core library for the docsum document summarization server.

/// HTTP routing and the summarize handler.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF and Word text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization pipeline orchestration.
pub mod processing;
/// Prompt templates for the summary request.
pub mod prompt;
/// Chat-completion provider client.
pub mod summarization;
