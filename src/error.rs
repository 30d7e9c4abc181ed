//! Errors that abort a run.

use crate::resolver::{conf::ConfError, ExchangeError};

/// Errors encountered while resolving and rendering services.
///
/// Every variant is fatal; the message names the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The nameserver to query could not be determined.
    #[error("Error reading resolver configuration: {0}")]
    Conf(#[from] ConfError),
    /// A DNS exchange failed.
    #[error("DNS error: {0}")]
    Dns(#[from] ExchangeError),
    /// A query returned no SRV records and empty results were not allowed.
    #[error("{0}: No SRV records returned")]
    NoRecords(String),
    /// The template could not be read.
    #[error("Error loading template: {0}")]
    TemplateLoad(#[source] std::io::Error),
    /// The template could not be compiled.
    #[error("Error parsing template: {0}")]
    TemplateParse(#[source] minijinja::Error),
    /// The template failed while rendering.
    #[error("Error rendering template: {0}")]
    TemplateRender(#[source] minijinja::Error),
    /// Records could not be serialized as JSON.
    #[error("Error encoding JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Rendered output could not be written.
    #[error("Error writing output: {0}")]
    Output(#[source] std::io::Error),
}
