//! Error types for the Mailchimp client.

use thiserror::Error;

/// Result type for Mailchimp client operations.
pub type Result<T> = std::result::Result<T, MailchimpError>;

#[derive(Debug, Error)]
pub enum MailchimpError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` carries the response body
    #[error("Mailchimp API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
