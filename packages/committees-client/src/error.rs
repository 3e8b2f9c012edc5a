use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommitteesError>;

#[derive(Debug, Error)]
pub enum CommitteesError {
    /// Transport failure (connection refused, DNS, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the committees API
    #[error("committees API error ({status}): {message}")]
    Api { status: u16, message: String },
}
