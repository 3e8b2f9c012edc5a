// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseMailingList)

use async_trait::async_trait;

use crate::common::BoxError;

/// Error returned by a remote write on the mailing-list platform.
pub type RemoteError = BoxError;

// =============================================================================
// Mailing List Trait (Infrastructure - interests, campaigns, sending)
// =============================================================================

#[async_trait]
pub trait BaseMailingList: Send + Sync {
    /// Create an interest (group option) for a committee; returns its id
    async fn create_interest(&self, name: &str) -> Result<String, RemoteError>;

    /// Create a campaign targeting members with the given interest; returns its id
    async fn create_campaign(&self, interest_id: &str, title: &str) -> Result<String, RemoteError>;

    /// Replace the campaign body with HTML
    async fn set_campaign_content(&self, campaign_id: &str, html: &str)
        -> Result<(), RemoteError>;

    async fn send_campaign(&self, campaign_id: &str) -> Result<(), RemoteError>;
}
