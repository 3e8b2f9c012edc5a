//! Kernel module - infrastructure seams and dependencies.

pub mod deps;
pub mod sources;
pub mod test_dependencies;
pub mod traits;

pub use deps::{MailchimpMailingList, SyncDeps};
pub use sources::{CommitteesSource, MailchimpSource};
pub use traits::*;
