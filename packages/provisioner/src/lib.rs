// Committee Sync - Provisioning Core
//
// Discovers committees upstream and gives each one an interest and a campaign
// on the mailing-list platform, exactly once. The mapping ledger on disk is the
// record of what has already been provisioned.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
