pub mod directory;
pub mod models;

pub use directory::{CommitteeDirectory, DirectoryFetchError};
pub use models::Committee;
