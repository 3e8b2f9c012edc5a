pub mod provisioner;

pub use provisioner::{ProvisionError, Provisioner};
