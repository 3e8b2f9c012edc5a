pub mod audience;
pub mod campaigns;
pub mod committees;
pub mod mapping;
pub mod provisioning;
