// Common types and utilities shared across domains

pub mod pagination;

pub use pagination::*;
