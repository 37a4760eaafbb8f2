// Common types and helpers shared across the application

pub mod text;
pub mod types;

pub use types::*;
