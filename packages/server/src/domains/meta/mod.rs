//! Meta domain - AI-generated SEO titles and descriptions.

pub mod error;
pub mod generator;

pub use error::MetaError;
pub use generator::{generate_meta, GeneratedMeta, InputType, MetaRequest};
