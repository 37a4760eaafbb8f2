//! Extraction domain - resolve a TikTok or Instagram post URL to a direct
//! media URL.
//!
//! # Components
//!
//! - `strategy`: the `Extractor` trait and the ordered `ExtractionChain`
//! - `activities`: individual strategies (third-party APIs, Open Graph tags,
//!   raw-HTML regexes, Instagram reel/carousel page parsers)
//! - `actions`: per-platform chain assembly and the public entry points
//!
//! Strategies are tried sequentially; the first success wins and is
//! written to the audit log. Strategy failures are logged, never returned.

pub mod actions;
pub mod activities;
pub mod error;
pub mod headers;
pub mod request;
pub mod strategy;

pub use actions::{extract_from_input, extract_media, fetch_reel, reel_request};
pub use error::ExtractError;
pub use request::ExtractionRequest;
pub use strategy::{ExtractionChain, Extractor};
