pub mod extract_media;
pub mod fetch_reel;

pub use extract_media::{extract_from_input, extract_media, failure_message};
pub use fetch_reel::{fetch_reel, reel_request};
