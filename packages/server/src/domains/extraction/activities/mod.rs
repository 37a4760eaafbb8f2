//! Extraction strategies.

pub mod api_clients;
pub mod html_patterns;
pub mod instagram;
pub mod meta_tags;
pub mod ytdlp;

pub use html_patterns::HtmlPatternExtractor;
pub use meta_tags::{MetaTagExtractor, OpenGraph};
pub use ytdlp::YtDlpExtractor;
