// MediaForge - API Core
//
// Resolves TikTok and Instagram post URLs to direct media links through an
// ordered chain of extraction strategies, proxies downloads, and generates
// SEO meta tags.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
