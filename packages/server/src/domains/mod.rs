// Business domains
pub mod download;
pub mod extraction;
pub mod meta;
