//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod audit;
pub mod deps;
pub mod http;
pub mod process;
pub mod test_dependencies;
pub mod traits;

pub use ai::{OpenAIAdapter, GPT_4O_MINI};
pub use audit::{log_extraction, log_generation, NoopAuditLog, PostgresAuditLog};
pub use deps::ServerDeps;
pub use http::ReqwestHttpClient;
pub use process::TokioProcessRunner;
pub use test_dependencies::{
    MockAI, MockHttpClient, MockProcessRunner, SpyAuditLog, TestDependencies,
};
pub use traits::*;
