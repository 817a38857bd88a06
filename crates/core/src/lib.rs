//! CarryIT core types and utilities

pub mod config;
pub mod error;
pub mod storage;
pub mod token;
pub mod types;

#[cfg(feature = "tracing")]
pub mod logging;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use config::ClientConfig;
pub use error::{CoreError, CoreResult};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{SignInView, UserProfile, UserRole};
