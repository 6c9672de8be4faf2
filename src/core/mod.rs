// Public modules
pub mod defaults;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod paths;
pub mod render;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
