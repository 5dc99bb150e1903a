//! # Modelgen Core
//!
//! Core types and error handling for add-model.
//!
//! This crate provides the building blocks shared by the migration reader,
//! the artifact emitter and the command line:
//!
//! - **Types**: the closed `DataType` table and its TypeScript mapping
//! - **Errors**: unified error handling with `ScaffoldError` and `ScaffoldResult`
//!

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ErrorKind, ResultExt, ScaffoldError, ScaffoldResult};
pub use types::{DataType, TsType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
