//! # Modelgen IR
//!
//! The migration reader for add-model. It turns the text of a Sequelize
//! migration into the model the emitter renders from.
//!
//! ## Core Concepts
//!
//! - **NameForms**: the naming variants of the table (`orders` → `order`,
//!   `Order`, `Orders`)
//! - **ColumnSpec**: the ordered columns with their mapped types
//! - **Value**: the parsed column block, produced by a structured-literal
//!   parser instead of evaluating the migration
//! - **MigrationModel**: all of the above for one migration
//!

// Module declarations
pub mod column;
pub mod literal;
pub mod migration;
pub mod names;

// Re-export commonly used types at crate root
pub use column::{Column, ColumnSpec, RESERVED_COLUMNS};
pub use literal::{Expr, Value, parse_literal, parse_literal_at, render_literal};
pub use migration::{
    MigrationModel, TABLE_CLOSE, TABLE_OPEN, parse_migration, read_migration, resolve_migration,
};
pub use names::{NameForms, column_identifier, singularize, uncapitalize};

// Re-export core types that are commonly used with IR
pub use modelgen_core::{DataType, ScaffoldError, ScaffoldResult, TsType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
