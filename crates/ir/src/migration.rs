//! Migration reader
//!
//! Recovers the table name and the column block from the text of a
//! Sequelize migration:
//!
//! ```text
//! await queryInterface.createTable("orders", {
//!     id: { type: DataTypes.INTEGER, primaryKey: true },
//!     total: { type: DataTypes.DECIMAL(10, 2), allowNull: true },
//! })
//! ```
//!
//! The table name sits between [`TABLE_OPEN`] and [`TABLE_CLOSE`]; the
//! column block is the object literal opened by the brace of
//! [`TABLE_CLOSE`] and is read with the structured-literal parser.

use modelgen_core::{ScaffoldError, ScaffoldResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::column::ColumnSpec;
use crate::literal::{Value, parse_literal_at};
use crate::names::NameForms;

/// Opens the table-name literal
pub const TABLE_OPEN: &str = "(\"";

/// Closes the table-name literal and opens the column block
pub const TABLE_CLOSE: &str = "\", {";

/// Namespace given to bare type tags in the model definition
pub const DATA_TYPES: &str = "DataTypes";

// ============================================================================
// MigrationModel
// ============================================================================

/// Everything the emitter needs from one migration
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationModel {
    /// Names derived from the table literal
    pub names: NameForms,

    /// Declared columns
    pub columns: ColumnSpec,

    /// The column block with keys normalized to the column identifiers,
    /// as handed to the model's `init` call
    pub definition: Value,
}

/// Parse the text of a migration
pub fn parse_migration(text: &str) -> ScaffoldResult<MigrationModel> {
    let open = text
        .find(TABLE_OPEN)
        .ok_or_else(|| ScaffoldError::malformed(format!("no '{}' before the table name", TABLE_OPEN)))?;
    let name_start = open + TABLE_OPEN.len();
    let close = text[name_start..]
        .find(TABLE_CLOSE)
        .map(|i| name_start + i)
        .ok_or_else(|| {
            ScaffoldError::malformed(format!("no '{}' after the table name", TABLE_CLOSE))
        })?;

    let raw = &text[name_start..close];
    if raw.is_empty() || raw.contains(['\n', '"']) {
        return Err(ScaffoldError::malformed(format!(
            "'{}' is not a table name",
            raw.escape_debug()
        )));
    }

    // The block starts at the brace that ends TABLE_CLOSE
    let block_start = close + TABLE_CLOSE.len() - 1;
    let (block, block_end) = parse_literal_at(text, block_start)?;
    tracing::debug!(
        table = raw,
        block_start,
        block_end,
        "located column block"
    );

    let columns = ColumnSpec::from_block(&block)?;
    if columns.is_empty() {
        tracing::warn!(table = raw, "migration declares no columns");
    }

    let definition = Value::Object(
        columns
            .fields()
            .iter()
            .map(|c| (c.name.clone(), qualify_type(&c.descriptor)))
            .collect(),
    );

    Ok(MigrationModel {
        names: NameForms::from_raw(raw),
        columns,
        definition,
    })
}

/// Rewrite a bare tag such as `DECIMAL` to `DataTypes.DECIMAL`, the only
/// namespace the generated model imports
fn qualify_type(descriptor: &Value) -> Value {
    match descriptor {
        Value::Object(members) => Value::Object(
            members
                .iter()
                .map(|(key, value)| match key.as_str() {
                    "type" => (key.clone(), qualify_type(value)),
                    _ => (key.clone(), value.clone()),
                })
                .collect(),
        ),
        Value::Expr(expr) if expr.path.len() == 1 => {
            let mut expr = expr.clone();
            expr.path.insert(0, DATA_TYPES.to_string());
            Value::Expr(expr)
        }
        other => other.clone(),
    }
}

/// Read and parse a migration file
pub fn read_migration(path: impl AsRef<Path>) -> ScaffoldResult<MigrationModel> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ScaffoldError::MigrationNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| ScaffoldError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let model = parse_migration(&text)?;
    tracing::info!(
        path = %path.display(),
        table = %model.names.raw,
        columns = model.columns.len(),
        "migration parsed"
    );
    Ok(model)
}

/// Find the migration file for a name given on the command line.
///
/// `{dir}/{name}.{extension}` wins when it exists. Otherwise the files
/// directly inside `dir` are searched for one whose stem ends with `name`
/// after a `-`, `_` or `.` separator, so `create-orders` finds
/// `20240101000000-create-orders.ts`.
pub fn resolve_migration(dir: &Path, name: &str, extension: &str) -> ScaffoldResult<PathBuf> {
    let suffix = format!(".{}", extension);
    let name = name.strip_suffix(&suffix).unwrap_or(name);
    let exact = dir.join(format!("{}{}", name, suffix));
    if exact.is_file() {
        return Ok(exact);
    }
    if !dir.is_dir() {
        return Err(ScaffoldError::MigrationNotFound(exact));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .filter(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.strip_suffix(name))
                .is_some_and(|prefix| prefix.ends_with(['-', '_', '.']))
        })
        .collect();

    match candidates.len() {
        0 => Err(ScaffoldError::MigrationNotFound(exact)),
        1 => Ok(candidates.remove(0)),
        _ => Err(ScaffoldError::AmbiguousMigration {
            name: name.to_string(),
            candidates: candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|f| f.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
