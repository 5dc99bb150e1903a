//! # Generation Context
//!
//! The `GenerationContext` holds everything the templates need to render
//! one migration's artifacts. It is built from a `MigrationModel` and
//! provides accessors for:
//!
//! - Name forms (model, file stem, registry key, class and instance names)
//! - Column lists (fields, create parameters, payloads)
//! - File names and import paths
//!

use modelgen_ir::{Column, ColumnSpec, MigrationModel, NameForms, TsType, Value};
use std::path::PathBuf;

use crate::EmitterConfig;

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed to render one migration.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Names derived from the table literal
    pub names: NameForms,

    /// Declared columns
    pub columns: ColumnSpec,

    /// Normalized column block for the model's `init`
    pub definition: Value,

    /// Emitter configuration
    pub config: EmitterConfig,
}

impl GenerationContext {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build a context from a parsed migration
    pub fn from_model(model: &MigrationModel, config: EmitterConfig) -> Self {
        Self {
            names: model.names.clone(),
            columns: model.columns.clone(),
            definition: model.definition.clone(),
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_model_default(model: &MigrationModel) -> Self {
        Self::from_model(model, EmitterConfig::default())
    }

    // ====================================================================
    // Names
    // ====================================================================

    /// PascalCase model name (`Order`)
    pub fn model(&self) -> &str {
        &self.names.model
    }

    /// Key of the model in the database initializer (`Orders`)
    pub fn registry_key(&self) -> &str {
        &self.names.registry_key
    }

    // ====================================================================
    // Files
    // ====================================================================

    /// `order.model.ts` for kind `model`
    pub fn file_name(&self, kind: &str) -> String {
        format!(
            "{}.{}.{}",
            self.names.file_stem(),
            kind,
            self.config.extension
        )
    }

    /// `models/order.model.ts`, relative to the source directory
    pub fn artifact_path(&self, dir: &str, kind: &str) -> PathBuf {
        PathBuf::from(dir).join(self.file_name(kind))
    }

    /// `index.ts` of a directory, relative to the source directory
    pub fn index_path(&self, dir: &str) -> PathBuf {
        PathBuf::from(dir).join(format!("index.{}", self.config.extension))
    }

    /// Module specifier of a sibling artifact, e.g. `./order.model`
    pub fn sibling_import(&self, kind: &str) -> String {
        format!("./{}.{}", self.names.file_stem(), kind)
    }

    /// Module specifier from another source directory, e.g. `../models/order.model`
    pub fn relative_import(&self, dir: &str, kind: &str) -> String {
        format!("../{}/{}.{}", dir, self.names.file_stem(), kind)
    }

    pub fn api_kit(&self) -> &str {
        &self.config.api_kit_module
    }

    // ====================================================================
    // Columns
    // ====================================================================

    /// All columns in declaration order
    pub fn fields(&self) -> &[Column] {
        self.columns.fields()
    }

    /// `total: string | null, name: string`
    pub fn create_params(&self) -> String {
        self.columns
            .create_params()
            .map(|c| format!("{}: {}", c.name, c.annotation()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `total, name`, the arguments forwarding the create parameters
    pub fn create_args(&self) -> String {
        self.columns
            .create_params()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One `name: name,` line per create parameter, each prefixed with `indent`
    pub fn payload_lines(&self, indent: &str) -> String {
        self.columns
            .create_params()
            .map(|c| format!("{indent}{name}: {name},\n", name = c.name))
            .collect()
    }

    /// Type of the primary key, `number` when the migration declares no `id`
    pub fn id_type(&self) -> TsType {
        self.columns
            .get("id")
            .map(Column::ts_type)
            .unwrap_or(TsType::Number)
    }

    /// Whether both ORM timestamp columns are declared
    pub fn has_timestamps(&self) -> bool {
        self.columns.get("createdAt").is_some() && self.columns.get("updatedAt").is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
