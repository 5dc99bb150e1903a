//! # Modelgen Codegen
//!
//! Artifact emitter for add-model.
//!
//! This crate renders TypeScript sources for one parsed migration and
//! registers them in the project's shared registry files.
//!
//! ## Features
//!
//! - **Interface / Model / Repository / Service**: regenerated on every run
//! - **Index files**: the four `index.ts` aggregators are patched in place
//! - **Database initializer**: registers the model's `init` entry point
//! - **Error catalog**: registers the model's not-found error
//!
//! Registry patches are idempotent: an entry that is already present is
//! left alone.
//!

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod emitter;
pub mod registry;
pub mod typescript;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::GenerationContext;
pub use emitter::{EmitReport, Emitter, StepReport, StepStatus};
pub use registry::{
    PatchStatus, RegistryDocument, RegistryEntry, RegistryLayout, RegistryPatch, layout_for,
    patch_registry,
};

use std::path::{Path, PathBuf};

// ============================================================================
// EmitterConfig
// ============================================================================

/// Configuration for the emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Project root; every other directory is relative to it
    pub root: PathBuf,

    /// Directory holding the migrations
    pub migrations_dir: PathBuf,

    /// Directory holding `interfaces/`, `models/`, … and the registries
    pub source_dir: PathBuf,

    /// Extension of migrations and generated files
    pub extension: String,

    /// Module that provides `Filter`, `throwIfNull` and `NotFoundException`
    pub api_kit_module: String,

    /// Create missing output directories instead of failing
    pub create_dirs: bool,

    /// Render and report without writing anything
    pub dry_run: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            migrations_dir: PathBuf::from("migrations"),
            source_dir: PathBuf::from("src"),
            extension: "ts".to_string(),
            api_kit_module: "@d-lab/api-kit".to_string(),
            create_dirs: false,
            dry_run: false,
        }
    }
}

impl EmitterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the migrations directory
    pub fn with_migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }

    /// Set the source directory
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Set the file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the API-kit module name
    pub fn with_api_kit_module(mut self, module: impl Into<String>) -> Self {
        self.api_kit_module = module.into();
        self
    }

    /// Allow creating missing output directories
    pub fn create_dirs(mut self) -> Self {
        self.create_dirs = true;
        self
    }

    /// Do not write any file
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Absolute-or-root-relative migrations directory
    pub fn migrations_root(&self) -> PathBuf {
        self.root.join(&self.migrations_dir)
    }

    /// Absolute-or-root-relative source directory
    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    /// Resolve a path relative to the source directory
    pub fn source_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source_root().join(relative)
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// Every file the emitter produces or patches, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Interface,
    InterfaceIndex,
    Model,
    ModelIndex,
    DatabaseInitializer,
    Repository,
    RepositoryIndex,
    Service,
    ServiceIndex,
    ErrorCatalog,
}

/// How an artifact reaches the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Regenerated from scratch on every run
    Overwrite,
    /// Shared file that gains one entry per model, once
    IdempotentInsert,
}

impl Artifact {
    /// Pipeline order
    pub const PIPELINE: [Artifact; 10] = [
        Artifact::Interface,
        Artifact::InterfaceIndex,
        Artifact::Model,
        Artifact::ModelIndex,
        Artifact::DatabaseInitializer,
        Artifact::Repository,
        Artifact::RepositoryIndex,
        Artifact::Service,
        Artifact::ServiceIndex,
        Artifact::ErrorCatalog,
    ];

    pub fn policy(&self) -> WritePolicy {
        match self {
            Artifact::Interface | Artifact::Model | Artifact::Repository | Artifact::Service => {
                WritePolicy::Overwrite
            }
            _ => WritePolicy::IdempotentInsert,
        }
    }

    /// Group shown in progress output
    pub fn label(&self) -> &'static str {
        match self {
            Artifact::Interface | Artifact::InterfaceIndex => "Interface",
            Artifact::Model | Artifact::ModelIndex => "Model",
            Artifact::Repository | Artifact::RepositoryIndex => "Repository",
            Artifact::Service | Artifact::ServiceIndex => "Service",
            Artifact::DatabaseInitializer => "Database",
            Artifact::ErrorCatalog => "Errors",
        }
    }

    /// Part of the group shown in progress output
    pub fn part(&self) -> &'static str {
        match self {
            Artifact::Interface | Artifact::Model | Artifact::Repository | Artifact::Service => {
                "code"
            }
            Artifact::InterfaceIndex
            | Artifact::ModelIndex
            | Artifact::RepositoryIndex
            | Artifact::ServiceIndex => "index",
            Artifact::DatabaseInitializer => "initializer",
            Artifact::ErrorCatalog => "catalog",
        }
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the source directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// Which artifact this is
    pub artifact: Artifact,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, artifact: Artifact) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            artifact,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
