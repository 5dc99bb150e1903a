//! # Emitter
//!
//! The `Emitter` runs the fixed artifact pipeline for one parsed migration:
//!
//! ```text
//! MigrationModel + EmitterConfig
//!         │
//!         ▼
//!   GenerationContext::from_model()
//!         │
//!         ├──► interface          overwrite
//!         ├──► interfaces index   idempotent insert
//!         ├──► model              overwrite
//!         ├──► models index       idempotent insert
//!         ├──► database           idempotent insert
//!         ├──► repository         overwrite
//!         ├──► repositories index idempotent insert
//!         ├──► service            overwrite
//!         ├──► services index     idempotent insert
//!         └──► error catalog      idempotent insert
//! ```
//!
//! Each step is reported to a callback as soon as it completes. The first
//! failing step aborts the run; files written by earlier steps stay on disk.

use modelgen_core::{ScaffoldError, ScaffoldResult};
use modelgen_ir::MigrationModel;
use std::path::{Path, PathBuf};

use crate::context::GenerationContext;
use crate::registry::{PatchStatus, RegistryLayout, layout_for, patch_registry};
use crate::typescript;
use crate::{Artifact, EmitterConfig, GeneratedFile, WritePolicy};

// ============================================================================
// Reports
// ============================================================================

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Regenerated file written
    Written,
    /// Entry added to a registry
    Inserted,
    /// Registry already had the entry; nothing written
    AlreadyPresent,
    /// Dry run: the step would write
    Planned,
}

impl StepStatus {
    /// Whether the step changed (or would change) a file
    pub fn is_change(&self) -> bool {
        !matches!(self, StepStatus::AlreadyPresent)
    }
}

/// One completed pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Artifact,

    /// Full path of the file the step targets
    pub path: PathBuf,

    pub status: StepStatus,
}

/// All steps of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub steps: Vec<StepReport>,
}

impl EmitReport {
    /// Number of files written (or planned in a dry run)
    pub fn changed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_change()).count()
    }

    /// Status of one artifact's step
    pub fn status_of(&self, artifact: Artifact) -> Option<StepStatus> {
        self.steps
            .iter()
            .find(|s| s.step == artifact)
            .map(|s| s.status)
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Renders and writes the artifacts of one migration
#[derive(Debug, Clone)]
pub struct Emitter {
    config: EmitterConfig,
}

/// What a pipeline step does
enum Step {
    Regenerate(GeneratedFile),
    Register(RegistryLayout),
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Run the pipeline, calling `on_step` after every completed step.
    ///
    /// # Errors
    ///
    /// - `DirectoryMissing` when an output directory does not exist and
    ///   `create_dirs` is off
    /// - `FileRead` / `FileWrite` / `DirectoryCreate` on I/O failures
    /// - `RegistryAnchorMissing` when a registry has no block to register in
    pub fn emit(
        &self,
        model: &MigrationModel,
        mut on_step: impl FnMut(&StepReport),
    ) -> ScaffoldResult<EmitReport> {
        let ctx = GenerationContext::from_model(model, self.config.clone());
        let mut report = EmitReport::default();

        for artifact in Artifact::PIPELINE {
            let step = match plan(artifact, &ctx)? {
                Step::Regenerate(file) => self.regenerate(&file)?,
                Step::Register(layout) => self.register(&layout)?,
            };
            on_step(&step);
            report.steps.push(step);
        }

        tracing::info!(
            model = %ctx.model(),
            changed = report.changed_count(),
            dry_run = self.config.dry_run,
            "pipeline complete",
        );

        Ok(report)
    }

    fn regenerate(&self, file: &GeneratedFile) -> ScaffoldResult<StepReport> {
        let path = self.config.source_path(&file.path);

        let status = if self.config.dry_run {
            StepStatus::Planned
        } else {
            self.write(&path, &file.content)?;
            StepStatus::Written
        };

        Ok(StepReport {
            step: file.artifact,
            path,
            status,
        })
    }

    fn register(&self, layout: &RegistryLayout) -> ScaffoldResult<StepReport> {
        let path = self.config.source_path(&layout.path);

        let existing = if path.is_file() {
            Some(
                std::fs::read_to_string(&path).map_err(|e| ScaffoldError::FileRead {
                    path: path.clone(),
                    message: e.to_string(),
                })?,
            )
        } else {
            None
        };

        let patch = patch_registry(layout, existing.as_deref()).map_err(|e| match e {
            ScaffoldError::RegistryAnchorMissing { anchor, .. } => {
                ScaffoldError::RegistryAnchorMissing {
                    path: path.clone(),
                    anchor,
                }
            }
            other => other,
        })?;

        let status = match (patch.status, self.config.dry_run) {
            (PatchStatus::AlreadyPresent, _) => StepStatus::AlreadyPresent,
            (PatchStatus::Inserted, true) => StepStatus::Planned,
            (PatchStatus::Inserted, false) => {
                self.write(&path, &patch.content)?;
                StepStatus::Inserted
            }
        };

        Ok(StepReport {
            step: layout.artifact,
            path,
            status,
        })
    }

    fn write(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                if !self.config.create_dirs {
                    return Err(ScaffoldError::DirectoryMissing(parent.to_path_buf()));
                }
                std::fs::create_dir_all(parent).map_err(|e| ScaffoldError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
                tracing::debug!(dir = %parent.display(), "created output directory");
            }
        }

        std::fs::write(path, content).map_err(|e| ScaffoldError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!(path = %path.display(), bytes = content.len(), "file written");
        Ok(())
    }
}

/// Decide what one pipeline step does
fn plan(artifact: Artifact, ctx: &GenerationContext) -> ScaffoldResult<Step> {
    let step = match artifact.policy() {
        WritePolicy::Overwrite => typescript::render(artifact, ctx).map(Step::Regenerate),
        WritePolicy::IdempotentInsert => layout_for(artifact, ctx).map(Step::Register),
    };
    step.ok_or_else(|| {
        ScaffoldError::with_context(
            format!("planning {:?}", artifact),
            "no template or registry for this artifact",
        )
    })
}

// ============================================================================
// Tests
// ============================================================================
