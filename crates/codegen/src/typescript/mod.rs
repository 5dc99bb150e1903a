//! # TypeScript Generators
//!
//! One module per always-regenerated artifact. Each exposes a
//! `generate_*` function that renders a [`GeneratedFile`] from the
//! [`GenerationContext`] and never touches the disk.
//!
//! [`GeneratedFile`]: crate::GeneratedFile
//! [`GenerationContext`]: crate::GenerationContext

pub mod interface;
pub mod model;
pub mod repository;
pub mod service;

pub use interface::generate_interface;
pub use model::generate_model;
pub use repository::generate_repository;
pub use service::generate_service;

use crate::context::GenerationContext;
use crate::{Artifact, GeneratedFile};

/// Render a regenerated artifact, `None` for registries
pub fn render(artifact: Artifact, ctx: &GenerationContext) -> Option<GeneratedFile> {
    match artifact {
        Artifact::Interface => Some(generate_interface(ctx)),
        Artifact::Model => Some(generate_model(ctx)),
        Artifact::Repository => Some(generate_repository(ctx)),
        Artifact::Service => Some(generate_service(ctx)),
        Artifact::InterfaceIndex
        | Artifact::ModelIndex
        | Artifact::DatabaseInitializer
        | Artifact::RepositoryIndex
        | Artifact::ServiceIndex
        | Artifact::ErrorCatalog => None,
    }
}

/// Banner placed at the top of every regenerated file
pub fn file_header(ctx: &GenerationContext) -> String {
    format!(
        "// Generated by add-model from the \"{}\" migration.\n\
         // This file is overwritten on every run; change the migration instead.\n\n",
        ctx.names.raw
    )
}

/// `    name: type` lines for every column
pub(crate) fn field_lines(ctx: &GenerationContext, prefix: &str) -> String {
    ctx.fields()
        .iter()
        .map(|c| format!("    {}{}: {}\n", prefix, c.name, c.annotation()))
        .collect()
}
