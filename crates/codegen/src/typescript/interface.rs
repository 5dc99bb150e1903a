//! # Interface Generator
//!
//! Generates `interfaces/{stem}.interface.ts`, the plain data shape of one
//! row. The model class implements it, so the field list here and in the
//! model must stay identical.

use crate::context::GenerationContext;
use crate::typescript::{field_lines, file_header};
use crate::{Artifact, GeneratedFile};

/// Generate the interface file.
pub fn generate_interface(ctx: &GenerationContext) -> GeneratedFile {
    let mut content = String::with_capacity(512);

    content.push_str(&file_header(ctx));
    content.push_str(&format!("export default interface {} {{\n", ctx.model()));
    content.push_str(&field_lines(ctx, ""));
    content.push_str("}\n");

    GeneratedFile::new(
        ctx.artifact_path("interfaces", "interface"),
        content,
        Artifact::Interface,
    )
}

// ============================================================================
// Tests
// ============================================================================
