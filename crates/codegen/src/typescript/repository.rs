//! # Repository Generator
//!
//! Generates `repositories/{stem}.repo.ts`, the data-access class over the
//! model registered in the database initializer (`db.{RegistryKey}`).

use crate::context::GenerationContext;
use crate::typescript::file_header;
use crate::{Artifact, GeneratedFile};

/// Generate the repository file.
pub fn generate_repository(ctx: &GenerationContext) -> GeneratedFile {
    let model = ctx.model();
    let model_class = ctx.names.class("Model");
    let repo_class = ctx.names.class("Repo");
    let table = format!("db.{}", ctx.registry_key());
    let id_type = ctx.id_type().as_str();

    let mut content = String::with_capacity(2048);
    content.push_str(&file_header(ctx));

    content.push_str("import db from \"../db/database\"\n");
    content.push_str(&format!("import {{{}}} from \"../models\"\n", model_class));
    content.push_str(&format!("import {{{}}} from \"../interfaces\"\n", model));
    content.push_str(&format!("import {{Filter}} from \"{}\"\n\n", ctx.api_kit()));

    content.push_str(&format!("export default class {} {{\n", repo_class));

    content.push_str(&format!(
        "    async findAll(): Promise<{model_class}[]> {{\n        return {table}.findAll()\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async findBy(filter: Filter): Promise<{model_class} | null> {{\n        return {table}.findOne(filter.get())\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async findAllBy(filter: Filter): Promise<{model_class}[]> {{\n        return {table}.findAll(filter.get())\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async findByPk(id: {id_type}): Promise<{model_class} | null> {{\n        return {table}.findByPk(id)\n    }}\n\n"
    ));

    // create
    content.push_str(&format!(
        "    async create({}): Promise<{}> {{\n",
        ctx.create_params(),
        model_class
    ));
    content.push_str(&format!("        return {table}.create({{\n"));
    content.push_str(&ctx.payload_lines("            "));
    content.push_str("        })\n    }\n\n");

    content.push_str(&format!(
        "    async update(id: {id_type}, payload: Partial<{model}>): Promise<number> {{\n"
    ));
    content.push_str(&format!(
        "        const [count] = await {table}.update(payload, {{where: {{id}}}})\n"
    ));
    content.push_str("        return count\n    }\n\n");

    content.push_str(&format!(
        "    async destroy(id: {id_type}): Promise<number> {{\n        return {table}.destroy({{where: {{id}}}})\n    }}\n"
    ));

    content.push_str("}\n");

    GeneratedFile::new(
        ctx.artifact_path("repositories", "repo"),
        content,
        Artifact::Repository,
    )
}

// ============================================================================
// Tests
// ============================================================================
