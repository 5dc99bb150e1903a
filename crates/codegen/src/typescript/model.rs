//! # Model Generator (Sequelize)
//!
//! Generates `models/{stem}.model.ts` for the migrated table.
//!
//! ## Generated Items
//!
//! - `{Model}CreationAttributes`: the interface with the ORM-managed
//!   columns (`id`, `createdAt`, `updatedAt`) made optional
//! - `{Model}Model`: the Sequelize model class implementing the interface
//! - `init(sequelize)`: the entry point the database initializer calls; it
//!   hands the migration's column block, with normalized keys, to
//!   `Model.init`

use modelgen_ir::render_literal;

use crate::context::GenerationContext;
use crate::typescript::{field_lines, file_header};
use crate::{Artifact, GeneratedFile};

// ============================================================================
// Public API
// ============================================================================

/// Generate the model file.
pub fn generate_model(ctx: &GenerationContext) -> GeneratedFile {
    let model = ctx.model();
    let class = ctx.names.class("Model");
    let definition = render_literal(&ctx.definition, 1);
    let reserved = ctx.columns.reserved_present();

    let mut content = String::with_capacity(2048);
    content.push_str(&file_header(ctx));

    // Imports
    content.push_str(&generate_imports(&definition, !reserved.is_empty()));
    content.push_str(&format!("import {{{}}} from \"../interfaces\"\n\n", model));

    // Creation attributes
    if reserved.is_empty() {
        content.push_str(&format!(
            "export type {}CreationAttributes = {}\n\n",
            model, model
        ));
    } else {
        let keys = reserved
            .iter()
            .map(|k| format!("\"{}\"", k))
            .collect::<Vec<_>>()
            .join(" | ");
        content.push_str(&format!(
            "export type {}CreationAttributes = Optional<{}, {}>\n\n",
            model, model, keys
        ));
    }

    // Model class
    content.push_str(&format!(
        "export default class {class} extends Model<{model}, {model}CreationAttributes> implements {model} {{\n"
    ));
    content.push_str(&field_lines(ctx, "declare "));
    content.push_str("}\n\n");

    // init entry point
    content.push_str(&format!(
        "export const init = (sequelize: Sequelize): typeof {class} => {{\n"
    ));
    content.push_str(&format!("    {class}.init({definition}, {{\n"));
    content.push_str("        underscored: true,\n");
    content.push_str(&format!("        modelName: \"{}\",\n", ctx.names.raw));
    content.push_str("        sequelize,\n");
    content.push_str(&format!("        timestamps: {},\n", ctx.has_timestamps()));
    content.push_str("    })\n");
    content.push_str(&format!("    return {class}\n"));
    content.push_str("}\n");

    GeneratedFile::new(ctx.artifact_path("models", "model"), content, Artifact::Model)
}

// ============================================================================
// Imports
// ============================================================================

fn generate_imports(definition: &str, needs_optional: bool) -> String {
    let mut names = vec!["Model"];
    if definition.contains("DataTypes.") {
        names.push("DataTypes");
    }
    names.push("Sequelize");
    if needs_optional {
        names.push("Optional");
    }
    format!("import {{{}}} from \"sequelize\"\n", names.join(", "))
}

// ============================================================================
// Tests
// ============================================================================
