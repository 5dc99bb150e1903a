//! # Service Generator
//!
//! Generates `services/{stem}.service.ts`. The service goes through the
//! shared repository instance exported by `repositories/index.ts` and turns
//! missing rows into the model's not-found error from the error catalog.

use crate::context::GenerationContext;
use crate::typescript::file_header;
use crate::{Artifact, GeneratedFile};

/// Generate the service file.
pub fn generate_service(ctx: &GenerationContext) -> GeneratedFile {
    let model = ctx.model();
    let model_class = ctx.names.class("Model");
    let service_class = ctx.names.class("Service");
    let repo = ctx.names.instance("Repo");
    let id_type = ctx.id_type().as_str();

    let mut content = String::with_capacity(2048);
    content.push_str(&file_header(ctx));

    content.push_str(&format!("import {{{}}} from \"../models\"\n", model_class));
    content.push_str(&format!("import {{{}}} from \"../repositories\"\n", repo));
    content.push_str("import Errors from \"../utils/errors/Errors\"\n");
    content.push_str(&format!(
        "import {{Filter, throwIfNull}} from \"{}\"\n\n",
        ctx.api_kit()
    ));

    content.push_str(&format!("export default class {} {{\n", service_class));

    content.push_str(&format!(
        "    async getAll(): Promise<{model_class}[]> {{\n        return {repo}.findAll()\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async findBy(filter: Filter): Promise<{model_class} | null> {{\n        return {repo}.findBy(filter)\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async getBy(filter: Filter): Promise<{model_class}> {{\n\
         \x20       const it = await this.findBy(filter)\n\
         \x20       throwIfNull(it, Errors.NOT_FOUND_{model}(filter.stringify()))\n\
         \x20       return it!\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async findAll(filter: Filter): Promise<{model_class}[]> {{\n        return {repo}.findAllBy(filter)\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async find(id: {id_type}): Promise<{model_class} | null> {{\n        return {repo}.findByPk(id)\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async get(id: {id_type}): Promise<{model_class}> {{\n\
         \x20       const it = await this.find(id)\n\
         \x20       throwIfNull(it, Errors.NOT_FOUND_{model}(`id[${{id}}]`))\n\
         \x20       return it!\n    }}\n\n"
    ));
    content.push_str(&format!(
        "    async create({}): Promise<{}> {{\n        return {}.create({})\n    }}\n",
        ctx.create_params(),
        model_class,
        repo,
        ctx.create_args()
    ));

    content.push_str("}\n");

    GeneratedFile::new(
        ctx.artifact_path("services", "service"),
        content,
        Artifact::Service,
    )
}

// ============================================================================
// Tests
// ============================================================================
