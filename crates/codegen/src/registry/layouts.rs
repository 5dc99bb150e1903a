//! Registry layouts for one model
//!
//! | Registry             | Anchor              | Member                                   |
//! |----------------------|---------------------|------------------------------------------|
//! | `interfaces/index`   | `export {`          | `Order,`                                 |
//! | `models/index`       | `export {`          | `OrderModel,`                            |
//! | `repositories/index` | `export {`          | `orderRepo,`                             |
//! | `services/index`     | `export {`          | `orderService,`                          |
//! | `db/database`        | `const db = {`      | `Orders: initOrderModel(sequelize),`     |
//! | `utils/errors/Errors`| `const Errors = {`  | `NOT_FOUND_Order: (reason: string) => …` |

use crate::context::GenerationContext;
use crate::registry::{RegistryEntry, RegistryLayout};
use crate::Artifact;
use std::path::PathBuf;

const MEMBER_INDENT: &str = "    ";
const EXPORT_ANCHOR: &str = "export {";
const INDEX_SKELETON: &str = "\nexport {\n}\n";

/// Layout of the registry an artifact patches, `None` for regenerated files
pub fn layout_for(artifact: Artifact, ctx: &GenerationContext) -> Option<RegistryLayout> {
    match artifact {
        Artifact::InterfaceIndex => Some(interfaces_index(ctx)),
        Artifact::ModelIndex => Some(models_index(ctx)),
        Artifact::DatabaseInitializer => Some(database_initializer(ctx)),
        Artifact::RepositoryIndex => Some(repositories_index(ctx)),
        Artifact::ServiceIndex => Some(services_index(ctx)),
        Artifact::ErrorCatalog => Some(error_catalog(ctx)),
        Artifact::Interface | Artifact::Model | Artifact::Repository | Artifact::Service => None,
    }
}

// ============================================================================
// Index files
// ============================================================================

/// An `index.ts` that default-imports a sibling and re-exports `exported`
fn index_layout(
    ctx: &GenerationContext,
    artifact: Artifact,
    dir: &str,
    kind: &str,
    class: String,
    exported: String,
    declaration: Option<String>,
) -> RegistryLayout {
    let module = ctx.sibling_import(kind);
    RegistryLayout {
        artifact,
        path: ctx.index_path(dir),
        anchor: EXPORT_ANCHOR.to_string(),
        skeleton: INDEX_SKELETON.to_string(),
        entry: RegistryEntry {
            marker: format!("\"{}\"", module),
            import: Some(format!("import {} from \"{}\"", class, module)),
            declaration,
            member: format!("{}{},", MEMBER_INDENT, exported),
        },
    }
}

fn interfaces_index(ctx: &GenerationContext) -> RegistryLayout {
    let model = ctx.model().to_string();
    index_layout(
        ctx,
        Artifact::InterfaceIndex,
        "interfaces",
        "interface",
        model.clone(),
        model,
        None,
    )
}

fn models_index(ctx: &GenerationContext) -> RegistryLayout {
    let class = ctx.names.class("Model");
    index_layout(
        ctx,
        Artifact::ModelIndex,
        "models",
        "model",
        class.clone(),
        class,
        None,
    )
}

/// Indexes exporting a shared instance rather than the class
fn instance_index(
    ctx: &GenerationContext,
    artifact: Artifact,
    dir: &str,
    kind: &str,
    suffix: &str,
) -> RegistryLayout {
    let class = ctx.names.class(suffix);
    let instance = ctx.names.instance(suffix);
    let declaration = format!("const {} = new {}()", instance, class);
    index_layout(ctx, artifact, dir, kind, class, instance, Some(declaration))
}

fn repositories_index(ctx: &GenerationContext) -> RegistryLayout {
    instance_index(ctx, Artifact::RepositoryIndex, "repositories", "repo", "Repo")
}

fn services_index(ctx: &GenerationContext) -> RegistryLayout {
    instance_index(ctx, Artifact::ServiceIndex, "services", "service", "Service")
}

// ============================================================================
// Database initializer / error catalog
// ============================================================================

fn database_initializer(ctx: &GenerationContext) -> RegistryLayout {
    let module = ctx.relative_import("models", "model");
    let init = format!("init{}", ctx.names.class("Model"));

    RegistryLayout {
        artifact: Artifact::DatabaseInitializer,
        path: PathBuf::from("db").join(format!("database.{}", ctx.config.extension)),
        anchor: "const db = {".to_string(),
        skeleton: "import {Sequelize} from \"sequelize\"\n\
                   \n\
                   export const sequelize = new Sequelize(process.env.DATABASE_URL ?? \"\", {logging: false})\n\
                   \n\
                   const db = {\n    \
                       sequelize,\n\
                   }\n\
                   \n\
                   export default db\n"
            .to_string(),
        entry: RegistryEntry {
            marker: format!("\"{}\"", module),
            import: Some(format!("import {{init as {}}} from \"{}\"", init, module)),
            declaration: None,
            member: format!(
                "{}{}: {}(sequelize),",
                MEMBER_INDENT,
                ctx.registry_key(),
                init
            ),
        },
    }
}

fn error_catalog(ctx: &GenerationContext) -> RegistryLayout {
    let key = format!("NOT_FOUND_{}", ctx.model());

    RegistryLayout {
        artifact: Artifact::ErrorCatalog,
        path: PathBuf::from("utils/errors").join(format!("Errors.{}", ctx.config.extension)),
        anchor: "const Errors = {".to_string(),
        skeleton: format!(
            "import {{NotFoundException}} from \"{}\"\n\nconst Errors = {{\n}}\n\nexport default Errors\n",
            ctx.api_kit()
        ),
        entry: RegistryEntry {
            marker: format!("{}:", key),
            import: None,
            declaration: None,
            member: format!(
                "{}{}: (reason: string) => new NotFoundException(`{} not found: ${{reason}}`),",
                MEMBER_INDENT,
                key,
                ctx.model()
            ),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
