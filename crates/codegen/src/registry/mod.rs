//! # Registry Patching
//!
//! Registries are shared TypeScript files (the four `index.ts` aggregators,
//! the database initializer and the error catalog) that gain one entry per
//! generated model. Patching is done on a parsed [`RegistryDocument`]
//! rather than by splicing at byte offsets:
//!
//! ```text
//! head      import lines, declarations, anything else
//! anchor    `export {`, `const db = {`, ...
//! members   one line per registered entry
//! close     the first line after the anchor starting with `}`
//! tail      everything after the block
//! ```
//!
//! An entry is inserted only when its marker does not occur anywhere in the
//! file, so running the pipeline twice leaves registries unchanged.

pub mod layouts;

pub use layouts::layout_for;

use modelgen_core::{ScaffoldError, ScaffoldResult};
use std::path::{Path, PathBuf};

use crate::Artifact;

// ============================================================================
// RegistryEntry / RegistryLayout
// ============================================================================

/// What one model contributes to a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Substring whose presence means the entry is already registered
    pub marker: String,

    /// Line prepended to the file
    pub import: Option<String>,

    /// Line placed right before the anchor
    pub declaration: Option<String>,

    /// Line inserted as the first member of the block
    pub member: String,
}

/// Where and how a registry file is patched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLayout {
    pub artifact: Artifact,

    /// Path relative to the source directory
    pub path: PathBuf,

    /// Text the block's opening line starts with
    pub anchor: String,

    /// Content used when the file does not exist yet
    pub skeleton: String,

    pub entry: RegistryEntry,
}

// ============================================================================
// RegistryDocument
// ============================================================================

/// A registry file split around its member block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDocument {
    pub head: Vec<String>,
    pub anchor: String,
    pub members: Vec<String>,
    pub close: String,
    pub tail: Vec<String>,
    pub trailing_newline: bool,
}

impl RegistryDocument {
    /// Split `content` around the block opened by the first line starting
    /// with `anchor`.
    ///
    /// `path` is only used for error messages.
    pub fn parse(content: &str, anchor: &str, path: &Path) -> ScaffoldResult<Self> {
        let content = content.replace("\r\n", "\n");
        let trailing_newline = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().collect();

        let missing = || ScaffoldError::RegistryAnchorMissing {
            path: path.to_path_buf(),
            anchor: anchor.to_string(),
        };

        let open = lines
            .iter()
            .position(|line| line.trim_start().starts_with(anchor))
            .ok_or_else(missing)?;

        let head = lines[..open].iter().map(|l| l.to_string()).collect();
        let anchor_line = lines[open];
        let indent = &anchor_line[..anchor_line.len() - anchor_line.trim_start().len()];
        let rest = anchor_line.trim_start()[anchor.len()..].trim();

        let (rest, terminator) = match rest.strip_suffix(';') {
            Some(rest) => (rest.trim_end(), ";"),
            None => (rest, ""),
        };

        // Block opened and closed on the anchor line: `export {}` or `export {A, B};`
        if let Some(inline) = rest.strip_suffix('}') {
            let members = inline
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(|m| format!("{}    {},", indent, m))
                .collect();
            return Ok(Self {
                head,
                anchor: format!("{}{}", indent, anchor),
                members,
                close: format!("{}}}{}", indent, terminator),
                tail: lines[open + 1..].iter().map(|l| l.to_string()).collect(),
                trailing_newline,
            });
        }

        let close = lines[open + 1..]
            .iter()
            .position(|line| line.trim_start().starts_with('}'))
            .map(|offset| open + 1 + offset)
            .ok_or_else(missing)?;

        Ok(Self {
            head,
            anchor: anchor_line.to_string(),
            members: lines[open + 1..close].iter().map(|l| l.to_string()).collect(),
            close: lines[close].to_string(),
            tail: lines[close + 1..].iter().map(|l| l.to_string()).collect(),
            trailing_newline,
        })
    }

    /// Register an entry: import first in the file, declaration last before
    /// the block, member first inside it.
    pub fn insert(&mut self, entry: &RegistryEntry) {
        if let Some(import) = &entry.import {
            self.head.insert(0, import.clone());
        }
        if let Some(declaration) = &entry.declaration {
            self.head.push(declaration.clone());
        }
        self.members.insert(0, entry.member.clone());
    }

    /// Render back to text
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = Vec::with_capacity(
            self.head.len() + self.members.len() + self.tail.len() + 2,
        );
        lines.extend(self.head.iter().map(String::as_str));
        lines.push(&self.anchor);
        lines.extend(self.members.iter().map(String::as_str));
        lines.push(&self.close);
        lines.extend(self.tail.iter().map(String::as_str));

        let mut out = lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// Patching
// ============================================================================

/// Outcome of patching one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    Inserted,
    AlreadyPresent,
}

/// Patched registry content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPatch {
    pub status: PatchStatus,
    pub content: String,
}

impl RegistryPatch {
    /// Whether the content differs from the input and must be written
    pub fn changed(&self) -> bool {
        self.status == PatchStatus::Inserted
    }
}

/// Register the layout's entry in `existing`, or in the skeleton when the
/// file does not exist or is blank.
pub fn patch_registry(
    layout: &RegistryLayout,
    existing: Option<&str>,
) -> ScaffoldResult<RegistryPatch> {
    let source = match existing {
        Some(text) if !text.trim().is_empty() => text,
        _ => layout.skeleton.as_str(),
    };

    if source.contains(&layout.entry.marker) {
        tracing::debug!(
            registry = %layout.path.display(),
            marker = %layout.entry.marker,
            "entry already registered",
        );
        return Ok(RegistryPatch {
            status: PatchStatus::AlreadyPresent,
            content: source.to_string(),
        });
    }

    let mut document = RegistryDocument::parse(source, &layout.anchor, &layout.path)?;
    document.insert(&layout.entry);

    Ok(RegistryPatch {
        status: PatchStatus::Inserted,
        content: document.render(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str) -> RegistryEntry {
        RegistryEntry {
            marker: format!("\"./{}.service\"", name.to_lowercase()),
            import: Some(format!(
                "import {}Service from \"./{}.service\"",
                name,
                name.to_lowercase()
            )),
            declaration: Some(format!(
                "const {}Service = new {}Service()",
                name.to_lowercase(),
                name
            )),
            member: format!("    {}Service,", name.to_lowercase()),
        }
    }

    fn layout(name: &str) -> RegistryLayout {
        RegistryLayout {
            artifact: Artifact::ServiceIndex,
            path: PathBuf::from("services/index.ts"),
            anchor: "export {".to_string(),
            skeleton: "\nexport {\n}\n".to_string(),
            entry: entry(name),
        }
    }

    #[test]
    fn test_patch_skeleton() {
        let patch = patch_registry(&layout("Order"), None).unwrap();

        assert_eq!(patch.status, PatchStatus::Inserted);
        assert_eq!(
            patch.content,
            "import OrderService from \"./order.service\"\n\
             \n\
             const orderService = new OrderService()\n\
             export {\n    \
                 orderService,\n\
             }\n"
        );
    }

    #[test]
    fn test_patch_is_idempotent() {
        let first = patch_registry(&layout("Order"), None).unwrap();
        let second = patch_registry(&layout("Order"), Some(&first.content)).unwrap();

        assert_eq!(second.status, PatchStatus::AlreadyPresent);
        assert!(!second.changed());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn test_newest_entry_comes_first() {
        let first = patch_registry(&layout("Order"), None).unwrap();
        let second = patch_registry(&layout("Item"), Some(&first.content)).unwrap();

        assert_eq!(
            second.content,
            "import ItemService from \"./item.service\"\n\
             import OrderService from \"./order.service\"\n\
             \n\
             const orderService = new OrderService()\n\
             const itemService = new ItemService()\n\
             export {\n    \
                 itemService,\n    \
                 orderService,\n\
             }\n"
        );
    }

    #[test]
    fn test_foreign_content_is_preserved() {
        let existing = "// hand written\nimport Legacy from \"./legacy\"\n\nexport {\n  Legacy,\n}\n\nexport const extra = 1\n";
        let patch = patch_registry(&layout("Order"), Some(existing)).unwrap();

        assert_eq!(
            patch.content,
            "import OrderService from \"./order.service\"\n\
             // hand written\n\
             import Legacy from \"./legacy\"\n\
             \n\
             const orderService = new OrderService()\n\
             export {\n    \
                 orderService,\n  \
                 Legacy,\n\
             }\n\
             \n\
             export const extra = 1\n"
        );
    }

    #[test]
    fn test_missing_anchor() {
        let err = patch_registry(&layout("Order"), Some("export default {}\n")).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::RegistryAnchorMissing { ref anchor, .. } if anchor == "export {"
        ));
    }

    #[test]
    fn test_unterminated_block() {
        let err = patch_registry(&layout("Order"), Some("export {\n    a,\n")).unwrap_err();
        assert!(matches!(err, ScaffoldError::RegistryAnchorMissing { .. }));
    }

    #[test]
    fn test_blank_file_uses_skeleton() {
        let from_blank = patch_registry(&layout("Order"), Some("  \n")).unwrap();
        let from_missing = patch_registry(&layout("Order"), None).unwrap();
        assert_eq!(from_blank, from_missing);
    }

    #[test]
    fn test_inline_block() {
        let patch = patch_registry(&layout("Order"), Some("export {Legacy}")).unwrap();
        assert_eq!(
            patch.content,
            "import OrderService from \"./order.service\"\n\
             const orderService = new OrderService()\n\
             export {\n    \
                 orderService,\n    \
                 Legacy,\n\
             }"
        );
    }

    #[test]
    fn test_inline_block_keeps_semicolon() {
        let patch = patch_registry(&layout("Order"), Some("export {};\n")).unwrap();
        assert_eq!(
            patch.content,
            "import OrderService from \"./order.service\"\n\
             const orderService = new OrderService()\n\
             export {\n    \
                 orderService,\n\
             };\n"
        );

        let existing = "import A from \"./a\"\nimport B from \"./b\"\nexport { A, B };\n";
        let patch = patch_registry(&layout("Order"), Some(existing)).unwrap();
        assert_eq!(
            patch.content,
            "import OrderService from \"./order.service\"\n\
             import A from \"./a\"\n\
             import B from \"./b\"\n\
             const orderService = new OrderService()\n\
             export {\n    \
                 orderService,\n    \
                 A,\n    \
                 B,\n\
             };\n"
        );

        let again = patch_registry(&layout("Order"), Some(&patch.content)).unwrap();
        assert_eq!(again.status, PatchStatus::AlreadyPresent);
    }

    #[test]
    fn test_inline_block_ignores_later_braces() {
        let existing = "export {};\nfunction helper() {\n    return 1\n}\n";
        let patch = patch_registry(&layout("Order"), Some(existing)).unwrap();
        assert!(
            patch.content.ends_with(
                "export {\n    orderService,\n};\nfunction helper() {\n    return 1\n}\n"
            ),
            "{}",
            patch.content
        );
    }

    #[test]
    fn test_multiline_block_keeps_semicolon() {
        let patch = patch_registry(&layout("Order"), Some("export {\n    A,\n};\n")).unwrap();
        assert!(patch.content.ends_with("export {\n    orderService,\n    A,\n};\n"));
    }

    #[test]
    fn test_crlf_is_normalized() {
        let patch = patch_registry(&layout("Order"), Some("export {\r\n}\r\n")).unwrap();
        assert!(!patch.content.contains('\r'));
        assert!(patch.content.ends_with("export {\n    orderService,\n}\n"));
    }

    #[test]
    fn test_document_round_trip_without_insert() {
        let text = "a\n\nexport {\n    X,\n}\ntail";
        let document = RegistryDocument::parse(text, "export {", Path::new("x.ts")).unwrap();
        assert_eq!(document.members, vec!["    X,".to_string()]);
        assert!(!document.trailing_newline);
        assert_eq!(document.render(), text);
    }
}
