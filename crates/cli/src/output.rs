//! Progress lines
//!
//! ```text
//! - Interface: code ok
//! - Interface: index ok
//! - Model: index already present
//! ## done.
//! ```

use colored::Colorize;
use modelgen_codegen::{StepReport, StepStatus};

/// One line for a completed pipeline step
pub fn step_line(step: &StepReport) -> String {
    let part = step.step.part();
    let outcome = match step.status {
        StepStatus::Written | StepStatus::Inserted => format!("{} ok", part).as_str().green(),
        StepStatus::AlreadyPresent => format!("{} already present", part).as_str().yellow(),
        StepStatus::Planned => format!("{} planned (dry run)", part).as_str().cyan(),
    };
    format!("- {}: {}", step.step.label(), outcome)
}

/// Closing line of a run
pub fn done_line(dry_run: bool) -> String {
    if dry_run {
        format!("{} {}", "## done.".bold(), "(dry run, nothing written)".dimmed())
    } else {
        "## done.".bold().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_codegen::Artifact;
    use std::path::PathBuf;

    fn report(step: Artifact, status: StepStatus) -> StepReport {
        StepReport {
            step,
            path: PathBuf::from("src/x.ts"),
            status,
        }
    }

    #[test]
    fn test_step_lines() {
        colored::control::set_override(false);

        assert_eq!(
            step_line(&report(Artifact::Interface, StepStatus::Written)),
            "- Interface: code ok"
        );
        assert_eq!(
            step_line(&report(Artifact::ServiceIndex, StepStatus::Inserted)),
            "- Service: index ok"
        );
        assert_eq!(
            step_line(&report(Artifact::ModelIndex, StepStatus::AlreadyPresent)),
            "- Model: index already present"
        );
        assert_eq!(
            step_line(&report(Artifact::ErrorCatalog, StepStatus::Planned)),
            "- Errors: catalog planned (dry run)"
        );
        assert_eq!(done_line(false), "## done.");
        assert_eq!(done_line(true), "## done. (dry run, nothing written)");
    }
}
