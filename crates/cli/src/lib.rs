//! # Modelgen CLI
//!
//! Command-line interface for add-model.
//!
//! ```text
//! add-model [OPTIONS] <MIGRATION>
//! ```
//!
//! The migration is read and parsed completely before the first file is
//! written, so a migration with an unknown column type leaves the project
//! untouched.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | usage or configuration error |
//! | 2 | the migration could not be found or parsed |
//! | 3 | I/O error, including a registry without its block |
//!

pub mod config;
pub mod output;

pub use config::{CONFIG_FILE_NAME, ConfigFile, resolve_config};

use clap::Parser;
use colored::Colorize;
use modelgen_codegen::{EmitReport, Emitter};
use modelgen_core::{ErrorKind, ResultExt, ScaffoldError, ScaffoldResult};
use modelgen_ir::{read_migration, resolve_migration};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Arguments
// ============================================================================

/// Scaffold Sequelize interfaces, models, repositories and services from a
/// migration.
#[derive(Debug, Clone, Parser)]
#[command(name = "add-model", version, about)]
pub struct Cli {
    /// Migration name, e.g. `create-orders` for `migrations/create-orders.ts`
    pub migration: String,

    /// Project root
    #[arg(long, env = "ADD_MODEL_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file [default: <ROOT>/add-model.toml when present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Render and report without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Create missing output directories
    #[arg(long)]
    pub create_dirs: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

// ============================================================================
// Exit status
// ============================================================================

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Usage,
    Parse,
    Io,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Usage => 1,
            ExitStatus::Parse => 2,
            ExitStatus::Io => 3,
        }
    }

    pub fn from_error(err: &ScaffoldError) -> Self {
        match err.kind() {
            ErrorKind::Usage | ErrorKind::Config => ExitStatus::Usage,
            ErrorKind::Parse => ExitStatus::Parse,
            ErrorKind::Io => ExitStatus::Io,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

// ============================================================================
// Running
// ============================================================================

/// Run one invocation, printing progress to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> ScaffoldResult<EmitReport> {
    let name = cli.migration.trim();
    if name.is_empty() {
        return Err(ScaffoldError::usage("the migration name is empty"));
    }

    let config = resolve_config(cli)?;

    writeln!(out, "{} {}", "## Generate code for".bold(), name)?;

    // Parse everything before the first write
    let path = resolve_migration(&config.migrations_root(), name, &config.extension)?;
    let model = read_migration(&path)?;
    tracing::debug!(
        migration = %path.display(),
        model = %model.names.model,
        columns = model.columns.len(),
        "migration parsed",
    );

    let dry_run = config.dry_run;
    let report = Emitter::new(config).emit(&model, |step| {
        if let Err(e) = writeln!(out, "{}", output::step_line(step)) {
            tracing::warn!("failed to print progress: {}", e);
        }
    })?;

    writeln!(out, "{}", output::done_line(dry_run))?;
    out.flush().with_context("flushing progress output")?;

    Ok(report)
}

/// Parse `args` and run, writing progress to `stdout` and errors to
/// `stderr`.
pub fn run_from_args<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind as ClapKind;
            return match err.kind() {
                ClapKind::DisplayHelp | ClapKind::DisplayVersion => {
                    let _ = write!(stdout, "{}", err);
                    ExitStatus::Success
                }
                _ => {
                    let _ = write!(stderr, "{}", err);
                    ExitStatus::Usage
                }
            };
        }
    };

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli, stdout) {
        Ok(_) => ExitStatus::Success,
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            let _ = writeln!(stderr, "{} {}", "error:".red().bold(), err);
            ExitStatus::from_error(&err)
        }
    }
}

/// Entry point used by the `add-model` binary
pub fn run_from_env() -> ExitCode {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    run_from_args(std::env::args_os(), &mut stdout.lock(), &mut stderr.lock()).into()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const ORDERS: &str = r#"module.exports = {
    up: async (queryInterface, Sequelize) => {
        await queryInterface.createTable("orders", {
            id: { type: Sequelize.INTEGER, primaryKey: true },
            total: { type: Sequelize.DECIMAL, allowNull: true },
            created_at: { type: Sequelize.DATE },
            updated_at: { type: Sequelize.DATE },
        })
    },
}
"#;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("migrations")).unwrap();
        fs::write(dir.path().join("migrations/create-orders.ts"), ORDERS).unwrap();
        dir
    }

    fn invoke(args: &[&str]) -> (ExitStatus, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut argv = vec!["add-model", "--no-color"];
        argv.extend_from_slice(args);
        let status = run_from_args(argv, &mut stdout, &mut stderr);
        (
            status,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "add-model",
            "create-orders",
            "--root",
            "/srv/app",
            "--dry-run",
            "--create-dirs",
        ])
        .unwrap();

        assert_eq!(cli.migration, "create-orders");
        assert_eq!(cli.root, PathBuf::from("/srv/app"));
        assert!(cli.dry_run);
        assert!(cli.create_dirs);
        assert!(!cli.no_color);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let (status, stdout, stderr) = invoke(&[]);
        assert_eq!(status, ExitStatus::Usage);
        assert!(stdout.is_empty());
        assert!(stderr.contains("Usage:"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(
            ExitStatus::from_error(&ScaffoldError::usage("x")),
            ExitStatus::Usage
        );
        assert_eq!(
            ExitStatus::from_error(&ScaffoldError::config("x")),
            ExitStatus::Usage
        );
        assert_eq!(
            ExitStatus::from_error(&ScaffoldError::unknown_type("a", "GEOMETRY")),
            ExitStatus::Parse
        );
        assert_eq!(
            ExitStatus::from_error(&ScaffoldError::DirectoryMissing(PathBuf::from("src"))),
            ExitStatus::Io
        );
        assert_eq!(ExitStatus::Io.code(), 3);
    }

    #[test]
    fn test_run_prints_progress() {
        let dir = project();
        let root = dir.path().to_string_lossy().to_string();

        let (status, stdout, stderr) = invoke(&["create-orders", "--root", &root, "--create-dirs"]);

        assert_eq!(status, ExitStatus::Success, "{}", stderr);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(
            lines,
            vec![
                "## Generate code for create-orders",
                "- Interface: code ok",
                "- Interface: index ok",
                "- Model: code ok",
                "- Model: index ok",
                "- Database: initializer ok",
                "- Repository: code ok",
                "- Repository: index ok",
                "- Service: code ok",
                "- Service: index ok",
                "- Errors: catalog ok",
                "## done.",
            ]
        );
        assert!(dir.path().join("src/models/order.model.ts").is_file());
    }

    #[test]
    fn test_second_run_reports_present_entries() {
        let dir = project();
        let root = dir.path().to_string_lossy().to_string();

        invoke(&["create-orders", "--root", &root, "--create-dirs"]);
        let (status, stdout, _) = invoke(&["create-orders", "--root", &root]);

        assert_eq!(status, ExitStatus::Success);
        assert!(stdout.contains("- Model: index already present\n"));
        assert!(stdout.contains("- Model: code ok\n"));
    }

    #[test]
    fn test_extension_in_name_is_accepted() {
        let dir = project();
        let root = dir.path().to_string_lossy().to_string();

        let (status, _, stderr) =
            invoke(&["create-orders.ts", "--root", &root, "--create-dirs", "--dry-run"]);
        assert_eq!(status, ExitStatus::Success, "{}", stderr);
    }

    #[test]
    fn test_unknown_type_writes_nothing() {
        let dir = project();
        fs::write(
            dir.path().join("migrations/create-shapes.ts"),
            "createTable(\"shapes\", { area: { type: Sequelize.GEOMETRY } })",
        )
        .unwrap();
        let root = dir.path().to_string_lossy().to_string();

        let (status, _, stderr) = invoke(&["create-shapes", "--root", &root, "--create-dirs"]);

        assert_eq!(status, ExitStatus::Parse);
        assert!(stderr.contains("GEOMETRY"));
        assert!(!dir.path().join("src").exists());
    }

    #[test]
    fn test_missing_migration() {
        let dir = project();
        let root = dir.path().to_string_lossy().to_string();

        let (status, _, stderr) = invoke(&["create-users", "--root", &root]);
        assert_eq!(status, ExitStatus::Parse);
        assert!(stderr.contains("Migration not found"));
    }

    #[test]
    fn test_missing_output_directory_is_io_error() {
        let dir = project();
        let root = dir.path().to_string_lossy().to_string();

        let (status, stdout, stderr) = invoke(&["create-orders", "--root", &root]);
        assert_eq!(status, ExitStatus::Io);
        assert!(stderr.contains("Output directory does not exist"));
        assert!(!stdout.contains("## done."));
    }

    #[test]
    fn test_blank_migration_name() {
        let (status, _, stderr) = invoke(&["  "]);
        assert_eq!(status, ExitStatus::Usage);
        assert!(stderr.contains("migration name is empty"));
    }
}
