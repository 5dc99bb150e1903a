//! Configuration file handling
//!
//! An optional `add-model.toml` at the project root overrides the emitter
//! defaults. Command-line flags win over the file.
//!
//! ```toml
//! migrations_dir = "db/migrations"
//! source_dir = "src"
//! extension = "ts"
//! api_kit_module = "@d-lab/api-kit"
//! create_dirs = false
//! ```

use modelgen_codegen::EmitterConfig;
use modelgen_core::{ScaffoldError, ScaffoldResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Cli;

/// File looked up at the project root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "add-model.toml";

/// Contents of `add-model.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub migrations_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub api_kit_module: Option<String>,
    pub create_dirs: Option<bool>,
}

impl ConfigFile {
    /// Parse TOML text; `origin` names the file in error messages
    pub fn parse(text: &str, origin: &Path) -> ScaffoldResult<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| ScaffoldError::config(format!("{}: {}", origin.display(), e.message())))?;
        file.validate(origin)?;
        Ok(file)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> ScaffoldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScaffoldError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text, path)
    }

    fn validate(&self, origin: &Path) -> ScaffoldResult<()> {
        if let Some(ext) = &self.extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err(ScaffoldError::config(format!(
                    "{}: extension must not be empty",
                    origin.display()
                )));
            }
        }
        if let Some(module) = &self.api_kit_module {
            if module.trim().is_empty() {
                return Err(ScaffoldError::config(format!(
                    "{}: api_kit_module must not be empty",
                    origin.display()
                )));
            }
        }
        Ok(())
    }

    /// Overlay the file's settings on `config`
    pub fn apply(self, mut config: EmitterConfig) -> EmitterConfig {
        if let Some(dir) = self.migrations_dir {
            config = config.with_migrations_dir(dir);
        }
        if let Some(dir) = self.source_dir {
            config = config.with_source_dir(dir);
        }
        if let Some(ext) = self.extension {
            config = config.with_extension(ext.trim_start_matches('.'));
        }
        if let Some(module) = self.api_kit_module {
            config = config.with_api_kit_module(module);
        }
        if let Some(create_dirs) = self.create_dirs {
            config.create_dirs = create_dirs;
        }
        config
    }
}

/// Build the emitter configuration for an invocation.
///
/// Defaults, then the configuration file, then command-line flags.
pub fn resolve_config(cli: &Cli) -> ScaffoldResult<EmitterConfig> {
    let mut config = EmitterConfig::new().with_root(&cli.root);

    let file = match &cli.config {
        Some(path) => Some(ConfigFile::load(path)?),
        None => {
            let default = cli.root.join(CONFIG_FILE_NAME);
            if default.is_file() {
                tracing::debug!(path = %default.display(), "using configuration file");
                Some(ConfigFile::load(&default)?)
            } else {
                None
            }
        }
    };
    if let Some(file) = file {
        config = file.apply(config);
    }

    if cli.create_dirs {
        config = config.create_dirs();
    }
    if cli.dry_run {
        config = config.dry_run();
    }

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
