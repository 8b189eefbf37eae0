//! Configuration file support for jrewrite
//!
//! Loads `.jrewrite.toml` from the current directory or its parents.

use anyhow::{Context, Result};
use jrewrite_imports::ImportConfig;
use jrewrite_rewrite::FormattingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".jrewrite.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub imports: ImportConfig,
    pub format: FormattingConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

/// Command line values that take precedence over the file
#[derive(Debug, Default)]
pub struct ImportOverrides {
    pub order: Option<String>,
    pub threshold: Option<usize>,
    pub static_threshold: Option<usize>,
}

impl Config {
    /// Load config from `.jrewrite.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Import options after applying command line overrides.
    ///
    /// New import blocks in files without any line break use the `[format]`
    /// line ending.
    pub fn effective_imports(&self, overrides: &ImportOverrides) -> ImportConfig {
        let mut imports = self.imports.clone();
        if let Some(order) = &overrides.order {
            imports.order = ImportConfig::parse_order(order);
        }
        if let Some(threshold) = overrides.threshold {
            imports.on_demand_threshold = threshold;
        }
        if let Some(threshold) = overrides.static_threshold {
            imports.static_on_demand_threshold = threshold;
        }
        imports.line_ending = self.format.whitespace.line_ending;
        imports
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                // Also try matching against just the file/dir name
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}
