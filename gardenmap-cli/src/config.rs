use crate::error::{CliError, CliResult};
use gardenmap_spatial::ShapeConfig;
use gardenmap_zones::MemoryZoneStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const GARDENMAP_DIR: &str = ".gardenmap";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "store.json";

/// Default config.toml written by `gardenmap init`.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# gardenmap project configuration

[shapes]
# Radius given to points entered as "x,y" without a third value.
default_radius = 250.0

# Per-category radius for bare points.
# [shapes.radius_overrides]
# poi_point = 50.0
# other_point = 100.0
"#;

/// Contents of `.gardenmap/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub shapes: ShapeConfig,
}

/// Walk up from `start` looking for a `.gardenmap/` directory.
fn find_project_dir_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(GARDENMAP_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Find `.gardenmap/` by walking up from cwd. Returns `None` if not found.
pub fn find_project_dir() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_project_dir_from(&cwd)
}

/// Resolve a `--config` override to a `.gardenmap/` directory path.
///
/// Accepts either a file inside the directory (its parent is used) or the
/// directory itself.
fn resolve_config_override(p: &Path) -> CliResult<PathBuf> {
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if resolved.is_file() {
        let dir = resolved
            .parent()
            .ok_or_else(|| {
                CliError::Config(format!(
                    "cannot determine parent of: {}",
                    resolved.display()
                ))
            })?
            .to_path_buf();
        return Ok(dir);
    }

    if resolved.is_dir() {
        return Ok(resolved);
    }

    Err(CliError::Config(format!(
        "config path does not exist: {}",
        p.display()
    )))
}

/// Require a `.gardenmap/` directory, from `--config` or by walking up.
pub fn require_project_dir(config_override: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(p) = config_override {
        return resolve_config_override(p);
    }
    find_project_dir().ok_or(CliError::NoProjectDir)
}

/// Create `.gardenmap/` in the current directory with a default config and an
/// empty store. Existing files are left alone.
pub fn init_project_dir() -> CliResult<PathBuf> {
    let project_dir = std::env::current_dir()?.join(GARDENMAP_DIR);

    fs::create_dir_all(&project_dir).map_err(|e| {
        CliError::Config(format!("failed to create {}: {e}", project_dir.display()))
    })?;

    let config_path = project_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| {
            CliError::Config(format!("failed to create {}: {e}", config_path.display()))
        })?;
    }

    let store_path = store_path(&project_dir);
    if !store_path.exists() {
        MemoryZoneStore::open(&store_path)?.flush()?;
    }

    Ok(project_dir)
}

/// Load `config.toml`; a missing file gives the defaults.
pub fn load_project_config(project_dir: &Path) -> CliResult<ProjectConfig> {
    let path = project_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
    let config: ProjectConfig = toml::from_str(&content)
        .map_err(|e| CliError::Config(format!("invalid {}: {e}", path.display())))?;
    config
        .shapes
        .validate()
        .map_err(|e| CliError::Config(format!("invalid {}: {e}", path.display())))?;
    Ok(config)
}

pub fn store_path(project_dir: &Path) -> PathBuf {
    project_dir.join(STORE_FILE)
}
