//! Shared project context for commands.

use crate::config::{self, ProjectConfig};
use crate::error::CliResult;
use gardenmap_spatial::ShapeCategory;
use gardenmap_zones::{EntityRef, HierarchySync, MemoryZoneStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An opened `.gardenmap/` project: its config and zone store.
pub struct Project {
    dir: PathBuf,
    config: ProjectConfig,
    store: MemoryZoneStore,
}

impl Project {
    pub fn open(dir: &Path) -> CliResult<Self> {
        let config = config::load_project_config(dir)?;
        let store = MemoryZoneStore::open(config::store_path(dir))?;
        debug!(dir = %dir.display(), "opened project");
        Ok(Self {
            dir: dir.to_path_buf(),
            config,
            store,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn store(&self) -> &MemoryZoneStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryZoneStore {
        &mut self.store
    }

    pub fn sync(&self) -> HierarchySync {
        HierarchySync::new(self.config.shapes.clone())
    }
}

/// Parse a category argument.
pub fn parse_category(raw: &str) -> CliResult<ShapeCategory> {
    Ok(raw.parse::<ShapeCategory>()?)
}

/// Entity addressed by `<category> <id>` on the command line.
pub fn entity_ref(category: &str, id: u64) -> CliResult<EntityRef> {
    Ok(EntityRef::from_category(parse_category(category)?, id))
}

/// Render an optional link for human output.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
