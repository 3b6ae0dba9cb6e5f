use crate::context::{self, Project};
use crate::error::CliResult;
use gardenmap_zones::ZoneStore;
use std::path::Path;

pub fn run(project_dir: &Path, category: &str, id: u64) -> CliResult<()> {
    let reference = context::entity_ref(category, id)?;
    let mut project = Project::open(project_dir)?;
    let removed = project
        .store_mut()
        .transaction(|tables| tables.delete_entity(reference))?;
    println!("Deleted {} '{}'", removed.reference(), removed.name());
    Ok(())
}
