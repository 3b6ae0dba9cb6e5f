use crate::context::Project;
use crate::error::CliResult;
use gardenmap_zones::{boundaries, collect, GeometryId, ZoneStore};
use std::collections::HashSet;
use std::path::Path;

/// Print the grouped map payload.
pub fn run_map(project_dir: &Path, focus: &[u64]) -> CliResult<()> {
    let project = Project::open(project_dir)?;
    let tables = project.store().tables();
    let records = tables.geometry_records()?;
    let focus_ids: HashSet<GeometryId> = focus.iter().copied().map(GeometryId).collect();

    let payload = collect(
        &records,
        &focus_ids,
        &tables.owner_index(),
        &project.config().shapes,
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Print the boundary overlay.
pub fn run_boundaries(project_dir: &Path) -> CliResult<()> {
    let project = Project::open(project_dir)?;
    let records = project.store().tables().geometry_records()?;
    println!("{}", serde_json::to_string_pretty(&boundaries(&records))?);
    Ok(())
}
