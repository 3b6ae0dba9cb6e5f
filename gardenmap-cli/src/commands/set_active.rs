use crate::context::Project;
use crate::error::CliResult;
use gardenmap_zones::{Entity, EntityRef, PoiId, ZoneError, ZoneStore};
use std::path::Path;

pub fn run(project_dir: &Path, id: u64, active: bool) -> CliResult<()> {
    let reference = EntityRef::PointOfInterest(PoiId(id));
    let mut project = Project::open(project_dir)?;
    project.store_mut().transaction(|tables| {
        match tables.entity(reference)? {
            Some(Entity::PointOfInterest(mut poi)) => {
                poi.active = active;
                tables.save_entity(&Entity::PointOfInterest(poi))
            }
            _ => Err(ZoneError::NotFound(reference)),
        }
    })?;

    let state = if active { "active" } else { "inactive" };
    println!("Marked {reference} {state}");
    Ok(())
}
