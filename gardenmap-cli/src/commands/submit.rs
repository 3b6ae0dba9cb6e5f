use crate::cli::ShapeInput;
use crate::context::{or_dash, Project};
use crate::error::CliResult;
use crate::input;
use gardenmap_zones::{Entity, GeometryForm};
use std::path::Path;

/// Create (`existing = None`) or edit an entity from shape text.
pub fn run(
    project_dir: &Path,
    category: &str,
    existing: Option<u64>,
    name: &str,
    shape_input: &ShapeInput,
) -> CliResult<()> {
    let source = input::resolve_input(shape_input)?;
    let data = input::read_input(&source)?;

    let mut project = Project::open(project_dir)?;
    let sync = project.sync();
    let form = GeometryForm::new(category, name, data);
    let entity = project
        .store_mut()
        .transaction(|tables| sync.submit(tables, existing, &form))?;

    let verb = if existing.is_some() { "Updated" } else { "Added" };
    println!("{verb} {} '{}'", entity.reference(), entity.name());
    print_links(&entity);
    Ok(())
}

fn print_links(entity: &Entity) {
    if let Some(record) = entity.geometry() {
        println!("  geometry:   {} ({}, {})", record.id, record.category, record.kind);
    }
    match entity {
        Entity::SubRegion(s) => {
            println!("  region:     {}", or_dash(s.region_id));
        }
        Entity::PointOfInterest(p) => {
            println!("  sub-region: {}", or_dash(p.sub_region_id));
            println!("  region:     {}", or_dash(p.region_id));
        }
        Entity::Region(_) | Entity::Landmark(_) => {}
    }
}
