use crate::context::{self, or_dash, Project};
use crate::error::CliResult;
use comfy_table::{ContentArrangement, Table};
use gardenmap_zones::{EntityRef, OwnerRef, ZoneStore};
use std::path::Path;

pub fn run(project_dir: &Path, category: Option<&str>) -> CliResult<()> {
    let filter = category.map(context::parse_category).transpose()?;
    let project = Project::open(project_dir)?;
    let tables = project.store().tables();

    let records: Vec<_> = tables
        .geometry_records()?
        .into_iter()
        .filter(|r| filter.map_or(true, |c| r.category == c))
        .collect();

    if records.is_empty() {
        println!("No geometry found. Run 'gardenmap add <category>' to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID", "CATEGORY", "KIND", "NAME", "OWNER", "SUB-REGION", "REGION",
    ]);

    for record in &records {
        let owner = record.owner.map(|o| match o {
            OwnerRef::Region(id) => EntityRef::Region(id),
            OwnerRef::SubRegion(id) => EntityRef::SubRegion(id),
            OwnerRef::PointOfInterest(id) => EntityRef::PointOfInterest(id),
        });
        let entity = match owner {
            Some(reference) => tables.entity(reference)?,
            None => None,
        };
        table.add_row(vec![
            record.id.0.to_string(),
            record.category.to_string(),
            record.kind.to_string(),
            record.name.clone(),
            or_dash(owner),
            or_dash(entity.as_ref().and_then(|e| e.sub_region_id())),
            or_dash(entity.as_ref().and_then(|e| e.region_id())),
        ]);
    }

    println!("{table}");
    Ok(())
}
