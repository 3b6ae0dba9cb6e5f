use crate::config;
use crate::error::CliResult;

pub fn run() -> CliResult<()> {
    let project_dir = config::init_project_dir()?;
    println!("Initialized gardenmap in {}", project_dir.display());
    Ok(())
}
