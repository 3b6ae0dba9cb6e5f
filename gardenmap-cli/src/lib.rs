//! gardenmap CLI library.
//!
//! Types, command handlers and helpers behind the `gardenmap` binary. Each
//! mutating command runs as one store transaction and writes the project's
//! `store.json` only on success.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod input;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::init::run(),

        Commands::Add {
            category,
            name,
            input,
        } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::submit::run(&project_dir, &category, None, &name, &input)
        }

        Commands::Edit {
            category,
            id,
            name,
            input,
        } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::submit::run(&project_dir, &category, Some(id), &name, &input)
        }

        Commands::Delete { category, id } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::delete::run(&project_dir, &category, id)
        }

        Commands::SetActive { id, active } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::set_active::run(&project_dir, id, active)
        }

        Commands::List { category } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::list::run(&project_dir, category.as_deref())
        }

        Commands::Map { focus } => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::map::run_map(&project_dir, &focus)
        }

        Commands::Boundaries => {
            let project_dir = config::require_project_dir(config_path)?;
            commands::map::run_boundaries(&project_dir)
        }
    }
}
