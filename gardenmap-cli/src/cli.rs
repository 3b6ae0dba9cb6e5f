use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gardenmap", about = "Garden map zone manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to config file or .gardenmap/ directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new .gardenmap/ project directory
    Init,

    /// Create an entity and assign its geometry
    Add {
        /// Shape category (region, sub_region, poi_point, poi_group, other_point, other_polygon)
        category: String,

        /// Display name
        #[arg(long, short = 'n')]
        name: String,

        #[command(flatten)]
        input: ShapeInput,
    },

    /// Re-submit the geometry of an existing entity
    Edit {
        /// Shape category; selects which kind of entity <id> refers to
        category: String,

        /// Entity id
        id: u64,

        /// Display name
        #[arg(long, short = 'n')]
        name: String,

        #[command(flatten)]
        input: ShapeInput,
    },

    /// Delete an entity and its geometry
    Delete {
        /// Shape category; selects which kind of entity <id> refers to
        category: String,

        /// Entity id
        id: u64,
    },

    /// Mark a point of interest active or inactive
    SetActive {
        /// Point-of-interest id
        id: u64,

        /// New flag value (true or false)
        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// List geometry records
    List {
        /// Only show records of this category
        category: Option<String>,
    },

    /// Print the map payload as JSON, grouped by category
    Map {
        /// Geometry ids to highlight
        #[arg(long, num_args = 1..)]
        focus: Vec<u64>,
    },

    /// Print zone outlines as JSON
    Boundaries,
}

/// Where shape text comes from: `--data` > `--file` > stdin.
#[derive(clap::Args)]
pub struct ShapeInput {
    /// Inline shape text ("x,y[,r]" or one "x,y" pair per line)
    #[arg(long, short = 'd', conflicts_with = "file")]
    pub data: Option<String>,

    /// Read shape text from a file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}
