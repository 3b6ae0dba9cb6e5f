use colored::Colorize;
use gardenmap_spatial::SpatialError;
use gardenmap_zones::ZoneError;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the zone layer that is not the user's fault.
    Zone(ZoneError),
    /// Rejected shape text (malformed or degenerate geometry).
    Validation(String),
    /// Configuration / init issues.
    Config(String),
    /// Bad file path, unreadable input.
    Input(String),
    /// Entity not found.
    NotFound(String),
    /// `.gardenmap/` directory not found.
    NoProjectDir,
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Zone(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Validation(msg) => write!(
                f,
                "{} {msg}\n  {} shapes are \"x,y[,r]\" or one \"x,y\" pair per line",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::NotFound(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::NoProjectDir => write!(
                f,
                "{} no .gardenmap/ directory found\n  {} run 'gardenmap init' to initialize",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<ZoneError> for CliError {
    fn from(e: ZoneError) -> Self {
        match e {
            e if e.is_user_error() => CliError::Validation(e.to_string()),
            ZoneError::Spatial(e @ SpatialError::UnknownCategory(_)) => {
                CliError::Usage(e.to_string())
            }
            ZoneError::NotFound(reference) => CliError::NotFound(format!("{reference} not found")),
            other => CliError::Zone(other),
        }
    }
}

impl From<SpatialError> for CliError {
    fn from(e: SpatialError) -> Self {
        ZoneError::from(e).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) | CliError::Validation(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gardenmap_zones::{EntityRef, RegionId};

    #[test]
    fn test_zone_error_classification() {
        let malformed: CliError = ZoneError::from(SpatialError::MalformedShape("x".into())).into();
        assert!(matches!(malformed, CliError::Validation(_)));

        let unknown: CliError = SpatialError::UnknownCategory("pond".into()).into();
        assert!(matches!(unknown, CliError::Usage(_)));

        let missing: CliError = ZoneError::NotFound(EntityRef::Region(RegionId(4))).into();
        match missing {
            CliError::NotFound(msg) => assert_eq!(msg, "region #4 not found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
