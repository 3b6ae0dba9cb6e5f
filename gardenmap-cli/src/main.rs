use clap::Parser;
use gardenmap_cli::cli::Cli;
use gardenmap_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet always silences logs. --verbose shows info (or RUST_LOG when
    // set). Without either flag logs stay off so stdout JSON stays clean.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Errors go to stderr, so piping stdout does not disable color.
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = gardenmap_cli::run(cli) {
        exit_with_error(e);
    }
}
