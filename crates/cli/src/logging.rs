use tracing_subscriber::EnvFilter;

/// Install the stderr logger. stdout is reserved for command output (the merged CSV).
///
/// `RUST_LOG` overrides the default level; `quiet` drops the default to warnings.
pub fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tedlink={level},tedlink_recon={level},tedlink_io={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
