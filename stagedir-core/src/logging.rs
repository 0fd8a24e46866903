use log::LevelFilter;

/// Initialise `env_logger` on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` (or `info`) applies. Safe to
/// call more than once: later calls are ignored.
pub fn init(level: Option<LevelFilter>) {
    use env_logger::{Env, Target};

    let default = level.unwrap_or(LevelFilter::Info).to_string();
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init();
}
