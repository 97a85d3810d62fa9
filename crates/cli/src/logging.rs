use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "funnelaudit=info,funnelaudit_engine=info";
const QUIET_DIRECTIVES: &str = "warn";

/// Install the stderr subscriber. stdout is reserved for the report.
///
/// `RUST_LOG` wins over the defaults when set.
pub fn init_logging(quiet: bool) {
    let default = if quiet { QUIET_DIRECTIVES } else { DEFAULT_DIRECTIVES };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
