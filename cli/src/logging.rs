use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEBUG_DIRECTIVE: &str = "zentao_core=debug,zentao=debug";
const DEFAULT_DIRECTIVE: &str = "warn";

/// `RUST_LOG` wins when set; otherwise `ZENTAO_DEBUG=1` turns on crate debug output.
pub fn filter_directive(rust_log: Option<&str>, debug: bool) -> String {
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None if debug => DEBUG_DIRECTIVE.to_string(),
        None => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Diagnostics only ever go to stderr so stdout stays machine-readable.
pub fn init_tracing(debug: bool) -> Result<(), String> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(filter_directive(rust_log.as_deref(), debug))
        .map_err(|e| e.to_string())?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
