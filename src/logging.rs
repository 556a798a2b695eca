/// Initialize logging.
///
/// Logs go to stderr so stdout stays a clean status line. `RUST_LOG`
/// overrides the default filter.
pub fn init(verbose: bool) {
    use env_logger::Env;

    let default_filter = if verbose {
        "widget_bar=debug"
    } else if cfg!(debug_assertions) {
        "widget_bar=info"
    } else {
        "widget_bar=warn"
    };

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}
