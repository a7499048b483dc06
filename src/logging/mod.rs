use tracing::Level;

/// Installs the global `tracing` subscriber. Calling it again is a no-op.
///
/// Browsers have no clock usable by the default timer and no ANSI support, so
/// both are disabled. In the browser, events go to the devtools console at their
/// own level (`console.error`, `console.warn`, ...); elsewhere to stderr.
pub(crate) fn init(level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .with_ansi(false)
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let builder = builder.with_writer(tracing_web::MakeWebConsoleWriter::new());
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.with_writer(std::io::stderr);

    if builder.try_init().is_ok() {
        tracing::debug!(%level, "logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(Level::DEBUG);
        init(Level::INFO);
        tracing::info!("still logging");
    }
}
