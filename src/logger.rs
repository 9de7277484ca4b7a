//! Logger setup for the stamp binary.

/// Initializes env_logger, silent unless `verbose` is set.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();
}
