//! Logger setup.

use log::LevelFilter;

/// Installs a `fern` logger writing timestamped records to stdout.
///
/// The dispatcher itself lets everything through; verbosity is controlled with
/// [`log::set_max_level`], so it can be adjusted once the configuration is known.
pub fn init() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply()?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}
