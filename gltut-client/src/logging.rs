//! Logger setup.
//!
//! Records go to stderr as `[HH:MM:SS.mmm LEVEL target] message`.

/// Installs the global logger. Call once, early in `main`; a second call
/// returns the error from [`log::set_boxed_logger`].
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
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
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    log::debug!("logging initialized at {level}");
    Ok(())
}
