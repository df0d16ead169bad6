use colored::Colorize;
use fern::Dispatch;
use log::{Level, LevelFilter};

/// Stdout logger: millisecond timestamps, one color per level. Styles
/// the library crates' own log output the same as padmon's.
pub(crate) fn setup(verbose: bool, no_color: bool) {
    if no_color {
        colored::control::set_override(false);
    }
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Dispatch::new()
        .format(|out, message, record| {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let line = format!("[{now}] {message}");
            let line = match record.level() {
                Level::Error => line.bright_red().to_string(),
                Level::Warn => line.yellow().to_string(),
                Level::Debug | Level::Trace => line.dimmed().to_string(),
                Level::Info => line,
            };
            out.finish(format_args!("{line}"));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .expect("Unable to set up logger");
}
