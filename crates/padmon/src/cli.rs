use clap::Parser;

/// Watches gamepads and prints every attach, detach and control value
/// change. Runs against a scripted demo device.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Milliseconds between scripted demo reports
    #[arg(long, default_value_t = 250)]
    pub interval: u64,
}
