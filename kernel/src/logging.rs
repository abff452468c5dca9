use core::fmt::{self, Write};

use log::{Level, LevelFilter};
use spin::Mutex;

use crate::{
    devices::{console::Console, vga::Color},
    x86::hardware::Hardware,
};

/// Colour of everything that is not a log line
pub const TEXT_COLOR: Color = Color::LightGray;

pub fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::LightRed,
        Level::Warn => Color::Yellow,
        Level::Info => Color::LightGray,
        Level::Debug | Level::Trace => Color::DarkGray,
    }
}

/// Level names are padded so messages line up
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Write one line as `[LEVEL] SUBSYSTEM: message`. The log target is the subsystem tag.
pub fn write_record<H: Hardware>(
    console: &mut Console<H>,
    level: Level,
    target: &str,
    args: &fmt::Arguments,
) -> fmt::Result {
    console.set_color(level_color(level), Color::Black);
    let result = writeln!(console, "[{}] {}: {}", level_name(level), target, args);
    console.set_color(TEXT_COLOR, Color::Black);
    result
}

/// Like `write_record`, but gives up when the console is already held. On a single
/// core the holder is the code this CPU interrupted, so waiting would never end.
/// Returns whether the line was written.
pub fn try_write_record<H: Hardware>(
    console: &Mutex<Console<H>>,
    level: Level,
    target: &str,
    args: &fmt::Arguments,
) -> bool {
    match console.try_lock() {
        Some(mut console) => write_record(&mut *console, level, target, args).is_ok(),
        None => false,
    }
}

pub struct KernelLogger;

#[cfg(target_arch = "x86")]
impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        use crate::{devices::console::CONSOLE, sync::cpu_cli::without_interrupts};

        if self.enabled(record.metadata()) {
            without_interrupts(|| {
                try_write_record(&CONSOLE, record.level(), record.target(), record.args())
            });
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "x86")]
static LOGGER: KernelLogger = KernelLogger;

/// Install the console logger. Fails if a logger is already installed.
#[cfg(target_arch = "x86")]
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);

    log::info!(target: "KLOG", "Kernel logging system initialized");
    Ok(())
}

pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
    log::info!(target: "KLOG", "Log level set to {}", level);
}
