//! Build-time configuration. Everything here is fixed when the kernel image is
//! built: cargo features pick the log sinks and the EOI policy, and the
//! `GLASGOW_LOG_LEVEL` environment variable picks the initial log filter.

use bitflags::bitflags;
use log::LevelFilter;

use crate::pic::defs::EoiPolicy;

pub const KERNEL_NAME: &str = "Glasgow";
pub const KERNEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `GLASGOW_LOG_LEVEL` is unset or unreadable
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(feature = "single-eoi")]
pub const EOI_POLICY: EoiPolicy = EoiPolicy::Once;
#[cfg(not(feature = "single-eoi"))]
pub const EOI_POLICY: EoiPolicy = EoiPolicy::Twice;

bitflags! {
    pub struct LoggingModes: u8 {
        const NONE = 0;
        const VGA = 1 << 0;
        const SERIAL = 1 << 1;
    }
}

/// Sinks compiled into this image
pub fn logging_modes() -> LoggingModes {
    let mut modes = LoggingModes::NONE;
    if cfg!(feature = "vga") {
        modes |= LoggingModes::VGA;
    }
    if cfg!(feature = "console") {
        modes |= LoggingModes::SERIAL;
    }
    modes
}

pub fn log_level() -> LevelFilter {
    parse_log_level(option_env!("GLASGOW_LOG_LEVEL"))
}

fn parse_log_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}
