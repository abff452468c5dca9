pub mod defs;
pub mod error;
pub mod hardware;

#[cfg(target_arch = "x86")]
pub mod helpers;
