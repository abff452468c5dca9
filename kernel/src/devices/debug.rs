use core::fmt;

/* ************ Macros ************ */

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::devices::debug::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

// Prints to every console sink. Interrupts stay off while the console is
// locked so an IRQ that logs cannot spin on a lock its own CPU holds.
#[cfg(target_arch = "x86")]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;

    use super::console::CONSOLE;
    use crate::sync::cpu_cli::without_interrupts;

    without_interrupts(|| {
        let _ = CONSOLE.lock().write_fmt(args);
    });
}

// There is no console off target; formatted output is discarded.
#[cfg(not(target_arch = "x86"))]
pub fn _print(args: fmt::Arguments) {
    let _ = args;
}
