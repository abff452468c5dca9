#![cfg_attr(all(not(test), target_os = "none"), no_std)]
#![cfg_attr(all(not(test), target_os = "none"), no_main)]

pub mod boot;
pub mod config;
pub mod devices;
pub mod interrupts;
pub mod logging;
pub mod memory;
pub mod misc;
pub mod pic;
pub mod sync;
pub mod x86;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "x86")]
use crate::{
    devices::{console::CONSOLE, vga::Color},
    x86::helpers::{cli, halt_forever, hlt},
};

// Entered from the bootloader in 32-bit protected mode, interrupts off. Never returns
#[cfg(target_arch = "x86")]
#[no_mangle]
pub extern "C" fn kernel_main() -> ! {
    use log::{error, info};

    use crate::{boot::Boot, interrupts::trampolines, x86::hardware::Cpu};

    // Initialize debugging method (VGA or Serial)
    devices::console::setup_console(config::logging_modes());
    if logging::init(config::log_level()).is_err() {
        kernel_panic("Kernel logger installed twice");
    }
    misc::logo::print_logo();

    info!(target: "BOOT", "{} kernel starting up...", config::KERNEL_NAME);

    let boot = match Boot::start() {
        Some(boot) => boot,
        None => kernel_panic("Boot sequence entered twice"),
    };

    // Segments, then the trap table, then the controller. Interrupts stay off until all three are in
    let running = boot
        .load_segments()
        .and_then(|boot| boot.load_interrupts(&trampolines::entry_points()))
        .and_then(|boot| boot.remap_controller(&mut Cpu));

    match running {
        Ok(running) => running.enable_interrupts(),
        Err(err) => {
            error!(target: "BOOT", "{}", err);
            kernel_panic("Kernel initialization failed");
        }
    }

    info!(target: "BOOT", "Kernel initialization complete");
    info!(target: "SYS", "Entering main kernel loop...");

    loop {
        hlt();
    }
}

/// Stop the machine for good: interrupts off, a red banner on every sink, then halt.
#[cfg(target_arch = "x86")]
pub fn kernel_panic(message: &str) -> ! {
    cli();

    // The console may be held by the code that faulted
    if let Some(mut console) = CONSOLE.try_lock() {
        console.set_color(Color::White, Color::Red);
        console.write_string("\n\n*** KERNEL PANIC ***\n");
        console.write_string("System halted due to critical error:\n");
        console.write_string(message);
        console.write_string("\n\nSystem must be restarted.\n");
    }

    halt_forever()
}

// Once the Kernel panics, print the location and halt
#[cfg(all(not(test), target_os = "none", target_arch = "x86"))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;

    cli();
    if let Some(mut console) = CONSOLE.try_lock() {
        console.set_color(Color::White, Color::Red);
        let _ = write!(console, "\n\n*** KERNEL PANIC ***\n{}\n", info);
    }
    halt_forever()
}
