use log::error;

use crate::x86::hardware::Hardware;

use super::defs::{vectors, TrapFrame, EXCEPTION_NAMES, UNKNOWN_EXCEPTION};

/// What the fault path decided. Every vector currently ends up `Fatal`;
/// `Diagnostic` is where continuable faults will go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// Logged, execution resumes at the interrupted instruction
    Diagnostic,
    /// Logged, the system halts with the given reason
    Fatal(&'static str),
}

pub fn exception_name(vector: u32) -> &'static str {
    EXCEPTION_NAMES
        .get(vector as usize)
        .copied()
        .unwrap_or(UNKNOWN_EXCEPTION)
}

/// Log the fault context and decide its fate. Only reads the hardware, the
/// halt itself is left to the caller.
pub fn handle_exception<H: Hardware>(frame: &TrapFrame, hw: &H) -> FaultClass {
    let vector = frame.trap_number;

    error!(target: "CPU", "Exception {} ({}) occurred!", vector, exception_name(vector));
    error!(target: "CPU", "Error Code: 0x{:X}", frame.error_code);
    error!(
        target: "CPU",
        "EIP: 0x{:X}, CS: 0x{:X}, EFLAGS: 0x{:X}",
        frame.eip,
        frame.cs,
        frame.eflags
    );

    let class = match vector {
        vectors::DIVIDE_ERROR => FaultClass::Fatal("Division by zero detected!"),
        vectors::INVALID_OPCODE => FaultClass::Fatal("Invalid opcode - unknown instruction!"),
        vectors::DOUBLE_FAULT => FaultClass::Fatal("Double fault - critical system error!"),
        vectors::GENERAL_PROTECTION_FAULT => {
            FaultClass::Fatal("General Protection Fault - memory access violation!")
        }
        vectors::PAGE_FAULT => {
            error!(target: "CPU", "Page fault at address 0x{:X}", hw.fault_address());
            FaultClass::Fatal("Page fault occurred!")
        }
        _ => FaultClass::Fatal("Unhandled CPU exception!"),
    };

    if let FaultClass::Fatal(reason) = class {
        error!(target: "IDT", "{}", reason);
    }

    class
}

/// Called by the exception trampolines with the saved frame
#[cfg(target_arch = "x86")]
#[no_mangle]
pub extern "C" fn exception_handler(frame: &mut TrapFrame) {
    use crate::x86::hardware::Cpu;

    match handle_exception(frame, &Cpu) {
        FaultClass::Diagnostic => {}
        FaultClass::Fatal(reason) => crate::kernel_panic(reason),
    }
}
