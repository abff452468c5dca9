//! Bring-up order for the trap subsystem. Each phase is a distinct type, so the
//! segment table is always live before the interrupt table, and the controller is
//! remapped before anything can enable interrupts.

use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use log::info;

use crate::{
    interrupts::{
        defs::{EntryPoint, InterruptDescriptorTable},
        idt::setup_idt,
    },
    memory::{defs::GlobalDescriptorTable, gdt::setup_gdt},
    pic::{error::ControllerError, PICS},
    x86::{error::TableError, hardware::Hardware},
};

static STARTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    Table(TableError),
    Controller(ControllerError),
}

impl From<TableError> for BootError {
    fn from(error: TableError) -> Self {
        BootError::Table(error)
    }
}

impl From<ControllerError> for BootError {
    fn from(error: ControllerError) -> Self {
        BootError::Controller(error)
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BootError::Table(error) => write!(f, "descriptor table setup failed: {}", error),
            BootError::Controller(error) => write!(f, "interrupt controller setup failed: {}", error),
        }
    }
}

pub struct Cold;

pub struct Segmented {
    gdt: &'static GlobalDescriptorTable,
}

pub struct Armed {
    gdt: &'static GlobalDescriptorTable,
    idt: &'static InterruptDescriptorTable,
}

pub struct Running {
    gdt: &'static GlobalDescriptorTable,
    idt: &'static InterruptDescriptorTable,
}

pub struct Boot<Phase> {
    phase: Phase,
}

impl Boot<Cold> {
    /// The one and only boot sequence. Later calls get `None`.
    pub fn start() -> Option<Boot<Cold>> {
        if STARTED.swap(true, Ordering::SeqCst) {
            return None;
        }

        Some(Boot { phase: Cold })
    }

    pub fn load_segments(self) -> Result<Boot<Segmented>, BootError> {
        let gdt = setup_gdt()?;
        Ok(Boot {
            phase: Segmented { gdt },
        })
    }
}

impl Boot<Segmented> {
    pub fn load_interrupts(self, entries: &[EntryPoint]) -> Result<Boot<Armed>, BootError> {
        let idt = setup_idt(entries)?;
        Ok(Boot {
            phase: Armed {
                gdt: self.phase.gdt,
                idt,
            },
        })
    }
}

impl Boot<Armed> {
    pub fn remap_controller<H: Hardware>(self, hw: &mut H) -> Result<Boot<Running>, BootError> {
        PICS.initialize(hw)?;
        Ok(Boot {
            phase: Running {
                gdt: self.phase.gdt,
                idt: self.phase.idt,
            },
        })
    }
}

impl Boot<Running> {
    pub fn gdt(&self) -> &'static GlobalDescriptorTable {
        self.phase.gdt
    }

    pub fn idt(&self) -> &'static InterruptDescriptorTable {
        self.phase.idt
    }

    #[cfg(target_arch = "x86")]
    pub fn enable_interrupts(&self) {
        crate::x86::helpers::sti();
        info!(target: "CPU", "Interrupts enabled");
    }

    #[cfg(not(target_arch = "x86"))]
    pub fn enable_interrupts(&self) {
        info!(target: "CPU", "Interrupts enabled");
    }
}
