//! Host-side doubles for the hardware interface and the log facade.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use crate::x86::hardware::Hardware;

/// Port-level fake. Writes are recorded in order and latch into a per-port
/// register that later reads return, which is how the PIC mask registers and
/// most device data ports behave. Bytes queued with `push_input` are returned
/// first, one per read.
#[derive(Debug, Default)]
pub struct FakeHardware {
    pub writes: Vec<(u16, u8)>,
    pub reads: Vec<u16>,
    pub cr2: u32,
    registers: HashMap<u16, u8>,
    inputs: HashMap<u16, VecDeque<u8>>,
}

impl FakeHardware {
    pub fn new() -> FakeHardware {
        FakeHardware::default()
    }

    pub fn with_fault_address(cr2: u32) -> FakeHardware {
        FakeHardware {
            cr2,
            ..FakeHardware::default()
        }
    }

    /// Preload a register without recording a write
    pub fn set_register(&mut self, port: u16, value: u8) {
        self.registers.insert(port, value);
    }

    pub fn register(&self, port: u16) -> u8 {
        self.registers.get(&port).copied().unwrap_or(0)
    }

    /// Queue a byte that the next read of `port` returns
    pub fn push_input(&mut self, port: u16, value: u8) {
        self.inputs.entry(port).or_default().push_back(value);
    }

    /// Writes that went to one port, in order
    pub fn writes_to(&self, port: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == port)
            .map(|(_, value)| *value)
            .collect()
    }
}

impl Hardware for FakeHardware {
    fn read_byte(&mut self, port: u16) -> u8 {
        self.reads.push(port);
        match self.inputs.get_mut(&port).and_then(VecDeque::pop_front) {
            Some(value) => value,
            None => self.register(port),
        }
    }

    fn write_byte(&mut self, port: u16, value: u8) {
        self.writes.push((port, value));
        self.registers.insert(port, value);
    }

    fn fault_address(&self) -> u32 {
        self.cr2
    }
}

/// A log record as seen by the capture logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

thread_local! {
    static RECORDS: RefCell<Option<Vec<Captured>>> = RefCell::new(None);
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        RECORDS.with(|records| {
            if let Some(records) = records.borrow_mut().as_mut() {
                records.push(Captured {
                    level: record.level(),
                    target: record.target().to_string(),
                    message: record.args().to_string(),
                });
            }
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Run `f` and return what it logged on this thread. Test threads capture
/// independently of each other.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<Captured>) {
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("capture logger installed twice");
        log::set_max_level(log::LevelFilter::Trace);
    });

    RECORDS.with(|records| *records.borrow_mut() = Some(Vec::new()));
    let result = f();
    let captured = RECORDS.with(|records| records.borrow_mut().take().unwrap_or_default());

    (result, captured)
}

/// True if any captured line of `level` from `target` contains `needle`
pub fn logged(records: &[Captured], level: log::Level, target: &str, needle: &str) -> bool {
    records
        .iter()
        .any(|r| r.level == level && r.target == target && r.message.contains(needle))
}
