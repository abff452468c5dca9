use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerError {
    // A vector offset lands inside the processor exception range (0..31)
    ReservedOffset(u8),

    // The two eight-vector spans share at least one vector
    OverlappingOffsets { master: u8, slave: u8 },

    // Only lines 0..15 exist
    InvalidLine(u8),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ReservedOffset(offset) => {
                write!(f, "vector offset {} overlaps the exception range", offset)
            }
            ControllerError::OverlappingOffsets { master, slave } => {
                write!(f, "vector offsets {} and {} overlap", master, slave)
            }
            ControllerError::InvalidLine(line) => write!(f, "invalid IRQ line {}", line),
        }
    }
}
