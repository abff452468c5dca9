use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    // Slot index past the end of a descriptor table. Nothing was written.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::IndexOutOfRange { index, len } => {
                write!(f, "entry {} is out of range (table holds {})", index, len)
            }
        }
    }
}
