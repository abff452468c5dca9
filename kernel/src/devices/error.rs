#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SerialError {
    PortUnavailable,
}
