// ***************** Security *****************

/// Protection Ring
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrivilegeLevel {
    Ring0 = 0, // Kernel Level
    Ring1 = 1, // Some Device Drivers
    Ring2 = 2, // General Purpose
    Ring3 = 3, // User Level
}

impl PrivilegeLevel {
    /// Value of the two-bit DPL field once shifted into an access byte.
    pub const fn dpl_bits(self) -> u8 {
        (self as u8) << 5
    }
}

// ***************** EFlags *****************

pub const EFLAGS_INTERRUPT_ENABLE: u32 = 1 << 9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpl_bits_land_in_bits_5_and_6() {
        assert_eq!(PrivilegeLevel::Ring0.dpl_bits(), 0x00);
        assert_eq!(PrivilegeLevel::Ring1.dpl_bits(), 0x20);
        assert_eq!(PrivilegeLevel::Ring3.dpl_bits(), 0x60);
    }
}
