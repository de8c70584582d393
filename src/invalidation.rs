//! Pending work flags of a circle image.

use bitflags::bitflags;

bitflags! {
    /// Flags indicating what needs to happen before the next frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// Geometry, shader matrix or track paints must be recomputed
        const NEEDS_SETUP = 0b01;
        /// Widget needs repainting (visual appearance changed)
        const NEEDS_PAINT = 0b10;
    }
}

impl ChangeFlags {
    /// Remove and return `flag` if it was set.
    pub fn take(&mut self, flag: ChangeFlags) -> bool {
        let set = self.contains(flag);
        self.remove(flag);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_only_requested_flag() {
        let mut flags = ChangeFlags::NEEDS_SETUP | ChangeFlags::NEEDS_PAINT;
        assert!(flags.take(ChangeFlags::NEEDS_PAINT));
        assert!(!flags.take(ChangeFlags::NEEDS_PAINT));
        assert!(flags.contains(ChangeFlags::NEEDS_SETUP));
    }
}
