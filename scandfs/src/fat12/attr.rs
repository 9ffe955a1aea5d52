// SPDX-License-Identifier: MIT

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct Fat12Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN    = 0x02;
        const SYSTEM    = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE   = 0x20;
        const LFN       = 0x0F;
    }
}

impl Fat12Attributes {
    /// Long-name pieces carry all four low bits at once.
    #[inline]
    pub fn is_lfn(attr: u8) -> bool {
        attr & Self::LFN.bits() == Self::LFN.bits()
    }
}
