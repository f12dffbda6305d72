// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register map of the Stellaris-class console microcontroller, limited to
//! what EPI bring-up touches.

use bitflags::bitflags;

pub mod sysctl {
    use bitflags::bitflags;

    pub const BASE: u32 = 0x400F_E000;

    pub const DID0: u32 = 0x000;
    pub const RCGC1: u32 = 0x104;
    pub const RCGC2: u32 = 0x108;

    bitflags! {
        /// Run-mode clock gating control register 1.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Rcgc1: u32 {
            const EPI0 = 1 << 30;
        }
    }

    /// Address of a SYSCTL register.
    pub const fn reg(offset: u32) -> u32 {
        BASE + offset
    }
}

pub mod gpio {
    pub const DATA: u32 = 0x000;
    pub const DIR: u32 = 0x400;
    pub const AFSEL: u32 = 0x420;
    pub const DR2R: u32 = 0x500;
    pub const DR4R: u32 = 0x504;
    pub const DR8R: u32 = 0x508;
    pub const ODR: u32 = 0x50C;
    pub const PUR: u32 = 0x510;
    pub const PDR: u32 = 0x514;
    pub const SLR: u32 = 0x518;
    pub const DEN: u32 = 0x51C;
    pub const PCTL: u32 = 0x52C;

    /// Width of one PCTL port-mux field.
    pub const PCTL_FIELD_BITS: u32 = 4;

    /// DATA is masked by address bits [9:2]; writing through `base + (mask << 2)`
    /// only affects the pins in `mask`.
    pub const fn data_masked(mask: u8) -> u32 {
        DATA + ((mask as u32) << 2)
    }
}

pub mod epi {
    pub const BASE: u32 = 0x400D_0000;

    pub const CFG: u32 = 0x000;
    pub const BAUD: u32 = 0x004;
    pub const HB8CFG: u32 = 0x010;
    pub const ADDRMAP: u32 = 0x01C;

    pub const CFG_MODE_HB8: u32 = 0x2;
    pub const CFG_MODE_HB16: u32 = 0x3;
    pub const CFG_MODE_MASK: u32 = 0xF;
    pub const CFG_BLKEN: u32 = 1 << 4;

    pub const BAUD_COUNT0_MASK: u32 = 0xFFFF;

    pub const HB8_MODE_SHIFT: u32 = 0;
    pub const HB8_MODE_MASK: u32 = 0x3 << HB8_MODE_SHIFT;
    pub const HB8_RDWS_SHIFT: u32 = 4;
    pub const HB8_RDWS_MASK: u32 = 0x3 << HB8_RDWS_SHIFT;
    pub const HB8_WRWS_SHIFT: u32 = 6;
    pub const HB8_WRWS_MASK: u32 = 0x3 << HB8_WRWS_SHIFT;
    pub const HB8_CSCFG_SHIFT: u32 = 9;
    pub const HB8_CSCFG_MASK: u32 = 0x3 << HB8_CSCFG_SHIFT;

    pub const ADDRMAP_ERADR_SHIFT: u32 = 0;
    pub const ADDRMAP_ERADR_MASK: u32 = 0x3 << ADDRMAP_ERADR_SHIFT;
    pub const ADDRMAP_ERSZ_SHIFT: u32 = 2;
    pub const ADDRMAP_ERSZ_MASK: u32 = 0x3 << ADDRMAP_ERSZ_SHIFT;

    /// Address of an EPI0 register.
    pub const fn reg(offset: u32) -> u32 {
        BASE + offset
    }
}

bitflags! {
    /// Single-bit options of the HB8 configuration register. Multi-bit fields
    /// are packed through the shifts in [`epi`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Hb8Flags: u32 {
        const WORD_ACCESS = 1 << 8;
    }
}

/// Silicon revision decoded from DID0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub major: u8,
    pub minor: u8,
}

impl Revision {
    pub const fn from_did0(did0: u32) -> Self {
        Self {
            major: ((did0 >> 8) & 0xFF) as u8,
            minor: (did0 & 0xFF) as u8,
        }
    }

    /// The ROM driver entry points used on the console need revision C3.
    pub const fn is_c3(&self) -> bool {
        self.major == 2 && self.minor == 3
    }
}

impl core::fmt::Display for Revision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let letter = char::from(b'A'.saturating_add(self.major));
        write!(f, "{}{}", letter, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_decoding() {
        let rev = Revision::from_did0(0x1804_0203);
        assert!(rev.is_c3());
        assert_eq!(rev.to_string(), "C3");

        let rev = Revision::from_did0(0x1804_0101);
        assert!(!rev.is_c3());
        assert_eq!(rev.to_string(), "B1");
    }

    #[test]
    fn test_masked_data_address() {
        assert_eq!(gpio::data_masked(0x0C), 0x030);
        assert_eq!(gpio::data_masked(0xFF), 0x3FC);
    }
}
