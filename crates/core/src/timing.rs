// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::error::ProfileError;
use crate::regs::{epi, Hb8Flags};

/// Data width of the host bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum TransferWidth {
    Bits8,
    Bits16,
}

/// Whether address and data share the same lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum MuxMode {
    /// Address and data time-multiplexed, framed by ALE.
    Multiplexed,
    /// Separate address and data lines.
    Separate,
}

/// How the EPI selects the external device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum ChipSelect {
    /// Address latch enable only.
    Ale,
    /// One active-low chip select.
    SingleCs,
    /// Two chip selects, one per half of the window.
    DualCs,
    /// ALE framing plus two chip selects.
    AleDualCs,
}

impl ChipSelect {
    const fn field(self) -> u32 {
        match self {
            ChipSelect::Ale => 0,
            ChipSelect::SingleCs => 1,
            ChipSelect::DualCs => 2,
            ChipSelect::AleDualCs => 3,
        }
    }
}

/// Extra bus clocks inserted per transfer, 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct WaitStates(u8);

impl WaitStates {
    pub const MAX: u8 = 3;

    pub const fn new(count: u8) -> Result<Self, ProfileError> {
        if count > Self::MAX {
            return Err(ProfileError::WaitStatesOutOfRange(count));
        }
        Ok(Self(count))
    }

    pub const fn count(self) -> u8 {
        self.0
    }
}

/// Electrical profile of the host bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct BusTimingProfile {
    pub width: TransferWidth,
    /// Let the core issue word accesses, split into byte cycles on the bus.
    pub word_access: bool,
    pub read_wait: WaitStates,
    pub write_wait: WaitStates,
    pub mux: MuxMode,
    pub chip_select: ChipSelect,
    /// EPIBAUD COUNT0. 0 runs the bus at the system clock.
    pub clock_divider: u16,
}

impl BusTimingProfile {
    /// Timing used with the KS10 FPGA.
    pub const KS10: BusTimingProfile = BusTimingProfile {
        width: TransferWidth::Bits8,
        word_access: true,
        read_wait: WaitStates(3),
        write_wait: WaitStates(3),
        mux: MuxMode::Multiplexed,
        chip_select: ChipSelect::AleDualCs,
        clock_divider: 0,
    };

    /// EPICFG value selecting the host-bus mode.
    pub const fn mode_word(&self) -> u32 {
        let mode = match self.width {
            TransferWidth::Bits8 => epi::CFG_MODE_HB8,
            TransferWidth::Bits16 => epi::CFG_MODE_HB16,
        };
        mode | epi::CFG_BLKEN
    }

    pub const fn baud_word(&self) -> u32 {
        self.clock_divider as u32 & epi::BAUD_COUNT0_MASK
    }

    /// Packed host-bus configuration word.
    pub fn timing_word(&self) -> u32 {
        let mode = match self.mux {
            MuxMode::Multiplexed => 0,
            MuxMode::Separate => 1,
        };
        let mut flags = Hb8Flags::empty();
        flags.set(Hb8Flags::WORD_ACCESS, self.word_access);

        ((mode << epi::HB8_MODE_SHIFT) & epi::HB8_MODE_MASK)
            | ((u32::from(self.read_wait.count()) << epi::HB8_RDWS_SHIFT) & epi::HB8_RDWS_MASK)
            | ((u32::from(self.write_wait.count()) << epi::HB8_WRWS_SHIFT) & epi::HB8_WRWS_MASK)
            | ((self.chip_select.field() << epi::HB8_CSCFG_SHIFT) & epi::HB8_CSCFG_MASK)
            | flags.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks10_words() {
        let t = BusTimingProfile::KS10;
        assert_eq!(t.mode_word(), 0x12);
        assert_eq!(t.baud_word(), 0);
        assert_eq!(t.timing_word(), 0x0000_07F0);
    }

    #[test]
    fn test_timing_fields_are_independent() {
        let base = BusTimingProfile {
            width: TransferWidth::Bits8,
            word_access: false,
            read_wait: WaitStates::default(),
            write_wait: WaitStates::default(),
            mux: MuxMode::Multiplexed,
            chip_select: ChipSelect::Ale,
            clock_divider: 0,
        };
        assert_eq!(base.timing_word(), 0);

        let cases: [(BusTimingProfile, u32); 8] = [
            (BusTimingProfile { mux: MuxMode::Separate, ..base }, 0x001),
            (BusTimingProfile { read_wait: WaitStates(1), ..base }, 0x010),
            (BusTimingProfile { read_wait: WaitStates(2), ..base }, 0x020),
            (BusTimingProfile { write_wait: WaitStates(1), ..base }, 0x040),
            (BusTimingProfile { write_wait: WaitStates(2), ..base }, 0x080),
            (BusTimingProfile { word_access: true, ..base }, 0x100),
            (BusTimingProfile { chip_select: ChipSelect::SingleCs, ..base }, 0x200),
            (BusTimingProfile { chip_select: ChipSelect::DualCs, ..base }, 0x400),
        ];
        for (profile, expected) in cases {
            assert_eq!(profile.timing_word(), expected, "{:?}", profile);
        }
    }

    #[test]
    fn test_wait_state_limit() {
        assert_eq!(WaitStates::new(3).map(WaitStates::count), Ok(3));
        assert_eq!(WaitStates::new(4), Err(ProfileError::WaitStatesOutOfRange(4)));
    }

    #[test]
    fn test_hb16_mode_and_divider() {
        let t = BusTimingProfile {
            width: TransferWidth::Bits16,
            clock_divider: 0x0102,
            ..BusTimingProfile::KS10
        };
        assert_eq!(t.mode_word(), 0x13);
        assert_eq!(t.baud_word(), 0x0102);
    }
}
