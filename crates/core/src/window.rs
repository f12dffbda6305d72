// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Where the KS10 register set shows up in the console's address space.

use crate::bridge::Capability;
use crate::error::ProfileError;
use crate::regs::epi;

/// Base of the KS10 window as seen by the rest of the firmware.
pub const ADDRESS_WINDOW_BASE: u32 = 0x6000_0000;

/// Base address of the KS10 window.
///
/// This is a constant and is returned whether or not bring-up ran. A build
/// with [`Capability::Absent`] still gets `0x6000_0000` here and any access
/// through it lands on an unmapped region.
pub const fn address_window_base() -> u32 {
    ADDRESS_WINDOW_BASE
}

/// Like [`address_window_base`], but `None` when the bridge hardware is absent.
pub const fn checked_address_window_base(capability: Capability) -> Option<u32> {
    match capability {
        Capability::Present => Some(ADDRESS_WINDOW_BASE),
        Capability::Absent => None,
    }
}

/// External RAM placement slots of EPIADDRMAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum WindowSlot {
    None,
    /// 0x6000_0000
    Slot6,
    /// 0x8000_0000
    Slot8,
}

impl WindowSlot {
    pub const fn base(self) -> Option<u32> {
        match self {
            WindowSlot::None => None,
            WindowSlot::Slot6 => Some(0x6000_0000),
            WindowSlot::Slot8 => Some(0x8000_0000),
        }
    }

    /// Slot named by the top nibble of its base address.
    pub const fn from_index(index: u8) -> Option<WindowSlot> {
        match index {
            6 => Some(WindowSlot::Slot6),
            8 => Some(WindowSlot::Slot8),
            _ => None,
        }
    }

    const fn field(self) -> u32 {
        match self {
            WindowSlot::None => 0,
            WindowSlot::Slot6 => 1,
            WindowSlot::Slot8 => 2,
        }
    }
}

/// Window sizes the EPI decodes natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum WindowSize {
    B256,
    K64,
    M16,
    M256,
}

impl WindowSize {
    pub const fn bytes(self) -> u32 {
        match self {
            WindowSize::B256 => 0x100,
            WindowSize::K64 => 0x1_0000,
            WindowSize::M16 => 0x100_0000,
            WindowSize::M256 => 0x1000_0000,
        }
    }

    pub const fn from_bytes(bytes: u64) -> Option<WindowSize> {
        match bytes {
            0x100 => Some(WindowSize::B256),
            0x1_0000 => Some(WindowSize::K64),
            0x100_0000 => Some(WindowSize::M16),
            0x1000_0000 => Some(WindowSize::M256),
            _ => None,
        }
    }

    const fn field(self) -> u32 {
        match self {
            WindowSize::B256 => 0,
            WindowSize::K64 => 1,
            WindowSize::M16 => 2,
            WindowSize::M256 => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct AddressWindow {
    pub slot: WindowSlot,
    pub size: WindowSize,
}

impl AddressWindow {
    pub const KS10: AddressWindow = AddressWindow {
        slot: WindowSlot::Slot6,
        size: WindowSize::B256,
    };

    pub const fn base(&self) -> Option<u32> {
        self.slot.base()
    }

    /// EPIADDRMAP value.
    pub const fn addrmap_word(&self) -> u32 {
        ((self.slot.field() << epi::ADDRMAP_ERADR_SHIFT) & epi::ADDRMAP_ERADR_MASK)
            | ((self.size.field() << epi::ADDRMAP_ERSZ_SHIFT) & epi::ADDRMAP_ERSZ_MASK)
    }

    /// Both slot bases are multiples of every native size, so a placed window
    /// is always aligned.
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.base().map(|_| ()).ok_or(ProfileError::UnmappedWindow)
    }
}
