// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bring-up of the External Peripheral Interface (EPI) that exposes the KS10
//! FPGA register set as a memory-mapped window of the console microcontroller.
//!
//! The crate is `no_std` unless the `std` feature is enabled. With `std` it
//! also carries [`sim`], a register-level model of the parts of the SoC that
//! bring-up touches, which the tests and the host tooling run against.

#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

pub mod board;
pub mod bridge;
pub mod error;
pub mod mmio;
pub mod pins;
pub mod regs;
pub mod timing;
pub mod window;

#[cfg(feature = "std")]
pub mod sim;

pub use bridge::{BridgeProfile, BusBridge, Capability};
pub use error::{PinParseError, ProfileError};
pub use pins::{Pin, PinAssignment, Port, PortMasks, KS10_PIN_TABLE};
pub use timing::{BusTimingProfile, ChipSelect, MuxMode, TransferWidth, WaitStates};
pub use window::{
    address_window_base, checked_address_window_base, AddressWindow, WindowSize, WindowSlot,
    ADDRESS_WINDOW_BASE,
};

/// 32-bit register access used by bring-up.
///
/// Writes are assumed to always succeed. Implemented by [`mmio::Mmio`] on the
/// target and by [`sim::SystemBus`] on the host.
pub trait RegisterBus {
    fn read(&self, addr: u32) -> u32;
    fn write(&mut self, addr: u32, value: u32);

    fn set_bits(&mut self, addr: u32, mask: u32) {
        let value = self.read(addr);
        self.write(addr, value | mask);
    }

    fn clear_bits(&mut self, addr: u32, mask: u32) {
        let value = self.read(addr);
        self.write(addr, value & !mask);
    }

    /// Replace the bits selected by `mask` with the matching bits of `value`.
    fn modify(&mut self, addr: u32, mask: u32, value: u32) {
        let old = self.read(addr);
        self.write(addr, (old & !mask) | (value & mask));
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }
}
