// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::RegisterBus;

/// Direct volatile access to the microcontroller's peripheral space.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only valid on the console microcontroller, and the caller must be the
    /// sole owner of the registers it goes on to touch. Bring-up runs before
    /// any task exists, which is what makes this hold on the target.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    fn read(&self, addr: u32) -> u32 {
        // SAFETY: `Mmio::new` requires running on the target, where every
        // address bring-up passes in is a word-aligned peripheral register.
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write(&mut self, addr: u32, value: u32) {
        // SAFETY: as for `read`.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}
