// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! EPI bring-up.
//!
//! [`BusBridge::initialize`] walks a fixed sequence: peripheral clocks, pin
//! muxing, pad configuration, then the EPI protocol, timing and address map
//! registers. Each step relies on the previous one having completed, so the
//! order is not negotiable. Every write is either an absolute value or a
//! set/clear of the bound pins, which makes a repeated run leave the registers
//! exactly as the first one did.

use crate::error::ProfileError;
use crate::pins::{validate_table, PinAssignment, PortMasks, SIGNAL_COUNT, KS10_PIN_TABLE};
use crate::regs::{epi, gpio, sysctl};
use crate::timing::{BusTimingProfile, MuxMode};
use crate::window::AddressWindow;
use crate::RegisterBus;

/// Whether this build drives real EPI hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Capability {
    Present,
    /// Degraded build: bring-up is skipped entirely.
    Absent,
}

impl Capability {
    pub const fn from_flag(present: bool) -> Self {
        if present {
            Capability::Present
        } else {
            Capability::Absent
        }
    }

    pub const fn is_present(self) -> bool {
        matches!(self, Capability::Present)
    }
}

/// Everything bring-up needs to know about the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeProfile<'a> {
    pub pins: &'a [PinAssignment],
    pub timing: BusTimingProfile,
    pub window: AddressWindow,
}

impl BridgeProfile<'static> {
    /// The console board talking to the KS10 FPGA.
    pub const KS10: BridgeProfile<'static> = BridgeProfile {
        pins: &KS10_PIN_TABLE,
        timing: BusTimingProfile::KS10,
        window: AddressWindow::KS10,
    };
}

impl BridgeProfile<'_> {
    pub fn validate(&self) -> Result<(), ProfileError> {
        // A multiplexed bus drives address and data over all 32 lines. With
        // separate lines at least the data byte has to be wired.
        let required = match self.timing.mux {
            MuxMode::Multiplexed => 0..SIGNAL_COUNT as u8,
            MuxMode::Separate => 0..8,
        };
        validate_table(self.pins, required)?;
        self.window.validate()
    }
}

/// A validated profile ready to be applied.
#[derive(Debug, Clone, Copy)]
pub struct BusBridge<'a> {
    profile: BridgeProfile<'a>,
    capability: Capability,
    masks: PortMasks,
}

impl<'a> BusBridge<'a> {
    pub fn new(profile: BridgeProfile<'a>, capability: Capability) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self {
            masks: PortMasks::from_table(profile.pins),
            profile,
            capability,
        })
    }

    pub fn profile(&self) -> &BridgeProfile<'a> {
        &self.profile
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn port_masks(&self) -> &PortMasks {
        &self.masks
    }

    /// Apply the profile. Must run before anything touches the window.
    ///
    /// With [`Capability::Absent`] this performs no register access at all.
    pub fn initialize<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        if !self.capability.is_present() {
            warn!("EPI hardware absent in this build, skipping bus bring-up");
            return;
        }

        self.enable_clocks(bus);
        self.bind_pins(bus);
        self.switch_pins(bus);
        self.select_protocol(bus);
        self.program_timing(bus);
        self.map_window(bus);

        info!(
            "EPI ready: cfg={:#06x} hb8cfg={:#010x} addrmap={:#06x} window={:#010x}",
            self.profile.timing.mode_word(),
            self.profile.timing.timing_word(),
            self.profile.window.addrmap_word(),
            self.profile.window.base().unwrap_or_default()
        );
    }

    fn enable_clocks<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        debug!("EPI: enabling EPI0 clock");
        bus.set_bits(sysctl::reg(sysctl::RCGC1), sysctl::Rcgc1::EPI0.bits());

        let ports = self.masks.rcgc2();
        debug!("EPI: enabling GPIO clocks rcgc2 |= {:#05x}", ports);
        bus.set_bits(sysctl::reg(sysctl::RCGC2), ports);
    }

    fn bind_pins<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        for a in self.profile.pins {
            let shift = u32::from(a.pin.number) * gpio::PCTL_FIELD_BITS;
            debug!("EPI: {} -> EPI0S{} (pctl {})", a.pin, a.signal, a.function);
            bus.modify(
                a.pin.port.reg(gpio::PCTL),
                0xF << shift,
                u32::from(a.function) << shift,
            );
        }
    }

    fn switch_pins<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        for (port, mask) in self.masks.touched() {
            let mask = u32::from(mask);
            debug!("EPI: GPIO{} pins {:#04x} to peripheral mode", port.letter(), mask);
            bus.clear_bits(port.reg(gpio::DIR), mask);
            bus.set_bits(port.reg(gpio::AFSEL), mask);
            bus.clear_bits(port.reg(gpio::DR2R), mask);
            bus.clear_bits(port.reg(gpio::DR4R), mask);
            bus.set_bits(port.reg(gpio::DR8R), mask);
            // Push-pull, no pulls, no slew-rate control.
            bus.clear_bits(port.reg(gpio::ODR), mask);
            bus.clear_bits(port.reg(gpio::PUR), mask);
            bus.clear_bits(port.reg(gpio::PDR), mask);
            bus.clear_bits(port.reg(gpio::SLR), mask);
            bus.set_bits(port.reg(gpio::DEN), mask);
        }
    }

    fn select_protocol<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        let timing = &self.profile.timing;
        debug!("EPI: cfg = {:#06x}, baud = {:#06x}", timing.mode_word(), timing.baud_word());
        bus.write(epi::reg(epi::CFG), timing.mode_word());
        bus.write(epi::reg(epi::BAUD), timing.baud_word());
    }

    fn program_timing<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        let word = self.profile.timing.timing_word();
        debug!("EPI: hb8cfg = {:#010x}", word);
        bus.write(epi::reg(epi::HB8CFG), word);
    }

    fn map_window<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        let word = self.profile.window.addrmap_word();
        debug!("EPI: addrmap = {:#06x}", word);
        bus.write(epi::reg(epi::ADDRMAP), word);
    }
}
