// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register-level model of the console microcontroller, covering the blocks
//! EPI bring-up programs. Peripherals sit behind their SYSCTL clock gates the
//! way they do on silicon: touching a gated block is recorded as a fault.

pub mod epi;
pub mod gpio;
pub mod sysctl;

use crate::pins::Port;
use crate::regs;
use crate::RegisterBus;
use std::any::Any;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Memory access violation at {0:#x}")]
    MemoryViolation(u32),
    #[error("{peripheral} accessed at {addr:#x} while its clock is gated")]
    ClockGated { peripheral: String, addr: u32 },
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Trait representing a memory-mapped peripheral
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&self, offset: u64) -> SimResult<u8>;
    fn write(&mut self, offset: u64, value: u8) -> SimResult<()>;
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

pub(crate) fn byte_of(reg_val: u32, offset: u64) -> u8 {
    let byte_offset = (offset % 4) as u32;
    ((reg_val >> (byte_offset * 8)) & 0xFF) as u8
}

pub(crate) fn merge_byte(reg_val: u32, offset: u64, value: u8) -> u32 {
    let byte_offset = (offset % 4) as u32;
    let mask = 0xFF << (byte_offset * 8);
    (reg_val & !mask) | ((value as u32) << (byte_offset * 8))
}

/// SYSCTL register and bit a peripheral's clock is gated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockGate {
    pub register: u32,
    pub mask: u32,
}

pub struct PeripheralEntry {
    pub name: String,
    pub base: u32,
    pub size: u32,
    pub clock: Option<ClockGate>,
    pub dev: Box<dyn Peripheral>,
}

/// One completed 32-bit write, in bus order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BusWrite {
    pub peripheral: String,
    pub addr: u32,
    pub value: u32,
}

pub struct SystemBus {
    pub sysctl: sysctl::SysCtl,
    pub peripherals: Vec<PeripheralEntry>,
    writes: Vec<BusWrite>,
    faults: RefCell<Vec<SimulationError>>,
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemBus {
    /// Console microcontroller with every block still clock gated, as after reset.
    pub fn new() -> Self {
        let mut peripherals: Vec<PeripheralEntry> = Port::ALL
            .into_iter()
            .map(|port| PeripheralEntry {
                name: format!("gpio{}", port.letter().to_ascii_lowercase()),
                base: port.base(),
                size: 0x1000,
                clock: Some(ClockGate {
                    register: regs::sysctl::RCGC2,
                    mask: port.rcgc2_bit(),
                }),
                dev: Box::new(gpio::GpioPort::new()),
            })
            .collect();

        peripherals.push(PeripheralEntry {
            name: "epi0".to_string(),
            base: regs::epi::BASE,
            size: 0x1000,
            clock: Some(ClockGate {
                register: regs::sysctl::RCGC1,
                mask: regs::sysctl::Rcgc1::EPI0.bits(),
            }),
            dev: Box::new(epi::Epi::new()),
        });

        Self {
            sysctl: sysctl::SysCtl::new(),
            peripherals,
            writes: Vec::new(),
            faults: RefCell::new(Vec::new()),
        }
    }

    pub fn with_sysctl(mut self, sysctl: sysctl::SysCtl) -> Self {
        self.sysctl = sysctl;
        self
    }

    fn sysctl_offset(addr: u32) -> Option<u64> {
        let base = regs::sysctl::BASE;
        (base..base + 0x1000)
            .contains(&addr)
            .then(|| (addr - base) as u64)
    }

    fn find(&self, addr: u32) -> SimResult<(usize, u64)> {
        self.peripherals
            .iter()
            .position(|p| addr >= p.base && addr - p.base < p.size)
            .map(|idx| (idx, (addr - self.peripherals[idx].base) as u64))
            .ok_or(SimulationError::MemoryViolation(addr))
    }

    fn check_clock(&self, idx: usize, addr: u32) -> SimResult<()> {
        let entry = &self.peripherals[idx];
        match entry.clock {
            Some(gate) if !self.sysctl.is_enabled(gate.register, gate.mask) => {
                Err(SimulationError::ClockGated {
                    peripheral: entry.name.clone(),
                    addr,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn read_u8(&self, addr: u32) -> SimResult<u8> {
        if let Some(offset) = Self::sysctl_offset(addr) {
            return self.sysctl.read(offset);
        }
        let (idx, offset) = self.find(addr)?;
        self.check_clock(idx, addr)?;
        self.peripherals[idx].dev.read(offset)
    }

    pub fn write_u8(&mut self, addr: u32, value: u8) -> SimResult<()> {
        if let Some(offset) = Self::sysctl_offset(addr) {
            return self.sysctl.write(offset, value);
        }
        let (idx, offset) = self.find(addr)?;
        self.check_clock(idx, addr)?;
        self.peripherals[idx].dev.write(offset, value)
    }

    pub fn read_u32(&self, addr: u32) -> SimResult<u32> {
        let b0 = self.read_u8(addr)? as u32;
        let b1 = self.read_u8(addr + 1)? as u32;
        let b2 = self.read_u8(addr + 2)? as u32;
        let b3 = self.read_u8(addr + 3)? as u32;
        Ok(b0 | (b1 << 8) | (b2 << 16) | (b3 << 24))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> SimResult<()> {
        self.write_u8(addr, (value & 0xFF) as u8)?;
        self.write_u8(addr + 1, ((value >> 8) & 0xFF) as u8)?;
        self.write_u8(addr + 2, ((value >> 16) & 0xFF) as u8)?;
        self.write_u8(addr + 3, ((value >> 24) & 0xFF) as u8)?;
        Ok(())
    }

    fn name_of(&self, addr: u32) -> String {
        if Self::sysctl_offset(addr).is_some() {
            return "sysctl".to_string();
        }
        match self.find(addr) {
            Ok((idx, _)) => self.peripherals[idx].name.clone(),
            Err(_) => "unmapped".to_string(),
        }
    }

    fn record_fault(&self, err: SimulationError) {
        tracing::warn!("Bus fault: {}", err);
        self.faults.borrow_mut().push(err);
    }

    /// Successful writes since construction or the last [`SystemBus::clear_log`].
    pub fn writes(&self) -> &[BusWrite] {
        &self.writes
    }

    pub fn faults(&self) -> Vec<SimulationError> {
        self.faults.borrow().clone()
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.faults.get_mut().clear();
    }

    pub fn peripheral<T: 'static>(&self, name: &str) -> Option<&T> {
        self.peripherals
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.dev.as_any())
            .and_then(|any| any.downcast_ref::<T>())
    }

    pub fn peripheral_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.peripherals
            .iter_mut()
            .find(|p| p.name == name)
            .and_then(|p| p.dev.as_any_mut())
            .and_then(|any| any.downcast_mut::<T>())
    }

    pub fn gpio(&self, port: Port) -> Option<&gpio::GpioPort> {
        self.peripheral(&format!("gpio{}", port.letter().to_ascii_lowercase()))
    }

    pub fn gpio_mut(&mut self, port: Port) -> Option<&mut gpio::GpioPort> {
        self.peripheral_mut(&format!("gpio{}", port.letter().to_ascii_lowercase()))
    }

    pub fn epi(&self) -> Option<&epi::Epi> {
        self.peripheral("epi0")
    }

    /// Register state of every block, keyed by peripheral name.
    pub fn snapshot(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("sysctl".to_string(), self.sysctl.snapshot());
        for p in &self.peripherals {
            map.insert(p.name.clone(), p.dev.snapshot());
        }
        serde_json::Value::Object(map)
    }
}

impl RegisterBus for SystemBus {
    fn read(&self, addr: u32) -> u32 {
        self.read_u32(addr).unwrap_or_else(|err| {
            self.record_fault(err);
            0
        })
    }

    fn write(&mut self, addr: u32, value: u32) {
        match self.write_u32(addr, value) {
            Ok(()) => {
                tracing::debug!("write {:#010x} <- {:#010x}", addr, value);
                self.writes.push(BusWrite {
                    peripheral: self.name_of(addr),
                    addr,
                    value,
                });
            }
            Err(err) => self.record_fault(err),
        }
    }
}
