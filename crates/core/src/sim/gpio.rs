// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{byte_of, merge_byte, Peripheral, SimResult};
use crate::regs::gpio::{
    AFSEL, DEN, DIR, DR2R, DR4R, DR8R, ODR, PCTL, PCTL_FIELD_BITS, PDR, PUR, SLR,
};
use std::any::Any;

/// Stellaris GPIO port: direction, alternate function, pad and port-mux registers.
#[derive(Debug, serde::Serialize)]
pub struct GpioPort {
    data: u32, // 0x000..0x3FC: address-masked data
    dir: u32,  // 0x400
    afsel: u32, // 0x420
    dr2r: u32, // 0x500: 2 mA drive, set on reset
    dr4r: u32, // 0x504
    dr8r: u32, // 0x508
    odr: u32,  // 0x50C
    pur: u32,  // 0x510
    pdr: u32,  // 0x514
    slr: u32,  // 0x518
    den: u32,  // 0x51C
    pctl: u32, // 0x52C
}

impl Default for GpioPort {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort {
    pub fn new() -> Self {
        Self {
            data: 0,
            dir: 0,
            afsel: 0,
            dr2r: 0xFF,
            dr4r: 0,
            dr8r: 0,
            odr: 0,
            pur: 0,
            pdr: 0,
            slr: 0,
            den: 0,
            pctl: 0,
        }
    }

    /// PCTL code a pin is muxed to, if it is handed to a peripheral.
    pub fn pin_function(&self, pin: u8) -> Option<u8> {
        if self.afsel & (1 << pin) == 0 {
            return None;
        }
        Some(((self.pctl >> (u32::from(pin) * PCTL_FIELD_BITS)) & 0xF) as u8)
    }

    /// Pins under peripheral control with digital function enabled.
    pub fn peripheral_pins(&self) -> u8 {
        (self.afsel & self.den & 0xFF) as u8
    }

    pub fn data(&self) -> u8 {
        (self.data & 0xFF) as u8
    }

    pub fn dir(&self) -> u8 {
        (self.dir & 0xFF) as u8
    }

    pub fn dr8r(&self) -> u8 {
        (self.dr8r & 0xFF) as u8
    }

    pub fn dr2r(&self) -> u8 {
        (self.dr2r & 0xFF) as u8
    }

    pub fn odr(&self) -> u8 {
        (self.odr & 0xFF) as u8
    }

    pub fn pur(&self) -> u8 {
        (self.pur & 0xFF) as u8
    }

    pub fn pdr(&self) -> u8 {
        (self.pdr & 0xFF) as u8
    }

    pub fn slr(&self) -> u8 {
        (self.slr & 0xFF) as u8
    }

    /// Preload a register, e.g. to model a pin another driver already owns.
    pub fn poke(&mut self, offset: u32, value: u32) {
        self.write_reg(offset as u64, value);
    }

    fn read_reg(&self, offset: u64) -> u32 {
        match offset as u32 {
            0x000..=0x3FC => self.data & ((offset as u32 >> 2) & 0xFF),
            DIR => self.dir,
            AFSEL => self.afsel,
            DR2R => self.dr2r,
            DR4R => self.dr4r,
            DR8R => self.dr8r,
            ODR => self.odr,
            PUR => self.pur,
            PDR => self.pdr,
            SLR => self.slr,
            DEN => self.den,
            PCTL => self.pctl,
            _ => 0,
        }
    }

    fn write_reg(&mut self, offset: u64, value: u32) {
        match offset as u32 {
            0x000..=0x3FC => {
                // Address bits [9:2] select which pins the write reaches.
                let mask = (offset as u32 >> 2) & 0xFF;
                self.data = (self.data & !mask) | (value & mask);
            }
            DIR => self.dir = value & 0xFF,
            AFSEL => self.afsel = value & 0xFF,
            DR2R => self.dr2r = value & 0xFF,
            DR4R => self.dr4r = value & 0xFF,
            DR8R => self.dr8r = value & 0xFF,
            ODR => self.odr = value & 0xFF,
            PUR => self.pur = value & 0xFF,
            PDR => self.pdr = value & 0xFF,
            SLR => self.slr = value & 0xFF,
            DEN => self.den = value & 0xFF,
            PCTL => self.pctl = value,
            _ => {}
        }
    }
}

impl Peripheral for GpioPort {
    fn read(&self, offset: u64) -> SimResult<u8> {
        Ok(byte_of(self.read_reg(offset & !3), offset))
    }

    fn write(&mut self, offset: u64, value: u8) -> SimResult<()> {
        let reg_offset = offset & !3;

        // Only the low byte of DATA is backed by pins.
        if reg_offset < 0x400 {
            if offset % 4 == 0 {
                self.write_reg(reg_offset, value as u32);
            }
            return Ok(());
        }

        let reg_val = merge_byte(self.read_reg(reg_offset), offset, value);
        self.write_reg(reg_offset, reg_val);
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
