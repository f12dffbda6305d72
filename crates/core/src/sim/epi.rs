// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{byte_of, merge_byte, Peripheral, SimResult};
use crate::regs::epi::{
    ADDRMAP, ADDRMAP_ERADR_MASK, ADDRMAP_ERADR_SHIFT, ADDRMAP_ERSZ_MASK, ADDRMAP_ERSZ_SHIFT, BAUD,
    CFG, CFG_MODE_MASK, HB8CFG,
};
use std::any::Any;

/// EPI0 configuration registers. Bus cycles themselves are not modelled.
#[derive(Debug, Default, serde::Serialize)]
pub struct Epi {
    cfg: u32,
    baud: u32,
    hb8cfg: u32,
    addrmap: u32,
}

impl Epi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cfg(&self) -> u32 {
        self.cfg
    }

    pub fn baud(&self) -> u32 {
        self.baud
    }

    pub fn hb8cfg(&self) -> u32 {
        self.hb8cfg
    }

    pub fn addrmap(&self) -> u32 {
        self.addrmap
    }

    /// EPICFG MODE field.
    pub fn mode(&self) -> u32 {
        self.cfg & CFG_MODE_MASK
    }

    /// `(base, size)` of the external RAM window EPIADDRMAP decodes, if any.
    pub fn mapped_window(&self) -> Option<(u32, u32)> {
        let base = match (self.addrmap & ADDRMAP_ERADR_MASK) >> ADDRMAP_ERADR_SHIFT {
            1 => 0x6000_0000,
            2 => 0x8000_0000,
            _ => return None,
        };
        let size = match (self.addrmap & ADDRMAP_ERSZ_MASK) >> ADDRMAP_ERSZ_SHIFT {
            0 => 0x100,
            1 => 0x1_0000,
            2 => 0x100_0000,
            _ => 0x1000_0000,
        };
        Some((base, size))
    }

    fn read_reg(&self, offset: u64) -> u32 {
        match offset as u32 {
            CFG => self.cfg,
            BAUD => self.baud,
            HB8CFG => self.hb8cfg,
            ADDRMAP => self.addrmap,
            _ => 0,
        }
    }

    fn write_reg(&mut self, offset: u64, value: u32) {
        match offset as u32 {
            CFG => self.cfg = value,
            BAUD => self.baud = value,
            HB8CFG => self.hb8cfg = value,
            ADDRMAP => self.addrmap = value & 0xFF,
            _ => {}
        }
    }
}

impl Peripheral for Epi {
    fn read(&self, offset: u64) -> SimResult<u8> {
        Ok(byte_of(self.read_reg(offset & !3), offset))
    }

    fn write(&mut self, offset: u64, value: u8) -> SimResult<()> {
        let reg_offset = offset & !3;
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
