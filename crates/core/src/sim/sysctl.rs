// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{byte_of, merge_byte, Peripheral, SimResult};
use crate::regs::sysctl::{DID0, RCGC1, RCGC2};

/// Silicon revision C3 of the console part.
pub const DID0_REV_C3: u32 = 0x1804_0203;

/// Minimal SYSCTL: device identification and run-mode clock gating.
#[derive(Debug, Default, serde::Serialize)]
pub struct SysCtl {
    did0: u32,
    rcgc1: u32,
    rcgc2: u32,
}

impl SysCtl {
    pub fn new() -> Self {
        Self::new_with_did0(DID0_REV_C3)
    }

    pub fn new_with_did0(did0: u32) -> Self {
        Self {
            did0,
            rcgc1: 0,
            rcgc2: 0,
        }
    }

    pub fn is_enabled(&self, register: u32, mask: u32) -> bool {
        self.read_reg(register as u64) & mask == mask
    }

    pub fn rcgc1(&self) -> u32 {
        self.rcgc1
    }

    pub fn rcgc2(&self) -> u32 {
        self.rcgc2
    }

    fn read_reg(&self, offset: u64) -> u32 {
        match offset as u32 {
            DID0 => self.did0,
            RCGC1 => self.rcgc1,
            RCGC2 => self.rcgc2,
            _ => 0,
        }
    }

    fn write_reg(&mut self, offset: u64, value: u32) {
        match offset as u32 {
            RCGC1 => self.rcgc1 = value,
            RCGC2 => self.rcgc2 = value,
            // DID0 is read-only.
            _ => {}
        }
    }
}

impl Peripheral for SysCtl {
    fn read(&self, offset: u64) -> SimResult<u8> {
        Ok(byte_of(self.read_reg(offset & !3), offset))
    }

    fn write(&mut self, offset: u64, value: u8) -> SimResult<()> {
        let reg_offset = offset & !3;
        let reg_val = merge_byte(self.read_reg(reg_offset), offset, value);
        self.write_reg(reg_offset, reg_val);
        Ok(())
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_gate_registers() {
        let mut sysctl = SysCtl::new();
        sysctl.write(0x107, 0x40).unwrap();
        sysctl.write(0x108, 0xFE).unwrap();
        sysctl.write(0x109, 0x01).unwrap();
        assert_eq!(sysctl.rcgc1(), 1 << 30);
        assert_eq!(sysctl.rcgc2(), 0x1FE);
        assert!(sysctl.is_enabled(RCGC1, 1 << 30));
        assert!(sysctl.is_enabled(RCGC2, 1 << 8));
        assert!(!sysctl.is_enabled(RCGC2, 1 << 0));
    }

    #[test]
    fn test_did0_is_read_only() {
        let mut sysctl = SysCtl::new_with_did0(0x1804_0101);
        sysctl.write(0x000, 0x03).unwrap();
        assert_eq!(sysctl.read(0x000).unwrap(), 0x01);
        assert_eq!(sysctl.read(0x001).unwrap(), 0x01);
    }
}
