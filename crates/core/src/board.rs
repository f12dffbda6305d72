// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Board bring-up that runs next to the EPI in the boot list.

use crate::pins::Port;
use crate::regs::{gpio, sysctl, Revision};
use crate::RegisterBus;

/// Ethernet activity LEDs on PF2 and PF3.
pub const STATUS_LED_PORT: Port = Port::F;
pub const STATUS_LED_MASK: u8 = (1 << 2) | (1 << 3);

/// Drive the status LEDs as outputs, both off.
///
/// Only PF2/PF3 are touched, so this can run before or after the EPI claims
/// PF4/PF5.
pub fn init_status_leds<B: RegisterBus + ?Sized>(bus: &mut B) {
    let port = STATUS_LED_PORT;
    let mask = u32::from(STATUS_LED_MASK);

    bus.set_bits(sysctl::reg(sysctl::RCGC2), port.rcgc2_bit());
    bus.set_bits(port.reg(gpio::DIR), mask);
    bus.clear_bits(port.reg(gpio::AFSEL), mask);
    bus.set_bits(port.reg(gpio::DEN), mask);
    bus.write(port.reg(gpio::data_masked(STATUS_LED_MASK)), 0);
    debug!("status LEDs on GPIO{} {:#04x}", port.letter(), mask);
}

/// What to do when the part is not revision C3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionPolicy {
    /// Refuse to boot.
    Require,
    /// Log the mismatch and carry on. For CPU debugging on other parts.
    WarnOnly,
}

impl RevisionPolicy {
    pub const fn from_debug_flag(debug_cpu: bool) -> Self {
        if debug_cpu {
            RevisionPolicy::WarnOnly
        } else {
            RevisionPolicy::Require
        }
    }
}

/// Read DID0 and check for revision C3, which the ROM routines depend on.
pub fn check_revision<B: RegisterBus + ?Sized>(
    bus: &B,
    policy: RevisionPolicy,
) -> Result<Revision, Revision> {
    let rev = Revision::from_did0(bus.read(sysctl::reg(sysctl::DID0)));
    if rev.is_c3() {
        info!("device revision {}", rev);
        return Ok(rev);
    }
    warn!("unsupported device revision {}", rev);
    match policy {
        RevisionPolicy::Require => Err(rev),
        RevisionPolicy::WarnOnly => Ok(rev),
    }
}
