// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use ks10_epi::board::{self, RevisionPolicy};
use ks10_epi::mmio::Mmio;
use ks10_epi::{BridgeProfile, BusBridge, Capability};
use panic_halt as _;

/// Whether this image drives the KS10 FPGA, picked by the `ks10` feature.
const CAPABILITY: Capability = Capability::from_flag(cfg!(feature = "ks10"));

/// Whether a non-C3 part halts the boot, picked by the `debug-cpu` feature.
const REVISION_POLICY: RevisionPolicy =
    RevisionPolicy::from_debug_flag(cfg!(feature = "debug-cpu"));

type BootStep = (&'static str, fn(&mut Mmio));

/// Runs top to bottom, once, with interrupts masked and before any task
/// exists. Anything that touches the KS10 window must come after "epi".
const BOOT_SEQUENCE: &[BootStep] = &[
    ("revision", check_revision),
    ("status-leds", board::init_status_leds::<Mmio>),
    ("epi", init_epi),
];

fn check_revision(bus: &mut Mmio) {
    if board::check_revision(&*bus, REVISION_POLICY).is_err() {
        fatal();
    }
}

fn init_epi(bus: &mut Mmio) {
    match BusBridge::new(BridgeProfile::KS10, CAPABILITY) {
        Ok(bridge) => bridge.initialize(bus),
        Err(_) => fatal(),
    }
}

/// Mask interrupts and stop.
fn fatal() -> ! {
    cortex_m::interrupt::disable();
    loop {
        cortex_m::asm::nop();
    }
}

#[entry]
fn main() -> ! {
    // SAFETY: nothing else runs yet, so the boot list owns every register.
    let mut bus = unsafe { Mmio::new() };
    for (_name, step) in BOOT_SEQUENCE {
        step(&mut bus);
    }

    // SAFETY: bring-up is finished; handlers may now run.
    unsafe { cortex_m::interrupt::enable() };

    // The console, telnet and SD tasks are linked in on top of this image and
    // reach the FPGA through `ks10_epi::address_window_base()`.
    loop {
        cortex_m::asm::wfi();
    }
}
