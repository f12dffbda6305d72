// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Pin assignment table: which GPIO pin carries which EPI signal.

use crate::error::{PinParseError, ProfileError};
use core::fmt;
use core::str::FromStr;

/// Number of EPI address/data signals (EPI0S0..EPI0S31).
pub const SIGNAL_COUNT: usize = 32;

/// PCTL code selecting the EPI function on most pins.
pub const EPI_ALT_FUNCTION: u8 = 8;

/// GPIO ports present on the console part. There is no port I.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
}

impl Port {
    pub const ALL: [Port; 9] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
        Port::J,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// APB aperture of the port's register block.
    pub const fn base(self) -> u32 {
        match self {
            Port::A => 0x4000_4000,
            Port::B => 0x4000_5000,
            Port::C => 0x4000_6000,
            Port::D => 0x4000_7000,
            Port::E => 0x4002_4000,
            Port::F => 0x4002_5000,
            Port::G => 0x4002_6000,
            Port::H => 0x4002_7000,
            Port::J => 0x4003_D000,
        }
    }

    /// Clock gate bit in RCGC2. J follows H directly.
    pub const fn rcgc2_bit(self) -> u32 {
        1 << (self as u32)
    }

    pub const fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
            Port::H => 'H',
            Port::J => 'J',
        }
    }

    pub fn from_letter(c: char) -> Option<Port> {
        Port::ALL
            .into_iter()
            .find(|p| p.letter() == c.to_ascii_uppercase())
    }

    /// Address of a register in this port's block.
    pub const fn reg(self, offset: u32) -> u32 {
        self.base() + offset
    }
}

/// A physical pin, e.g. PH3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin {
    pub port: Port,
    pub number: u8,
}

impl Pin {
    pub const fn new(port: Port, number: u8) -> Self {
        Self { port, number }
    }

    pub const fn mask(self) -> u8 {
        1 << (self.number & 7)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.number)
    }
}

impl FromStr for Pin {
    type Err = PinParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.trim().chars();
        match chars.next() {
            Some('P') | Some('p') => {}
            _ => return Err(PinParseError::Malformed),
        }
        let letter = chars.next().ok_or(PinParseError::Malformed)?;
        let port = Port::from_letter(letter).ok_or(PinParseError::UnknownPort(letter))?;
        let digit = chars.next().ok_or(PinParseError::Malformed)?;
        if chars.next().is_some() {
            return Err(PinParseError::Malformed);
        }
        let number = digit.to_digit(10).ok_or(PinParseError::BadNumber)?;
        if number > 7 {
            return Err(PinParseError::BadNumber);
        }
        Ok(Pin::new(port, number as u8))
    }
}

#[cfg(feature = "std")]
impl serde::Serialize for Pin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the table: `pin` carries EPI signal `signal` via PCTL code `function`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct PinAssignment {
    pub pin: Pin,
    pub signal: u8,
    pub function: u8,
}

impl PinAssignment {
    pub const fn epi(port: Port, number: u8, signal: u8) -> Self {
        Self::with_function(port, number, signal, EPI_ALT_FUNCTION)
    }

    pub const fn with_function(port: Port, number: u8, signal: u8, function: u8) -> Self {
        Self {
            pin: Pin::new(port, number),
            signal,
            function,
        }
    }
}

/// Pin-out of the console board.
pub const KS10_PIN_TABLE: [PinAssignment; SIGNAL_COUNT] = [
    PinAssignment::epi(Port::H, 3, 0),
    PinAssignment::epi(Port::H, 2, 1),
    PinAssignment::epi(Port::C, 4, 2),
    PinAssignment::epi(Port::C, 5, 3),
    PinAssignment::epi(Port::C, 6, 4),
    PinAssignment::epi(Port::C, 7, 5),
    PinAssignment::epi(Port::H, 0, 6),
    PinAssignment::epi(Port::H, 1, 7),
    PinAssignment::epi(Port::E, 0, 8),
    PinAssignment::epi(Port::E, 1, 9),
    PinAssignment::epi(Port::H, 4, 10),
    PinAssignment::epi(Port::H, 5, 11),
    PinAssignment::epi(Port::F, 4, 12),
    PinAssignment::epi(Port::G, 0, 13),
    PinAssignment::epi(Port::G, 1, 14),
    PinAssignment::epi(Port::F, 5, 15),
    PinAssignment::epi(Port::J, 0, 16),
    PinAssignment::epi(Port::J, 1, 17),
    PinAssignment::epi(Port::J, 2, 18),
    PinAssignment::epi(Port::D, 4, 19),
    PinAssignment::epi(Port::D, 2, 20),
    PinAssignment::epi(Port::D, 3, 21),
    PinAssignment::epi(Port::B, 5, 22),
    PinAssignment::epi(Port::B, 4, 23),
    PinAssignment::epi(Port::E, 2, 24),
    PinAssignment::epi(Port::E, 3, 25),
    PinAssignment::epi(Port::H, 6, 26),
    PinAssignment::epi(Port::H, 7, 27),
    PinAssignment::epi(Port::J, 4, 28),
    PinAssignment::epi(Port::J, 5, 29),
    PinAssignment::epi(Port::D, 7, 30),
    PinAssignment::with_function(Port::G, 7, 31, 9),
];

/// Per-port union of the pins a table binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortMasks([u8; Port::ALL.len()]);

impl PortMasks {
    pub fn from_table(table: &[PinAssignment]) -> Self {
        let mut masks = [0u8; Port::ALL.len()];
        for a in table {
            masks[a.pin.port.index()] |= a.pin.mask();
        }
        Self(masks)
    }

    pub fn get(&self, port: Port) -> u8 {
        self.0[port.index()]
    }

    /// Ports with at least one bound pin, paired with their mask.
    pub fn touched(&self) -> impl Iterator<Item = (Port, u8)> + '_ {
        Port::ALL
            .into_iter()
            .map(|p| (p, self.get(p)))
            .filter(|&(_, mask)| mask != 0)
    }

    /// RCGC2 bits for every touched port.
    pub fn rcgc2(&self) -> u32 {
        self.touched().fold(0, |acc, (p, _)| acc | p.rcgc2_bit())
    }
}

/// Checks the table for reused pins, doubly bound or out-of-range signals and
/// bad PCTL codes. Every signal in `required` must be present.
pub fn validate_table(
    table: &[PinAssignment],
    required: core::ops::Range<u8>,
) -> Result<(), ProfileError> {
    let mut signals: u32 = 0;
    let mut used = [0u8; Port::ALL.len()];

    for a in table {
        if a.pin.number > 7 {
            return Err(ProfileError::PinOutOfRange(a.pin));
        }
        if a.function > 0xF {
            return Err(ProfileError::FunctionOutOfRange {
                pin: a.pin,
                function: a.function,
            });
        }
        if a.signal as usize >= SIGNAL_COUNT {
            return Err(ProfileError::SignalOutOfRange(a.signal));
        }

        let bit = 1u32 << a.signal;
        if signals & bit != 0 {
            return Err(ProfileError::DuplicateSignal(a.signal));
        }
        signals |= bit;

        let slot = &mut used[a.pin.port.index()];
        if *slot & a.pin.mask() != 0 {
            return Err(ProfileError::PinReused(a.pin));
        }
        *slot |= a.pin.mask();
    }

    for signal in required {
        if signals & (1u32 << signal) == 0 {
            return Err(ProfileError::MissingSignal(signal));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_signal_bound_once() {
        let mut seen = [0u32; SIGNAL_COUNT];
        for a in &KS10_PIN_TABLE {
            seen[a.signal as usize] += 1;
        }
        assert!(seen.iter().all(|&n| n == 1), "signal histogram: {:?}", seen);
    }

    #[test]
    fn test_no_pin_reused() {
        for (i, a) in KS10_PIN_TABLE.iter().enumerate() {
            for b in &KS10_PIN_TABLE[i + 1..] {
                assert_ne!(a.pin, b.pin, "S{} and S{} share a pin", a.signal, b.signal);
            }
        }
    }

    #[test]
    fn test_reference_table_validates() {
        assert_eq!(validate_table(&KS10_PIN_TABLE, 0..32), Ok(()));
    }

    #[test]
    fn test_port_masks_for_reference_table() {
        let masks = PortMasks::from_table(&KS10_PIN_TABLE);
        assert_eq!(masks.get(Port::A), 0x00);
        assert_eq!(masks.get(Port::B), 0x30);
        assert_eq!(masks.get(Port::C), 0xF0);
        assert_eq!(masks.get(Port::D), 0x9C);
        assert_eq!(masks.get(Port::E), 0x0F);
        assert_eq!(masks.get(Port::F), 0x30);
        // PG7 carries S31; PG5 is not on the bus.
        assert_eq!(masks.get(Port::G), 0x83);
        assert_eq!(masks.get(Port::H), 0xFF);
        // PJ3 is not on the bus.
        assert_eq!(masks.get(Port::J), 0x37);
        assert_eq!(masks.touched().count(), 8);
        assert_eq!(masks.rcgc2(), 0x1FE);
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let table = KS10_PIN_TABLE;
        assert_eq!(
            validate_table(&table[..31], 0..32),
            Err(ProfileError::MissingSignal(31))
        );
    }

    #[test]
    fn test_duplicate_signal_rejected() {
        let mut table = KS10_PIN_TABLE;
        table[1].signal = 0;
        assert_eq!(
            validate_table(&table, 0..32),
            Err(ProfileError::DuplicateSignal(0))
        );
    }

    #[test]
    fn test_reused_pin_rejected() {
        let mut table = KS10_PIN_TABLE;
        table[1].pin = Pin::new(Port::H, 3);
        assert_eq!(
            validate_table(&table, 0..32),
            Err(ProfileError::PinReused(Pin::new(Port::H, 3)))
        );
    }

    #[test]
    fn test_out_of_range_entries_rejected() {
        let bad_signal = [PinAssignment::epi(Port::A, 0, 32)];
        assert_eq!(
            validate_table(&bad_signal, 0..0),
            Err(ProfileError::SignalOutOfRange(32))
        );

        let bad_function = [PinAssignment::with_function(Port::A, 0, 0, 16)];
        assert!(matches!(
            validate_table(&bad_function, 0..0),
            Err(ProfileError::FunctionOutOfRange { function: 16, .. })
        ));

        let bad_pin = [PinAssignment::epi(Port::A, 8, 0)];
        assert!(matches!(
            validate_table(&bad_pin, 0..0),
            Err(ProfileError::PinOutOfRange(_))
        ));
    }

    #[test]
    fn test_pin_names() {
        assert_eq!("PH3".parse::<Pin>(), Ok(Pin::new(Port::H, 3)));
        assert_eq!("pj5".parse::<Pin>(), Ok(Pin::new(Port::J, 5)));
        assert_eq!("PI0".parse::<Pin>(), Err(PinParseError::UnknownPort('I')));
        assert_eq!("PA8".parse::<Pin>(), Err(PinParseError::BadNumber));
        assert_eq!("PA10".parse::<Pin>(), Err(PinParseError::Malformed));
        assert_eq!("H3".parse::<Pin>(), Err(PinParseError::Malformed));
        assert_eq!(Pin::new(Port::G, 7).to_string(), "PG7");
    }
}
