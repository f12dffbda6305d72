// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::pins::Pin;

/// Rejected bridge profile. Raised before any register is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("EPI signal S{0} has no pin assigned")]
    MissingSignal(u8),
    #[error("EPI signal S{0} is assigned more than once")]
    DuplicateSignal(u8),
    #[error("EPI signal S{0} does not exist (valid: S0..S31)")]
    SignalOutOfRange(u8),
    #[error("pin {0} is bound to more than one EPI signal")]
    PinReused(Pin),
    #[error("pin {0} has an out-of-range pin number (valid: 0..7)")]
    PinOutOfRange(Pin),
    #[error("alternate function {function} for pin {pin} does not fit in a PCTL field")]
    FunctionOutOfRange { pin: Pin, function: u8 },
    #[error("{0} wait states requested, the host bus supports at most 3")]
    WaitStatesOutOfRange(u8),
    #[error("address window has no placement slot")]
    UnmappedWindow,
}

/// Malformed pin name such as `"PX9"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinParseError {
    #[error("pin name must look like 'PH3'")]
    Malformed,
    #[error("unknown GPIO port '{0}'")]
    UnknownPort(char),
    #[error("pin number must be 0..7")]
    BadNumber,
}
