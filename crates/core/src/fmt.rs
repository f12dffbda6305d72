// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

// Forwarding macros so the bring-up path logs through `tracing` on the host
// and compiles to nothing in the firmware build.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::tracing::debug!($($arg)*);
        #[cfg(not(feature = "std"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::tracing::info!($($arg)*);
        #[cfg(not(feature = "std"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::tracing::warn!($($arg)*);
        #[cfg(not(feature = "std"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
