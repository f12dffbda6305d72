// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! YAML description of an EPI bridge: capability, timing, window and pin-out.

use anyhow::{Context, Result};
use ks10_epi::{
    AddressWindow, BridgeProfile, BusBridge, BusTimingProfile, Capability, ChipSelect, MuxMode,
    Pin, PinAssignment, ProfileError, TransferWidth, WaitStates, WindowSize, WindowSlot,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_function() -> u8 {
    ks10_epi::pins::EPI_ALT_FUNCTION
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported transfer width {0} (supported: 8, 16)")]
    UnsupportedWidth(u8),
    #[error("unsupported window slot {0} (supported: 6, 8)")]
    UnsupportedSlot(u8),
    #[error("window size of {0} bytes is not one the EPI decodes (256B, 64KiB, 16MiB, 256MiB)")]
    UnsupportedWindowSize(u64),
    #[error("invalid pin '{name}' for S{signal}: {source}")]
    InvalidPin {
        name: String,
        signal: u8,
        source: ks10_epi::PinParseError,
    },
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityConfig {
    #[default]
    Present,
    #[serde(alias = "stub")]
    Absent,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MuxConfig {
    #[serde(alias = "admux")]
    Multiplexed,
    #[serde(alias = "adnonmux")]
    Separate,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChipSelectConfig {
    Ale,
    #[serde(alias = "cs")]
    SingleCs,
    DualCs,
    AleDualCs,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingConfig {
    /// Data width in bits.
    pub width: u8,
    #[serde(default = "default_true")]
    pub word_access: bool,
    pub read_wait: u8,
    pub write_wait: u8,
    pub mux: MuxConfig,
    pub chip_select: ChipSelectConfig,
    #[serde(default)]
    pub clock_divider: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WindowConfig {
    /// Top nibble of the window base: 6 for 0x6000_0000, 8 for 0x8000_0000.
    pub slot: u8,
    pub size: String, // e.g. "256B"
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PinBinding {
    pub signal: u8,
    pub pin: String, // e.g. "PH3"
    #[serde(default = "default_function")]
    pub function: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BridgeManifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub name: String,
    #[serde(default)]
    pub capability: CapabilityConfig,
    pub timing: TimingConfig,
    pub window: WindowConfig,
    pub pins: Vec<PinBinding>,
}

impl BridgeManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bridge manifest {:?}", path))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse Bridge Manifest YAML")
    }

    pub fn capability(&self) -> Capability {
        match self.capability {
            CapabilityConfig::Present => Capability::Present,
            CapabilityConfig::Absent => Capability::Absent,
        }
    }

    pub fn timing(&self) -> Result<BusTimingProfile, ConfigError> {
        let t = &self.timing;
        let width = match t.width {
            8 => TransferWidth::Bits8,
            16 => TransferWidth::Bits16,
            other => return Err(ConfigError::UnsupportedWidth(other)),
        };
        Ok(BusTimingProfile {
            width,
            word_access: t.word_access,
            read_wait: WaitStates::new(t.read_wait)?,
            write_wait: WaitStates::new(t.write_wait)?,
            mux: match t.mux {
                MuxConfig::Multiplexed => MuxMode::Multiplexed,
                MuxConfig::Separate => MuxMode::Separate,
            },
            chip_select: match t.chip_select {
                ChipSelectConfig::Ale => ChipSelect::Ale,
                ChipSelectConfig::SingleCs => ChipSelect::SingleCs,
                ChipSelectConfig::DualCs => ChipSelect::DualCs,
                ChipSelectConfig::AleDualCs => ChipSelect::AleDualCs,
            },
            clock_divider: t.clock_divider,
        })
    }

    pub fn window(&self) -> Result<AddressWindow> {
        let slot = WindowSlot::from_index(self.window.slot)
            .ok_or(ConfigError::UnsupportedSlot(self.window.slot))?;
        let bytes = parse_size(&self.window.size)?;
        let size = WindowSize::from_bytes(bytes).ok_or(ConfigError::UnsupportedWindowSize(bytes))?;
        Ok(AddressWindow { slot, size })
    }

    pub fn pins(&self) -> Result<Vec<PinAssignment>, ConfigError> {
        self.pins
            .iter()
            .map(|b| {
                let pin: Pin = b.pin.parse().map_err(|source| ConfigError::InvalidPin {
                    name: b.pin.clone(),
                    signal: b.signal,
                    source,
                })?;
                Ok(PinAssignment {
                    pin,
                    signal: b.signal,
                    function: b.function,
                })
            })
            .collect()
    }

    /// Convert and validate the whole manifest.
    pub fn resolve(&self) -> Result<ResolvedBridge> {
        if self.schema_version != default_schema_version() {
            tracing::warn!(
                "Bridge manifest '{}' uses schema {}, expected {}",
                self.name,
                self.schema_version,
                default_schema_version()
            );
        }

        let resolved = ResolvedBridge {
            name: self.name.clone(),
            capability: self.capability(),
            pins: self.pins()?,
            timing: self.timing()?,
            window: self.window()?,
        };
        resolved
            .profile()
            .validate()
            .with_context(|| format!("Bridge manifest '{}' is not a usable profile", self.name))?;
        Ok(resolved)
    }
}

/// Manifest turned into core types. Owns the pin table the profile borrows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBridge {
    pub name: String,
    pub capability: Capability,
    pub pins: Vec<PinAssignment>,
    pub timing: BusTimingProfile,
    pub window: AddressWindow,
}

impl ResolvedBridge {
    pub fn profile(&self) -> BridgeProfile<'_> {
        BridgeProfile {
            pins: &self.pins,
            timing: self.timing,
            window: self.window,
        }
    }

    pub fn bridge(&self) -> Result<BusBridge<'_>, ProfileError> {
        BusBridge::new(self.profile(), self.capability)
    }

    /// The built-in console profile, as if read from a manifest.
    pub fn ks10() -> Self {
        let profile = BridgeProfile::KS10;
        Self {
            name: "ks10-console".to_string(),
            capability: Capability::Present,
            pins: profile.pins.to_vec(),
            timing: profile.timing,
            window: profile.window,
        }
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}
