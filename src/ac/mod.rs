//! AC state codec: canonical appliance state ↔ protocol byte frames.
//!
//! Air conditioners are stateful devices, not button collections: every
//! transmission carries the complete state (power, mode, setpoint, fan,
//! swing, feature bits), so any single mutation — even toggling one
//! boolean — regenerates and retransmits the whole frame. That is a
//! protocol-family invariant, and the API is shaped around it:
//! [`encode_state`] always builds the full frame from the full state, and
//! [`AcRemote`]'s setters re-encode on every change.
//!
//! Per-brand byte layouts and checksum algorithms live in [`encoders`];
//! the (intentionally partial) inverse lives in [`decode`].

pub mod decode;
pub mod encoders;

use serde::{Deserialize, Serialize};

use crate::code::{ProtocolId, TimingSymbol};
use crate::error::EncodeError;

/// Temperature limits for the canonical state, in °C.
pub const TEMP_MIN_C: u8 = 16;
pub const TEMP_MAX_C: u8 = 30;
pub const TEMP_DEFAULT_C: u8 = 24;

/// AC operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcMode {
    /// Power off (some protocols use a separate power bit).
    Off,
    Auto,
    #[default]
    Cool,
    Heat,
    Dry,
    Fan,
}

/// AC fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FanSpeed {
    #[default]
    Auto,
    Low,
    Medium,
    High,
    Quiet,
    Turbo,
}

/// Louver swing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Swing {
    #[default]
    Off,
    Vertical,
    Horizontal,
    Both,
    Auto,
}

impl std::fmt::Display for AcMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AcMode::Off => "Off",
            AcMode::Auto => "Auto",
            AcMode::Cool => "Cool",
            AcMode::Heat => "Heat",
            AcMode::Dry => "Dry",
            AcMode::Fan => "Fan",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FanSpeed::Auto => "Auto",
            FanSpeed::Low => "Low",
            FanSpeed::Medium => "Medium",
            FanSpeed::High => "High",
            FanSpeed::Quiet => "Quiet",
            FanSpeed::Turbo => "Turbo",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Swing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Swing::Off => "Off",
            Swing::Vertical => "Vertical",
            Swing::Horizontal => "Horizontal",
            Swing::Both => "Both",
            Swing::Auto => "Auto",
        };
        f.write_str(s)
    }
}

/// Complete canonical AC state: the single source of truth the caller
/// mutates field by field. Exchanged with the external parameter-mapping
/// collaborator as-is (serde).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcState {
    pub power: bool,
    pub mode: AcMode,
    /// Target temperature in °C (16–30).
    pub temperature_c: u8,
    pub fan: FanSpeed,
    pub swing: Swing,

    // Extended features (protocol-dependent; encoders carry what fits)
    pub turbo: bool,
    pub quiet: bool,
    pub econo: bool,
    pub clean: bool,
    pub sleep: bool,
    /// Sleep timer in minutes, 0 = disabled.
    pub sleep_timer_min: u8,
    pub display: bool,
    pub beep: bool,
    pub filter: bool,
    pub light: bool,

    /// Which protocol encodes this state.
    pub protocol: ProtocolId,
    /// Variant within the protocol (0 = default).
    pub variant: u8,
}

impl Default for AcState {
    fn default() -> Self {
        Self {
            power: false,
            mode: AcMode::Cool,
            temperature_c: TEMP_DEFAULT_C,
            fan: FanSpeed::Auto,
            swing: Swing::Off,
            turbo: false,
            quiet: false,
            econo: false,
            clean: false,
            sleep: false,
            sleep_timer_min: 0,
            display: true,
            beep: true,
            filter: false,
            light: true,
            protocol: ProtocolId::Unknown,
            variant: 0,
        }
    }
}

impl AcState {
    /// Whether the unit should actually run: power on and a running mode.
    pub(crate) fn is_on(&self) -> bool {
        self.power && self.mode != AcMode::Off
    }

    /// Range-check the state against what any protocol can express.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.temperature_c < TEMP_MIN_C || self.temperature_c > TEMP_MAX_C {
            return Err(EncodeError::InvalidState("temperature out of 16-30°C range"));
        }
        Ok(())
    }
}

/// A fully regenerated transmission frame. The symbol buffer is owned by
/// the caller after return; nothing inside the codec retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFrame {
    pub protocol: ProtocolId,
    /// The protocol byte frame(s), in wire order.
    pub bytes: Vec<u8>,
    /// Logical bit count of the transmission.
    pub bits: u16,
    /// Replayable symbol sequence.
    pub symbols: Vec<TimingSymbol>,
    pub carrier_hz: u32,
    pub duty_cycle_pct: u8,
}

/// Encode a complete state into a transmission frame using the protocol
/// recorded in the state itself.
pub fn encode_state(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    state.validate()?;
    encoders::encode(state)
}

/// Stateful wrapper mirroring how a physical remote is used: mutate one
/// field, transmit the whole state. Every setter validates, applies, and
/// returns the fully re-encoded frame for the caller to transmit.
#[derive(Debug, Clone)]
pub struct AcRemote {
    state: AcState,
}

impl AcRemote {
    /// A remote for a configured protocol, starting from the default state.
    pub fn new(protocol: ProtocolId, variant: u8) -> Result<Self, EncodeError> {
        if !protocol.is_ac() {
            return Err(EncodeError::NotImplemented(protocol));
        }
        let state = AcState { protocol, variant, ..AcState::default() };
        Ok(Self { state })
    }

    /// A remote resuming from a known state (e.g. loaded from storage).
    pub fn from_state(state: AcState) -> Result<Self, EncodeError> {
        if !state.protocol.is_ac() {
            return Err(EncodeError::NotImplemented(state.protocol));
        }
        state.validate()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &AcState {
        &self.state
    }

    pub fn set_power(&mut self, power: bool) -> Result<EncodedFrame, EncodeError> {
        self.state.power = power;
        tracing::info!(power, "AC power");
        self.encode()
    }

    pub fn set_mode(&mut self, mode: AcMode) -> Result<EncodedFrame, EncodeError> {
        self.state.mode = mode;
        tracing::info!(mode = %mode, "AC mode");
        self.encode()
    }

    pub fn set_temperature(&mut self, temperature_c: u8) -> Result<EncodedFrame, EncodeError> {
        if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temperature_c) {
            return Err(EncodeError::InvalidState("temperature out of 16-30°C range"));
        }
        self.state.temperature_c = temperature_c;
        tracing::info!(temperature_c, "AC temperature");
        self.encode()
    }

    pub fn set_fan_speed(&mut self, fan: FanSpeed) -> Result<EncodedFrame, EncodeError> {
        self.state.fan = fan;
        tracing::info!(fan = %fan, "AC fan speed");
        self.encode()
    }

    pub fn set_swing(&mut self, swing: Swing) -> Result<EncodedFrame, EncodeError> {
        self.state.swing = swing;
        tracing::info!(swing = %swing, "AC swing");
        self.encode()
    }

    /// Mutate any combination of fields atomically, then re-encode once.
    pub fn update(
        &mut self,
        apply: impl FnOnce(&mut AcState),
    ) -> Result<EncodedFrame, EncodeError> {
        let mut next = self.state.clone();
        apply(&mut next);
        next.validate()?;
        // Protocol identity is part of the remote, not a mutable field.
        next.protocol = self.state.protocol;
        next.variant = self.state.variant;
        self.state = next;
        self.encode()
    }

    /// Re-encode the current state in full.
    pub fn encode(&self) -> Result<EncodedFrame, EncodeError> {
        encode_state(&self.state)
    }
}
