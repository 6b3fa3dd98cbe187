//! Core data model: timing symbols, protocol identifiers, and decoded codes.

use serde::{Deserialize, Serialize};

/// One IR symbol: the duration the carrier was active (mark) followed by
/// the duration it was inactive (space), both in microseconds.
///
/// A capture is an ordered sequence of these; sequence length and the two
/// durations are the entire input alphabet. Immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSymbol {
    pub mark_us: u32,
    pub space_us: u32,
}

impl TimingSymbol {
    pub const fn new(mark_us: u32, space_us: u32) -> Self {
        Self { mark_us, space_us }
    }
}

/// Protocol identifier. Closed enumeration; drives decoder dispatch,
/// constants lookup, and encoder selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolId {
    Unknown,

    // Standard consumer protocols
    Nec,
    Samsung,
    Sony,
    Jvc,
    Rc5,
    Rc6,
    Lg,
    Denon,
    Sharp,
    Panasonic,
    Kaseikyo,

    // Brand-specific variants
    Apple,
    Onkyo,
    Samsung48,
    SamsungLg,
    Lg2,

    // Air conditioner protocols
    Mitsubishi,
    Daikin,
    Fujitsu,
    Haier,
    Midea,
    Carrier,
    Hitachi,

    // Exotic / legacy
    Whynter,
    LegoPf,
    MagiQuest,
    BoseWave,
    BangOlufsen,
    Fast,

    // Universal decoder results
    PulseDistance,
    PulseWidth,

    /// Raw timing data, kept verbatim when no decoder matched.
    Raw,
}

impl ProtocolId {
    /// Whether this protocol belongs to the air-conditioner family
    /// (full-state frames, byte layouts, per-brand checksums).
    pub fn is_ac(self) -> bool {
        matches!(
            self,
            ProtocolId::Mitsubishi
                | ProtocolId::Daikin
                | ProtocolId::Fujitsu
                | ProtocolId::Haier
                | ProtocolId::Midea
                | ProtocolId::Carrier
                | ProtocolId::Hitachi
                | ProtocolId::Samsung48
                | ProtocolId::Panasonic
                | ProtocolId::Kaseikyo
                | ProtocolId::Lg2
        )
    }

    /// Whether this protocol uses bi-phase (Manchester) encoding.
    pub fn is_biphase(self) -> bool {
        matches!(self, ProtocolId::Rc5 | ProtocolId::Rc6)
    }
}

impl std::fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProtocolId::Unknown => "UNKNOWN",
            ProtocolId::Nec => "NEC",
            ProtocolId::Samsung => "SAMSUNG",
            ProtocolId::Sony => "SONY",
            ProtocolId::Jvc => "JVC",
            ProtocolId::Rc5 => "RC5",
            ProtocolId::Rc6 => "RC6",
            ProtocolId::Lg => "LG",
            ProtocolId::Denon => "DENON",
            ProtocolId::Sharp => "SHARP",
            ProtocolId::Panasonic => "PANASONIC",
            ProtocolId::Kaseikyo => "KASEIKYO",
            ProtocolId::Apple => "APPLE",
            ProtocolId::Onkyo => "ONKYO",
            ProtocolId::Samsung48 => "SAMSUNG48",
            ProtocolId::SamsungLg => "SAMSUNGLG",
            ProtocolId::Lg2 => "LG2",
            ProtocolId::Mitsubishi => "MITSUBISHI",
            ProtocolId::Daikin => "DAIKIN",
            ProtocolId::Fujitsu => "FUJITSU",
            ProtocolId::Haier => "HAIER",
            ProtocolId::Midea => "MIDEA",
            ProtocolId::Carrier => "CARRIER",
            ProtocolId::Hitachi => "HITACHI",
            ProtocolId::Whynter => "WHYNTER",
            ProtocolId::LegoPf => "LEGO_PF",
            ProtocolId::MagiQuest => "MAGIQUEST",
            ProtocolId::BoseWave => "BOSEWAVE",
            ProtocolId::BangOlufsen => "BANG_OLUFSEN",
            ProtocolId::Fast => "FAST",
            ProtocolId::PulseDistance => "PULSE_DISTANCE",
            ProtocolId::PulseWidth => "PULSE_WIDTH",
            ProtocolId::Raw => "RAW",
        };
        f.write_str(name)
    }
}

/// Status flags for a decoded code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeFlags(pub u8);

impl CodeFlags {
    pub const NONE: CodeFlags = CodeFlags(0x00);
    /// Frame is a repeat of the previous code (held button).
    pub const REPEAT: CodeFlags = CodeFlags(0x01);
    /// Protocol has a mandatory repeat frame.
    pub const AUTO_REPEAT: CodeFlags = CodeFlags(0x02);
    /// Checksum/parity validation failed. The decode is still usable.
    pub const PARITY_FAILED: CodeFlags = CodeFlags(0x04);
    /// RC5/RC6 toggle bit is set.
    pub const TOGGLE: CodeFlags = CodeFlags(0x08);
    /// Extra protocol information is present (e.g. Kaseikyo vendor id).
    pub const EXTRA_INFO: CodeFlags = CodeFlags(0x10);
    /// NEC extended addressing (16-bit address, no complement check).
    pub const EXTENDED: CodeFlags = CodeFlags(0x20);
    /// The capture buffer overflowed while receiving.
    pub const OVERFLOW: CodeFlags = CodeFlags(0x40);
    /// Data was transmitted MSB first (default is LSB first).
    pub const MSB_FIRST: CodeFlags = CodeFlags(0x80);

    #[inline]
    pub fn contains(self, other: CodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn set(&mut self, other: CodeFlags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn clear(&mut self, other: CodeFlags) {
        self.0 &= !other.0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CodeFlags {
    type Output = CodeFlags;
    fn bitor(self, rhs: CodeFlags) -> CodeFlags {
        CodeFlags(self.0 | rhs.0)
    }
}

/// Multi-frame verification status, recorded during learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// No verification performed.
    #[default]
    None,
    /// A single frame was captured, not yet confirmed.
    SingleFrame,
    /// Two consecutive frames matched.
    TwoFrames,
    /// Three consecutive frames matched.
    ThreeFrames,
}

impl ValidationStatus {
    /// Status for `n` confirmed frames.
    pub fn from_frames(n: u8) -> Self {
        match n {
            0 => ValidationStatus::None,
            1 => ValidationStatus::SingleFrame,
            2 => ValidationStatus::TwoFrames,
            _ => ValidationStatus::ThreeFrames,
        }
    }
}

/// A decoded IR code.
///
/// Produced by exactly one decode call; callers (transmit, storage) treat
/// it as immutable apart from repeat-flag annotation. `bits` always equals
/// the number of logical bits actually decoded from the symbol sequence —
/// never a constant assumed up front for variable-length protocols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCode {
    /// Protocol that produced this code.
    pub protocol: ProtocolId,
    /// Raw data word, LSB = first transmitted bit unless MSB_FIRST is set.
    pub data: u64,
    /// Number of logical bits decoded (≤ 64 for word protocols; byte
    /// protocols report `bytes * 8`).
    pub bits: u16,
    /// Device/manufacturer address field.
    pub address: u16,
    /// Command/button code field.
    pub command: u16,
    /// Status flags.
    pub flags: CodeFlags,
    /// Carrier frequency in Hz (36000, 38000, 40000, 455000).
    pub carrier_hz: u32,
    /// Carrier duty cycle in percent (typically 33).
    pub duty_cycle_pct: u8,
    /// Nominal time between repeat frames for a held button, in ms.
    pub repeat_period_ms: u16,
    /// Multi-frame verification status (learning mode only).
    pub validation: ValidationStatus,
    /// Full timing sequence; populated only for `ProtocolId::Raw`.
    pub raw: Option<Vec<TimingSymbol>>,
}

impl DecodedCode {
    /// A zeroed code for decoders to fill in. Carrier metadata defaults to
    /// the ubiquitous 38 kHz / 33% duty.
    pub fn empty(protocol: ProtocolId) -> Self {
        Self {
            protocol,
            data: 0,
            bits: 0,
            address: 0,
            command: 0,
            flags: CodeFlags::NONE,
            carrier_hz: 38_000,
            duty_cycle_pct: 33,
            repeat_period_ms: 0,
            validation: ValidationStatus::None,
            raw: None,
        }
    }

    /// Data word as a zero-padded hex string sized to the bit count.
    pub fn data_hex(&self) -> String {
        if self.bits == 0 {
            return "-".to_string();
        }
        let nibbles = ((self.bits as usize + 7) / 8) * 2;
        format!("{:0width$X}", self.data, width = nibbles)
    }

    /// Whether the checksum/parity of this code validated.
    pub fn checksum_ok(&self) -> bool {
        !self.flags.contains(CodeFlags::PARITY_FAILED)
    }
}
