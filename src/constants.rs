//! Protocol timing constants registry.
//!
//! One read-only record per protocol: carrier, header, bit timings, bit
//! order, encoding class, stop bit, nominal repeat period, and fixed bit
//! count (0 = variable length). Built once behind a `OnceLock` and looked
//! up by [`ProtocolId`].
//!
//! Timing values are in microseconds. For pulse-distance protocols
//! `bit_mark_us` is constant and `one_space_us != zero_space_us`; for
//! pulse-width protocols the mark carries the bit and `zero_space_us`
//! holds the constant space; bi-phase protocols store the half-bit unit in
//! `bit_mark_us`.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::code::ProtocolId;

/// Encoding class: how a bit value is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Bit value in the space duration; mark is constant.
    PulseDistance,
    /// Bit value in the mark duration; space is constant.
    PulseWidth,
    /// Bit value in the transition direction within one bit window.
    BiPhase,
}

/// Timing and framing constants for one protocol.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolConstants {
    pub protocol: ProtocolId,
    /// Carrier frequency in kHz (38, 40, 36, 455, ...).
    pub carrier_khz: u32,
    /// Header mark duration; 0 = no discrete header.
    pub header_mark_us: u32,
    /// Header space duration.
    pub header_space_us: u32,
    /// Bit mark (pulse distance) or "0" mark (pulse width) or half-bit
    /// unit (bi-phase).
    pub bit_mark_us: u32,
    /// Space for a "1" bit (pulse distance) or mark for a "1" (pulse width).
    pub one_space_us: u32,
    /// Space for a "0" bit (pulse distance) or the constant space (pulse width).
    pub zero_space_us: u32,
    /// True when data is transmitted MSB first.
    pub msb_first: bool,
    /// Encoding class.
    pub encoding: Encoding,
    /// True when a trailing stop mark terminates the frame.
    pub stop_bit: bool,
    /// Nominal time between repeat frames, in ms (0 = no auto repeat).
    pub repeat_period_ms: u16,
    /// Fixed bit count; 0 for variable-length protocols.
    pub bits: u16,
}

impl ProtocolConstants {
    pub fn carrier_hz(&self) -> u32 {
        self.carrier_khz * 1000
    }
}

macro_rules! proto {
    ($protocol:expr, $carrier:expr, $hm:expr, $hs:expr, $bm:expr, $one:expr, $zero:expr,
     $msb:expr, $enc:expr, $stop:expr, $repeat:expr, $bits:expr) => {
        ProtocolConstants {
            protocol: $protocol,
            carrier_khz: $carrier,
            header_mark_us: $hm,
            header_space_us: $hs,
            bit_mark_us: $bm,
            one_space_us: $one,
            zero_space_us: $zero,
            msb_first: $msb,
            encoding: $enc,
            stop_bit: $stop,
            repeat_period_ms: $repeat,
            bits: $bits,
        }
    };
}

fn build_registry() -> HashMap<ProtocolId, ProtocolConstants> {
    use Encoding::{BiPhase, PulseDistance, PulseWidth};
    use ProtocolId::*;

    let table = [
        // Consumer protocols
        proto!(Nec, 38, 9000, 4500, 560, 1690, 560, false, PulseDistance, true, 110, 32),
        proto!(Samsung, 38, 4500, 4500, 560, 1690, 560, false, PulseDistance, true, 108, 32),
        proto!(Sony, 40, 2400, 600, 600, 1200, 600, false, PulseWidth, false, 45, 0),
        proto!(Jvc, 38, 8400, 4200, 525, 1575, 525, false, PulseDistance, true, 60, 16),
        proto!(Lg, 38, 9000, 4500, 560, 1690, 560, false, PulseDistance, true, 110, 28),
        proto!(Rc5, 36, 0, 0, 889, 889, 889, true, BiPhase, false, 114, 14),
        proto!(Rc6, 36, 2666, 889, 444, 444, 444, true, BiPhase, false, 114, 21),
        proto!(Denon, 38, 275, 775, 275, 1900, 775, false, PulseDistance, true, 45, 15),
        proto!(Sharp, 38, 275, 775, 275, 1900, 775, false, PulseDistance, true, 45, 15),
        proto!(Panasonic, 37, 3456, 1728, 432, 1296, 432, false, PulseDistance, true, 130, 48),
        proto!(Kaseikyo, 37, 3456, 1728, 432, 1296, 432, false, PulseDistance, true, 130, 48),
        // Brand variants
        proto!(Apple, 38, 9000, 4500, 560, 1690, 560, false, PulseDistance, true, 110, 32),
        proto!(Onkyo, 38, 9000, 4500, 560, 1690, 560, false, PulseDistance, true, 110, 32),
        proto!(Samsung48, 38, 4500, 4500, 560, 1690, 560, false, PulseDistance, true, 108, 48),
        proto!(SamsungLg, 38, 4500, 4500, 560, 1690, 560, false, PulseDistance, true, 108, 32),
        proto!(Lg2, 38, 3200, 9900, 560, 1690, 560, false, PulseDistance, true, 110, 28),
        // Air conditioner protocols (variable length where bits = 0)
        proto!(Mitsubishi, 38, 3400, 1750, 450, 1300, 420, false, PulseDistance, true, 0, 152),
        proto!(Daikin, 38, 3650, 1623, 428, 1280, 428, false, PulseDistance, true, 0, 216),
        proto!(Fujitsu, 38, 3300, 1650, 420, 1280, 420, false, PulseDistance, true, 0, 0),
        proto!(Haier, 38, 3000, 3000, 520, 1650, 650, false, PulseDistance, true, 0, 104),
        proto!(Midea, 38, 4500, 4500, 560, 1680, 560, false, PulseDistance, true, 0, 48),
        proto!(Carrier, 38, 8820, 4410, 420, 1260, 420, false, PulseDistance, true, 0, 128),
        proto!(Hitachi, 38, 3300, 1700, 370, 1260, 370, false, PulseDistance, true, 0, 0),
        // Exotic / legacy
        proto!(Whynter, 38, 2850, 2850, 750, 2150, 750, true, PulseDistance, true, 100, 32),
        proto!(LegoPf, 38, 158, 1026, 158, 553, 263, true, PulseDistance, true, 0, 16),
        proto!(MagiQuest, 38, 0, 0, 288, 864, 576, true, PulseDistance, false, 0, 56),
        proto!(BoseWave, 38, 1014, 1468, 428, 896, 1492, true, PulseDistance, true, 50, 16),
        proto!(BangOlufsen, 455, 3125, 3125, 625, 1250, 625, true, PulseWidth, true, 100, 16),
        proto!(Fast, 38, 0, 0, 320, 640, 320, false, PulseDistance, true, 0, 8),
    ];

    table.into_iter().map(|c| (c.protocol, c)).collect()
}

/// Look up the timing constants for a protocol. Returns `None` for
/// synthetic identifiers (`Unknown`, `PulseDistance`, `PulseWidth`, `Raw`)
/// which carry no fixed timings.
pub fn constants(protocol: ProtocolId) -> Option<&'static ProtocolConstants> {
    static REGISTRY: OnceLock<HashMap<ProtocolId, ProtocolConstants>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry).get(&protocol)
}
