//! Philips RC5 protocol decoder and encoder.
//!
//! Bi-phase (Manchester): a bit is the direction of the mark/space
//! transition inside its 1778 µs window, not a duration magnitude. A "1"
//! is space-then-mark, a "0" is mark-then-space; adjacent equal half-bits
//! merge on the wire, so the capture is first flattened into 889 µs
//! half-units and bits are read off the second half of each window. There
//! is no discrete header — the first start bit's leading idle half is
//! simply never captured.
//!
//! Frame: 2 start bits, toggle, 5 address bits, 6 command bits, MSB first.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{merge_half_units, quantize_half_units};

pub(crate) const UNIT: u32 = 889;
const BITS: usize = 14;
// 14 bits = 28 half-units, minus the uncaptured leading space.
const HALF_UNITS: usize = 2 * BITS - 1;
const MIN_SYMBOLS: usize = 7;
const FRAME_GAP: u32 = 30_000;

pub struct Rc5Decoder;

impl Rc5Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for Rc5Decoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Rc5
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < MIN_SYMBOLS {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
        }

        let mut levels = quantize_half_units(symbols, 0, UNIT, 25, 2)?;
        if levels.len() > HALF_UNITS + 1 {
            return Err(DecodeError::TimingMismatch);
        }
        // Trailing space half-bits merge into the idle gap.
        levels.resize(HALF_UNITS, false);

        // levels[0] is the second half of bit 0; bit k reads at 2k.
        let mut value: u16 = 0;
        for k in 0..BITS {
            let bit = levels[2 * k];
            if k > 0 && levels[2 * k - 1] == bit {
                // No mid-window transition: not Manchester data.
                return Err(DecodeError::TimingMismatch);
            }
            value = (value << 1) | bit as u16;
        }

        // First start bit is implicitly 1 (the capture begins on its mark).
        let toggle = (value >> 11) & 1 == 1;

        let mut code = DecodedCode::empty(ProtocolId::Rc5);
        code.data = value as u64;
        code.bits = BITS as u16;
        code.address = ((value >> 6) & 0x1F) as u16;
        code.command = (value & 0x3F) as u16;
        code.carrier_hz = 36_000;
        code.repeat_period_ms = 114;
        code.flags.set(CodeFlags::MSB_FIRST);
        if toggle {
            code.flags.set(CodeFlags::TOGGLE);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}

/// Encode a 14-bit RC5 word into timing symbols.
pub(crate) fn encode_word(value: u16) -> Vec<TimingSymbol> {
    let mut levels = Vec::with_capacity(2 * BITS);
    for k in 0..BITS {
        let bit = (value >> (BITS - 1 - k)) & 1 == 1;
        // "1": space then mark; "0": mark then space.
        levels.push(!bit);
        levels.push(bit);
    }
    // The leading idle half of the first start bit never reaches the wire.
    merge_half_units(&levels[1..], UNIT, FRAME_GAP)
}

/// Build the canonical 14-bit word from its fields.
#[cfg(test)]
pub(crate) fn pack(toggle: bool, address: u8, command: u8) -> u16 {
    0b11 << 12
        | (toggle as u16) << 11
        | ((address & 0x1F) as u16) << 6
        | (command & 0x3F) as u16
}
