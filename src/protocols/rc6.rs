//! Philips RC6 protocol decoder and encoder (mode 0).
//!
//! Bi-phase like RC5 but with inverted bit polarity ("1" is
//! mark-then-space), a discrete leader (2666 µs mark + 889 µs space), and
//! a trailer/toggle bit transmitted at exactly double unit length. The
//! toggle bit gets its own duration check via the half-unit quantizer —
//! an ordinary-length toggle is a decode failure, not a tolerance issue.
//!
//! Frame: leader, start bit (1), 3 mode bits, toggle (double width),
//! 8 address bits, 8 command bits. 21 bit cells, MSB first.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{merge_half_units, quantize_half_units};
use crate::timing::{match_mark, match_space};

pub(crate) const UNIT: u32 = 444;
const HEADER_MARK: u32 = 2666;
const HEADER_SPACE: u32 = 889;
const MIN_SYMBOLS: usize = 12;
const FRAME_GAP: u32 = 30_000;
// RC6 runs can span a 2-unit toggle half plus a 1-unit neighbour.
const MAX_RUN_UNITS: u32 = 3;
// RC6 receivers need more headroom than the 25% default.
const TOLERANCE_PCT: u32 = 30;

/// Half-bit width in units for each of the 21 bit cells: the toggle
/// (cell 4) is double length.
const HALF_WIDTHS: [usize; 21] = [1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
const TOTAL_UNITS: usize = 44; // sum of 2 * half widths

pub struct Rc6Decoder;

impl Rc6Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for Rc6Decoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Rc6
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < MIN_SYMBOLS {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let mut levels = quantize_half_units(symbols, 1, UNIT, TOLERANCE_PCT, MAX_RUN_UNITS)?;
        if levels.len() > TOTAL_UNITS + 2 {
            return Err(DecodeError::TimingMismatch);
        }
        levels.resize(TOTAL_UNITS, false);

        let mut bits = [false; 21];
        let mut cursor = 0usize;
        for (cell, &half) in HALF_WIDTHS.iter().enumerate() {
            let first = &levels[cursor..cursor + half];
            let second = &levels[cursor + half..cursor + 2 * half];
            let value = first[0];
            // Both halves must be uniform and opposite; this is where a
            // single-width toggle bit fails.
            if first.iter().any(|&l| l != value) || second.iter().any(|&l| l == value) {
                return Err(DecodeError::TimingMismatch);
            }
            bits[cell] = value;
            cursor += 2 * half;
        }

        if !bits[0] {
            tracing::debug!("RC6 start bit is zero");
            return Err(DecodeError::TimingMismatch);
        }

        let mode = (bits[1] as u8) << 2 | (bits[2] as u8) << 1 | bits[3] as u8;
        let toggle = bits[4];
        let mut address: u16 = 0;
        for &b in &bits[5..13] {
            address = (address << 1) | b as u16;
        }
        let mut command: u16 = 0;
        for &b in &bits[13..21] {
            command = (command << 1) | b as u16;
        }

        let mut code = DecodedCode::empty(ProtocolId::Rc6);
        code.data = ((mode as u64) << 17)
            | ((toggle as u64) << 16)
            | ((address as u64) << 8)
            | command as u64;
        code.bits = 21;
        code.address = address;
        code.command = command;
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

/// Encode an RC6 mode-0 frame.
pub(crate) fn encode_fields(mode: u8, toggle: bool, address: u8, command: u8) -> Vec<TimingSymbol> {
    let mut bits = [false; 21];
    bits[0] = true;
    bits[1] = mode & 0x4 != 0;
    bits[2] = mode & 0x2 != 0;
    bits[3] = mode & 0x1 != 0;
    bits[4] = toggle;
    for i in 0..8 {
        bits[5 + i] = address & (0x80 >> i) != 0;
        bits[13 + i] = command & (0x80 >> i) != 0;
    }

    let mut levels = Vec::with_capacity(8 + TOTAL_UNITS);
    // Leader: 6-unit mark, 2-unit space.
    levels.extend(std::iter::repeat(true).take(6));
    levels.extend(std::iter::repeat(false).take(2));
    for (cell, &half) in HALF_WIDTHS.iter().enumerate() {
        // "1" is mark first in RC6.
        for _ in 0..half {
            levels.push(bits[cell]);
        }
        for _ in 0..half {
            levels.push(!bits[cell]);
        }
    }
    merge_half_units(&levels, UNIT, FRAME_GAP)
}

/// Encode from a packed data word (mode<<17 | toggle<<16 | addr<<8 | cmd).
pub(crate) fn encode_word(data: u64) -> Vec<TimingSymbol> {
    encode_fields(
        ((data >> 17) & 0x7) as u8,
        (data >> 16) & 1 == 1,
        ((data >> 8) & 0xFF) as u8,
        (data & 0xFF) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_wire_format() {
        for (toggle, addr, cmd) in [(false, 0x04, 0x22), (true, 0xFF, 0x00), (true, 0x00, 0xFF)] {
            let symbols = encode_fields(0, toggle, addr, cmd);
            let code = Rc6Decoder::new().try_decode(&symbols).unwrap();
            assert_eq!(code.address, addr as u16);
            assert_eq!(code.command, cmd as u16);
            assert_eq!(code.flags.contains(CodeFlags::TOGGLE), toggle);
            assert_eq!(code.bits, 21);
        }
    }

    #[test]
    fn toggle_bit_is_double_length() {
        let symbols = encode_fields(0, true, 0x04, 0x22);
        // The capture must contain an 888 µs half somewhere after the
        // leader; squeezing the toggle to single width must break decode.
        let squeezed: Vec<TimingSymbol> = {
            let mut bits = [false; 21];
            bits[0] = true;
            bits[4] = true;
            bits[5 + 5] = true; // address 0x04
            bits[13 + 2] = true; // command 0x22
            bits[13 + 6] = true;
            let mut levels = Vec::new();
            levels.extend(std::iter::repeat(true).take(6));
            levels.extend(std::iter::repeat(false).take(2));
            for (cell, _) in HALF_WIDTHS.iter().enumerate() {
                // every cell single width, toggle included
                levels.push(bits[cell]);
                levels.push(!bits[cell]);
            }
            merge_half_units(&levels, UNIT, FRAME_GAP)
        };
        assert!(Rc6Decoder::new().try_decode(&symbols).is_ok());
        assert!(Rc6Decoder::new().try_decode(&squeezed).is_err());
    }

    #[test]
    fn nonzero_mode_survives_the_data_word() {
        let symbols = encode_fields(6, false, 0x12, 0x34);
        let code = Rc6Decoder::new().try_decode(&symbols).unwrap();
        assert_eq!((code.data >> 17) & 0x7, 6);
    }
}
