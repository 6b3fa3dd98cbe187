//! Samsung protocol decoders.
//!
//! Samsung is an NEC-style pulse-distance protocol with a 4.5 ms / 4.5 ms
//! header. The 32-bit TV variant repeats the address byte and complements
//! the command byte; the 48-bit variant is used by Samsung AC units and
//! closes with an XOR checksum byte. The 32-bit decoder is length-gated so
//! a 48-bit frame cannot be half-read as a TV code.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{decode_word, xor_bytes};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 4500;
const HEADER_SPACE: u32 = 4500;
const BIT_MARK: u32 = 560;
const ONE_SPACE: u32 = 1690;
const ZERO_SPACE: u32 = 560;

pub struct SamsungDecoder;

impl SamsungDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for SamsungDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Samsung
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 34 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 34 });
        }
        // A longer capture with this header is Samsung48 territory.
        if symbols.len() > 36 {
            return Err(DecodeError::TimingMismatch);
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word(symbols, 1, 32, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let command = ((data >> 16) & 0xFF) as u8;
        let command_inv = ((data >> 24) & 0xFF) as u8;

        let mut code = DecodedCode::empty(ProtocolId::Samsung);
        code.data = data;
        code.bits = 32;
        code.address = (data & 0xFF) as u16;
        code.command = command as u16;
        code.repeat_period_ms = 108;
        if command ^ command_inv != 0xFF {
            code.flags.set(CodeFlags::PARITY_FAILED);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}

pub struct Samsung48Decoder;

impl Samsung48Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for Samsung48Decoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Samsung48
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 50 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 50 });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word(symbols, 1, 48, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;
        let bytes: Vec<u8> = (0..6).map(|i| ((data >> (i * 8)) & 0xFF) as u8).collect();

        // Midea shares this envelope and length; its complement-pair
        // structure is unmistakable, so defer those frames to it.
        if (0..3).all(|i| bytes[i] == !bytes[i + 3]) {
            return Err(DecodeError::TimingMismatch);
        }

        let mut code = DecodedCode::empty(ProtocolId::Samsung48);
        code.data = data;
        code.bits = 48;
        code.address = ((data >> 32) & 0xFFFF) as u16;
        code.command = (data & 0xFFFF) as u16;
        code.repeat_period_ms = 108;
        if xor_bytes(&bytes[..5]) != bytes[5] {
            code.flags.set(CodeFlags::PARITY_FAILED);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
