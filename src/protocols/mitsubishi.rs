//! Mitsubishi Electric AC decoder. 152 bits (19 bytes) pulse distance,
//! byte-sum checksum in the final byte.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{byte_sum, decode_bytes};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 3400;
const HEADER_SPACE: u32 = 1750;
const BIT_MARK: u32 = 450;
const ONE_SPACE: u32 = 1300;
const ZERO_SPACE: u32 = 420;
pub(crate) const BYTES: usize = 19;
const MIN_SYMBOLS: usize = 1 + BYTES * 8;

/// Extract the raw frame bytes; shared with the AC state codec.
pub(crate) fn frame_bytes(symbols: &[TimingSymbol]) -> Result<Vec<u8>, DecodeError> {
    if symbols.len() < MIN_SYMBOLS {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
    }
    if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
        return Err(DecodeError::TimingMismatch);
    }
    decode_bytes(symbols, 1, BYTES, BIT_MARK, ONE_SPACE, ZERO_SPACE)
}

pub struct MitsubishiDecoder;

impl MitsubishiDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for MitsubishiDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Mitsubishi
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;

        let mut code = DecodedCode::empty(ProtocolId::Mitsubishi);
        code.bits = (BYTES * 8) as u16;
        code.address = data[0] as u16;
        code.command = data[5] as u16;
        for (i, &b) in data.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if byte_sum(&data[..BYTES - 1]) != data[BYTES - 1] {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!(got = data[BYTES - 1], "Mitsubishi checksum mismatch");
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
