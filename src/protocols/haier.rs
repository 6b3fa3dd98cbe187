//! Haier AC decoder. 104 bits (13 bytes), XOR checksum in the final byte.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{decode_bytes, xor_bytes};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 3000;
const HEADER_SPACE: u32 = 3000;
const BIT_MARK: u32 = 520;
const ONE_SPACE: u32 = 1650;
const ZERO_SPACE: u32 = 650;
pub(crate) const BYTES: usize = 13;
const MIN_SYMBOLS: usize = 1 + BYTES * 8;

pub(crate) fn frame_bytes(symbols: &[TimingSymbol]) -> Result<Vec<u8>, DecodeError> {
    if symbols.len() < MIN_SYMBOLS {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
    }
    if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
        return Err(DecodeError::TimingMismatch);
    }
    decode_bytes(symbols, 1, BYTES, BIT_MARK, ONE_SPACE, ZERO_SPACE)
}

pub struct HaierDecoder;

impl HaierDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for HaierDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Haier
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;

        let mut code = DecodedCode::empty(ProtocolId::Haier);
        code.bits = (BYTES * 8) as u16;
        code.address = data[0] as u16;
        code.command = data[9] as u16;
        for (i, &b) in data.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if xor_bytes(&data[..BYTES - 1]) != data[BYTES - 1] {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!("Haier XOR checksum mismatch");
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
