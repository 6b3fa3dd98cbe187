//! Carrier AC decoder (also sold as Voltas, Blue Star, Lloyd).
//! 128 bits (16 bytes); nibble-sum-mod-16 checksum in the low nibble of
//! the final byte.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{decode_bytes, nibble_sum};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 8820;
const HEADER_SPACE: u32 = 4410;
const BIT_MARK: u32 = 420;
const ONE_SPACE: u32 = 1260;
const ZERO_SPACE: u32 = 420;
pub(crate) const BYTES: usize = 16;
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

pub struct CarrierDecoder;

impl CarrierDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for CarrierDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Carrier
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;

        let mut code = DecodedCode::empty(ProtocolId::Carrier);
        code.bits = (BYTES * 8) as u16;
        code.address = data[0] as u16;
        code.command = data[1] as u16;
        for (i, &b) in data.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if nibble_sum(&data[..BYTES - 1]) != data[BYTES - 1] & 0x0F {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!("Carrier nibble checksum mismatch");
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
