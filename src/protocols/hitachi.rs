//! Hitachi AC decoder. Variable length: 33-byte common frames and 43-byte
//! extended frames, byte count clamped to that range from the capture.
//! Byte-sum checksum in the final byte.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{byte_sum, decode_bytes};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 3300;
const HEADER_SPACE: u32 = 1700;
const BIT_MARK: u32 = 370;
const ONE_SPACE: u32 = 1260;
const ZERO_SPACE: u32 = 370;
pub(crate) const MIN_BYTES: usize = 33;
pub(crate) const MAX_BYTES: usize = 43;
const MIN_SYMBOLS: usize = 1 + MIN_BYTES * 8;

pub(crate) fn frame_bytes(symbols: &[TimingSymbol]) -> Result<Vec<u8>, DecodeError> {
    if symbols.len() < MIN_SYMBOLS {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
    }
    if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
        return Err(DecodeError::TimingMismatch);
    }
    let num_bytes = ((symbols.len() - 1) / 8).min(MAX_BYTES);
    decode_bytes(symbols, 1, num_bytes, BIT_MARK, ONE_SPACE, ZERO_SPACE)
}

pub struct HitachiDecoder;

impl HitachiDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for HitachiDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Hitachi
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;
        let n = data.len();

        let mut code = DecodedCode::empty(ProtocolId::Hitachi);
        code.bits = (n * 8) as u16;
        code.address = data[0] as u16;
        code.command = data[11] as u16;
        for (i, &b) in data.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if byte_sum(&data[..n - 1]) != data[n - 1] {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!(bytes = n, "Hitachi checksum mismatch");
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
