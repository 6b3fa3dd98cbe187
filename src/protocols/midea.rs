//! Midea AC decoder. 48 bits (6 bytes): 3 data bytes followed by their
//! bitwise complements. The complement half is the integrity mechanism —
//! a per-byte XOR with 0xFF rather than a trailing checksum byte.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_bytes;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 4500;
const HEADER_SPACE: u32 = 4500;
const BIT_MARK: u32 = 560;
const ONE_SPACE: u32 = 1680;
const ZERO_SPACE: u32 = 560;
pub(crate) const BYTES: usize = 6;
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

pub struct MideaDecoder;

impl MideaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for MideaDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Midea
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;

        let complements_ok = (0..3).all(|i| data[i] == !data[i + 3]);

        let mut code = DecodedCode::empty(ProtocolId::Midea);
        code.bits = (BYTES * 8) as u16;
        code.address = data[0] as u16;
        code.command = data[1] as u16;
        for (i, &b) in data.iter().enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if !complements_ok {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!("Midea complement bytes mismatch");
        }

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn frame(bytes: &[u8]) -> Vec<TimingSymbol> {
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for &b in bytes {
            for i in 0..8 {
                let one = (b >> i) & 1 == 1;
                symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
            }
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        symbols
    }

    #[test]
    fn complement_bytes_validate() {
        let payload = [0xB2u8, 0x9F, 0x48];
        let bytes = [payload[0], payload[1], payload[2], !payload[0], !payload[1], !payload[2]];
        let code = MideaDecoder::new().try_decode(&frame(&bytes)).unwrap();
        assert_eq!(code.address, 0xB2);
        assert_eq!(code.command, 0x9F);
        assert!(code.checksum_ok());
    }

    #[test]
    fn broken_complement_flags() {
        let bytes = [0xB2u8, 0x9F, 0x48, !0xB2, 0x00, !0x48];
        let code = MideaDecoder::new().try_decode(&frame(&bytes)).unwrap();
        assert!(code.flags.contains(CodeFlags::PARITY_FAILED));
    }
}
