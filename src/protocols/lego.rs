//! Lego Power Functions decoder. 16 bits MSB first, tiny 158 µs marks.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word_lenient;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 158;
const HEADER_SPACE: u32 = 1026;
const BIT_MARK: u32 = 158;
const ONE_SPACE: u32 = 553;
const BITS: u16 = 16;

pub struct LegoDecoder;

impl LegoDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for LegoDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::LegoPf
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 17 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 17 });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word_lenient(symbols, 1, BITS, BIT_MARK, ONE_SPACE, true)?;

        let mut code = DecodedCode::empty(ProtocolId::LegoPf);
        code.data = data;
        code.bits = BITS;
        code.flags.set(CodeFlags::MSB_FIRST);

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_frame() {
        let data: u16 = 0x4A17;
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in (0..16).rev() {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { 263 }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        let code = LegoDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(code.data, data as u64);
        assert_eq!(code.bits, 16);
    }
}
