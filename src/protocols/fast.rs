//! FAST protocol decoder. 8 bits, headerless, 320 µs marks.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word;

const BIT_MARK: u32 = 320;
const ONE_SPACE: u32 = 640;
const ZERO_SPACE: u32 = 320;
const BITS: u16 = 8;

pub struct FastDecoder;

impl FastDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for FastDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Fast
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < BITS as usize {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: BITS as usize });
        }

        let data = decode_word(symbols, 0, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let mut code = DecodedCode::empty(ProtocolId::Fast);
        code.data = data;
        code.bits = BITS;
        code.command = data as u16;

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_byte() {
        let mut symbols = Vec::new();
        for i in 0..8 {
            let one = (0x5Au8 >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        let code = FastDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(code.data, 0x5A);
    }
}
