//! Whynter portable AC decoder. 32 bits MSB first, symmetric 2850 µs header.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word_lenient;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 2850;
const HEADER_SPACE: u32 = 2850;
const BIT_MARK: u32 = 750;
const ONE_SPACE: u32 = 2150;
const BITS: u16 = 32;

pub struct WhynterDecoder;

impl WhynterDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for WhynterDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Whynter
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 33 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 33 });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word_lenient(symbols, 1, BITS, BIT_MARK, ONE_SPACE, true)?;

        let mut code = DecodedCode::empty(ProtocolId::Whynter);
        code.data = data;
        code.bits = BITS;
        code.repeat_period_ms = 100;
        code.flags.set(CodeFlags::MSB_FIRST);

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_msb_first() {
        let data: u32 = 0x12C0_FFEE;
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in (0..32).rev() {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { 750 }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        let code = WhynterDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(code.data, data as u64);
        assert!(code.flags.contains(CodeFlags::MSB_FIRST));
    }
}
