//! Denon / Sharp protocol decoder.
//!
//! 15 bits pulse distance with an unusually short header (275 µs mark).
//! 5 address bits, 8 command bits, 2 frame-type bits on top. Sharp is the
//! same protocol under a different name; one decoder serves both ids.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 275;
const HEADER_SPACE: u32 = 775;
const BIT_MARK: u32 = 275;
const ONE_SPACE: u32 = 1900;
const ZERO_SPACE: u32 = 775;
const BITS: u16 = 15;

pub struct DenonDecoder {
    protocol: ProtocolId,
}

impl DenonDecoder {
    pub fn new() -> Self {
        Self { protocol: ProtocolId::Denon }
    }

    /// The same decoder reporting the Sharp identity.
    pub fn sharp() -> Self {
        Self { protocol: ProtocolId::Sharp }
    }
}

impl ProtocolDecoder for DenonDecoder {
    fn protocol(&self) -> ProtocolId {
        self.protocol
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 16 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 16 });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word(symbols, 1, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let mut code = DecodedCode::empty(self.protocol);
        code.data = data;
        code.bits = BITS;
        code.address = (data & 0x1F) as u16;
        code.command = ((data >> 5) & 0xFF) as u16;
        code.repeat_period_ms = 45;

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: u16) -> Vec<TimingSymbol> {
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in 0..15 {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        symbols
    }

    #[test]
    fn decodes_address_and_command() {
        let data = 0x0Cu16 | (0x57 << 5);
        let code = DenonDecoder::new().try_decode(&frame(data)).unwrap();
        assert_eq!(code.address, 0x0C);
        assert_eq!(code.command, 0x57);
        assert_eq!(code.bits, 15);
    }

    #[test]
    fn sharp_identity() {
        let code = DenonDecoder::sharp().try_decode(&frame(0x01)).unwrap();
        assert_eq!(code.protocol, ProtocolId::Sharp);
    }
}
