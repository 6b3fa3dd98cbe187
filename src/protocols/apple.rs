//! Apple remote decoder (NEC envelope, fixed vendor address).
//!
//! Apple remotes transmit an NEC frame whose low 16 bits are always the
//! vendor id 0x77E1 instead of an address/complement pair. The command
//! lives in bits 16..24; byte 3 carries the remote id and a parity bit,
//! which we do not validate (it varies per paired remote).

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 9000;
const HEADER_SPACE: u32 = 4500;
const BIT_MARK: u32 = 560;
const ONE_SPACE: u32 = 1690;
const ZERO_SPACE: u32 = 560;
const BITS: u16 = 32;
const MIN_SYMBOLS: usize = 33;

const VENDOR_ID: u16 = 0x77E1;

pub struct AppleDecoder;

impl AppleDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for AppleDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Apple
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < MIN_SYMBOLS {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word(symbols, 1, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let address = (data & 0xFFFF) as u16;
        if address != VENDOR_ID {
            return Err(DecodeError::TimingMismatch);
        }

        let mut code = DecodedCode::empty(ProtocolId::Apple);
        code.data = data;
        code.bits = BITS;
        code.address = address;
        code.command = ((data >> 16) & 0xFF) as u16;
        code.repeat_period_ms = 110;

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_apple_frame() {
        let data = (VENDOR_ID as u64) | (0x05u64 << 16) | (0x87u64 << 24);
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in 0..32 {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));

        let code = AppleDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(code.protocol, ProtocolId::Apple);
        assert_eq!(code.address, VENDOR_ID);
        assert_eq!(code.command, 0x05);
    }

    #[test]
    fn rejects_non_apple_address() {
        let data = 0x00FFu64 | (0x05u64 << 16) | (0xFAu64 << 24);
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in 0..32 {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        assert_eq!(
            AppleDecoder::new().try_decode(&symbols),
            Err(DecodeError::TimingMismatch)
        );
    }
}
