//! Sony SIRC protocol decoder.
//!
//! The odd one out: pulse *width* encoding (the mark carries the bit, the
//! space is constant), a 40 kHz carrier, and no stop bit. Three variants
//! exist — 12, 15 and 20 bits — selected purely from the total symbol
//! count. 7 command bits come first (LSB), the remaining bits are the
//! address.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::timing::{match_mark, match_space, matches};

const HEADER_MARK: u32 = 2400;
const HEADER_SPACE: u32 = 600;
const ONE_MARK: u32 = 1200;
const ZERO_MARK: u32 = 600;
const SPACE: u32 = 600;

pub struct SonyDecoder;

impl SonyDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for SonyDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Sony
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        // Variant selection from symbol count alone: header + N data bits.
        let bits: u16 = match symbols.len() {
            13 => 12,
            16 => 15,
            21 => 20,
            n if n < 13 => return Err(DecodeError::TooFewSymbols { got: n, need: 13 }),
            _ => return Err(DecodeError::TimingMismatch),
        };

        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let mut data: u64 = 0;
        for i in 0..bits as usize {
            let sym = &symbols[i + 1];
            // The space after the final bit is the inter-frame gap.
            if i + 1 < bits as usize && !match_space(sym, SPACE) {
                return Err(DecodeError::TimingMismatch);
            }
            if matches(sym.mark_us, ONE_MARK) {
                data |= 1u64 << i;
            } else if !matches(sym.mark_us, ZERO_MARK) {
                return Err(DecodeError::TimingMismatch);
            }
        }

        let mut code = DecodedCode::empty(ProtocolId::Sony);
        code.data = data;
        code.bits = bits;
        code.command = (data & 0x7F) as u16;
        code.address = (data >> 7) as u16;
        code.carrier_hz = 40_000;
        code.repeat_period_ms = 45;

        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn frame(data: u64, bits: u16) -> Vec<TimingSymbol> {
        let mut symbols = vec![TimingSymbol::new(HEADER_MARK, HEADER_SPACE)];
        for i in 0..bits {
            let one = (data >> i) & 1 == 1;
            let space = if i + 1 == bits { 25_000 } else { SPACE };
            symbols.push(TimingSymbol::new(if one { ONE_MARK } else { ZERO_MARK }, space));
        }
        symbols
    }

    #[test]
    fn decodes_12_bit_variant() {
        // Command 0x15 (power), address 0x01 (TV)
        let data = 0x15u64 | (0x01 << 7);
        let code = SonyDecoder::new().try_decode(&frame(data, 12)).unwrap();
        assert_eq!(code.bits, 12);
        assert_eq!(code.command, 0x15);
        assert_eq!(code.address, 0x01);
        assert_eq!(code.carrier_hz, 40_000);
    }

    #[test]
    fn decodes_20_bit_variant() {
        let data = 0x4Au64 | (0x1ABC << 7);
        let code = SonyDecoder::new().try_decode(&frame(data, 20)).unwrap();
        assert_eq!(code.bits, 20);
        assert_eq!(code.command, 0x4A);
        assert_eq!(code.address, 0x1ABC);
    }

    #[test]
    fn rejects_unlisted_symbol_counts() {
        // 14 symbols is no Sony variant
        let mut symbols = frame(0x15, 12);
        symbols.push(TimingSymbol::new(ZERO_MARK, SPACE));
        assert_eq!(
            SonyDecoder::new().try_decode(&symbols),
            Err(DecodeError::TimingMismatch)
        );
    }
}
