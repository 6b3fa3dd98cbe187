//! LG protocol decoders.
//!
//! 28 bits pulse distance: 8-bit address, 16-bit command, and a 4-bit
//! checksum that is the sum of the six address/command nibbles modulo 16.
//! The TV variant (LG) rides the NEC header; the AC variant (LG2) uses a
//! short 3.2 ms mark with a long 9.9 ms space. Frame layout and checksum
//! are identical between the two.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{decode_word, nibble_sum};
use crate::timing::{match_mark, match_space};

const BIT_MARK: u32 = 560;
const ONE_SPACE: u32 = 1690;
const ZERO_SPACE: u32 = 560;
const BITS: u16 = 28;
// header + 28 bits + stop
const MIN_SYMBOLS: usize = 30;

/// Checksum over the low 24 bits of an LG word: sum of six nibbles mod 16.
pub(crate) fn lg_checksum(word: u32) -> u8 {
    let bytes = [(word & 0xFF) as u8, ((word >> 8) & 0xFF) as u8, ((word >> 16) & 0xFF) as u8];
    nibble_sum(&bytes)
}

fn decode_lg_word(
    symbols: &[TimingSymbol],
    protocol: ProtocolId,
    header_mark: u32,
    header_space: u32,
) -> Result<DecodedCode, DecodeError> {
    if symbols.len() < MIN_SYMBOLS {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
    }
    if symbols.len() > MIN_SYMBOLS + 2 {
        return Err(DecodeError::TimingMismatch);
    }
    if !match_mark(&symbols[0], header_mark) || !match_space(&symbols[0], header_space) {
        return Err(DecodeError::TimingMismatch);
    }

    let data = decode_word(symbols, 1, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)? as u32;

    let mut code = DecodedCode::empty(protocol);
    code.data = data as u64;
    code.bits = BITS;
    code.address = (data & 0xFF) as u16;
    code.command = ((data >> 8) & 0xFFFF) as u16;
    code.repeat_period_ms = 110;

    let received = ((data >> 24) & 0x0F) as u8;
    if received != lg_checksum(data) {
        code.flags.set(CodeFlags::PARITY_FAILED);
        tracing::warn!(
            got = received,
            want = lg_checksum(data),
            "LG nibble checksum mismatch"
        );
    }

    tracing_decoded(&code);
    Ok(code)
}

pub struct LgDecoder;

impl LgDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for LgDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Lg
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        decode_lg_word(symbols, ProtocolId::Lg, 9000, 4500)
    }
}

pub struct Lg2Decoder;

impl Lg2Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for Lg2Decoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Lg2
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        decode_lg_word(symbols, ProtocolId::Lg2, 3200, 9900)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn word(address: u8, command: u16) -> u32 {
        let body = (address as u32) | ((command as u32) << 8);
        body | ((lg_checksum(body) as u32) << 24)
    }

    fn frame(data: u32, header_mark: u32, header_space: u32) -> Vec<TimingSymbol> {
        let mut symbols = vec![TimingSymbol::new(header_mark, header_space)];
        for i in 0..28 {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(BIT_MARK, if one { ONE_SPACE } else { ZERO_SPACE }));
        }
        symbols.push(TimingSymbol::new(BIT_MARK, 0x7FFF));
        symbols
    }

    #[test]
    fn decodes_with_valid_checksum() {
        let data = word(0x88, 0x1234);
        let code = LgDecoder::new().try_decode(&frame(data, 9000, 4500)).unwrap();
        assert_eq!(code.address, 0x88);
        assert_eq!(code.command, 0x1234);
        assert!(code.checksum_ok());
    }

    #[test]
    fn flags_bad_checksum() {
        let data = word(0x88, 0x1234) ^ (0x3 << 24);
        let code = LgDecoder::new().try_decode(&frame(data, 9000, 4500)).unwrap();
        assert!(code.flags.contains(CodeFlags::PARITY_FAILED));
    }

    #[test]
    fn lg2_uses_its_own_header() {
        let data = word(0x88, 0x0F10);
        let code = Lg2Decoder::new().try_decode(&frame(data, 3200, 9900)).unwrap();
        assert_eq!(code.protocol, ProtocolId::Lg2);
        assert!(code.checksum_ok());
        assert_eq!(
            Lg2Decoder::new().try_decode(&frame(data, 9000, 4500)),
            Err(DecodeError::TimingMismatch)
        );
    }
}
