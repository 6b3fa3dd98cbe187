//! Fujitsu General AC decoder.
//!
//! Variable-length frames: short 8-byte status commands and full 16-byte
//! state frames share one envelope. The byte count comes from the symbol
//! count, clamped to [8, 16]; anything shorter is rejected and longer
//! captures are truncated. Checksum is the two's complement of the byte
//! sum — not interchangeable with the plain byte-sum protocols.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{decode_bytes, twos_complement_sum};
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 3300;
const HEADER_SPACE: u32 = 1650;
const BIT_MARK: u32 = 420;
const ONE_SPACE: u32 = 1280;
const ZERO_SPACE: u32 = 420;
pub(crate) const MIN_BYTES: usize = 8;
pub(crate) const MAX_BYTES: usize = 16;
const MIN_SYMBOLS: usize = 1 + MIN_BYTES * 8;

/// Extract the raw frame bytes; length derived from the capture.
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

pub struct FujitsuDecoder;

impl FujitsuDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for FujitsuDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Fujitsu
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let data = frame_bytes(symbols)?;
        let n = data.len();

        let mut code = DecodedCode::empty(ProtocolId::Fujitsu);
        code.bits = (n * 8) as u16;
        code.address = 0x14; // Fujitsu manufacturer marker
        code.command = data[5] as u16;
        for (i, &b) in data.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if twos_complement_sum(&data[..n - 1]) != data[n - 1] {
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!(bytes = n, "Fujitsu checksum mismatch");
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
    fn byte_count_follows_symbol_count() {
        let mut short = vec![0x14, 0x63, 0x00, 0x10, 0x10, 0x02, 0x00];
        short.push(twos_complement_sum(&short));
        let code = FujitsuDecoder::new().try_decode(&frame(&short)).unwrap();
        assert_eq!(code.bits, 64);
        assert!(code.checksum_ok());

        let mut full = vec![0x14, 0x63, 0x00, 0x10, 0x10, 0xFE, 0x09, 0x30,
                            0x81, 0x01, 0x00, 0x00, 0x00, 0x00, 0x20];
        full.push(twos_complement_sum(&full));
        let code = FujitsuDecoder::new().try_decode(&frame(&full)).unwrap();
        assert_eq!(code.bits, 128);
        assert!(code.checksum_ok());
    }

    #[test]
    fn rejects_frames_below_minimum() {
        let bytes = [0x14, 0x63, 0x00];
        assert!(matches!(
            FujitsuDecoder::new().try_decode(&frame(&bytes)),
            Err(DecodeError::TooFewSymbols { .. })
        ));
    }

    #[test]
    fn plain_byte_sum_does_not_validate() {
        // The two's-complement checksum is its own algorithm; a frame
        // closed with a plain byte sum must flag.
        let mut bytes = vec![0x14, 0x63, 0x00, 0x10, 0x10, 0x02, 0x00];
        bytes.push(crate::protocols::common::byte_sum(&bytes));
        let code = FujitsuDecoder::new().try_decode(&frame(&bytes)).unwrap();
        assert!(code.flags.contains(CodeFlags::PARITY_FAILED));
    }
}
