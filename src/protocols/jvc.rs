//! JVC protocol decoder.
//!
//! 16 bits pulse distance, LSB first. The unusual part: repeat frames have
//! no header at all, so both headered and headerless frames must decode.
//! The headerless path has to explicitly reject anything wearing the NEC
//! header envelope, otherwise a lone NEC leading symbol in a short capture
//! reads as JVC data.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word;
use crate::protocols::nec;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 8400;
const HEADER_SPACE: u32 = 4200;
const BIT_MARK: u32 = 525;
const ONE_SPACE: u32 = 1575;
const ZERO_SPACE: u32 = 525;
const BITS: u16 = 16;

pub struct JvcDecoder;

impl JvcDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for JvcDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Jvc
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 16 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 16 });
        }

        let has_header = symbols.len() >= 17
            && match_mark(&symbols[0], HEADER_MARK)
            && match_space(&symbols[0], HEADER_SPACE);

        // Length gate: header + 16 bits + stop, or a bare 16-bit repeat.
        let expected = if has_header { 17..=18 } else { 16..=17 };
        if !expected.contains(&symbols.len()) {
            return Err(DecodeError::TimingMismatch);
        }

        if !has_header
            && match_mark(&symbols[0], nec::HEADER_MARK)
            && match_space(&symbols[0], nec::HEADER_SPACE)
        {
            tracing::debug!("headerless JVC path declining NEC-shaped leading symbol");
            return Err(DecodeError::TimingMismatch);
        }

        let start = usize::from(has_header);
        let data = decode_word(symbols, start, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let mut code = DecodedCode::empty(ProtocolId::Jvc);
        code.data = data;
        code.bits = BITS;
        code.address = (data & 0xFF) as u16;
        code.command = ((data >> 8) & 0xFF) as u16;
        code.repeat_period_ms = 60;
        if !has_header {
            code.flags.set(CodeFlags::REPEAT);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
