//! MagiQuest wand decoder. 56 bits MSB first, no header at all.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word_lenient;

const BIT_MARK: u32 = 288;
const ONE_SPACE: u32 = 864;
const BITS: u16 = 56;

pub struct MagiQuestDecoder;

impl MagiQuestDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for MagiQuestDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::MagiQuest
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < BITS as usize {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: BITS as usize });
        }

        let data = decode_word_lenient(symbols, 0, BITS, BIT_MARK, ONE_SPACE, true)?;

        let mut code = DecodedCode::empty(ProtocolId::MagiQuest);
        code.data = data;
        code.bits = BITS;
        code.flags.set(CodeFlags::MSB_FIRST);

        tracing_decoded(&code);
        Ok(code)
    }
}
