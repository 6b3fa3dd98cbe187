//! Bose Wave radio decoder. 16 bits MSB first.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word_lenient;
use crate::timing::{match_mark, match_space};

const HEADER_MARK: u32 = 1014;
const HEADER_SPACE: u32 = 1468;
const BIT_MARK: u32 = 428;
const ONE_SPACE: u32 = 896;
const BITS: u16 = 16;

pub struct BoseWaveDecoder;

impl BoseWaveDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for BoseWaveDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::BoseWave
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < 17 {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: 17 });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word_lenient(symbols, 1, BITS, BIT_MARK, ONE_SPACE, true)?;

        let mut code = DecodedCode::empty(ProtocolId::BoseWave);
        code.data = data;
        code.bits = BITS;
        // Low byte is the command, high byte its complement.
        code.command = ((data >> 8) & 0xFF) as u16;
        code.repeat_period_ms = 50;
        code.flags.set(CodeFlags::MSB_FIRST);
        if (data & 0xFF) as u8 ^ ((data >> 8) & 0xFF) as u8 != 0xFF {
            code.flags.set(CodeFlags::PARITY_FAILED);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
