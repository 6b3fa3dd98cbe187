//! NEC protocol decoder.
//!
//! The most common consumer protocol (TV and AC remotes). 32 bits LSB
//! first: address, ~address, command, ~command. Two quirks handled here:
//!
//! - If the address byte fails its complement check but the command byte
//!   passes, the frame is NEC Extended: a 16-bit address with no
//!   complement check (Onkyo and many set-top boxes use this).
//! - A held button transmits an abbreviated repeat frame (9000 µs mark +
//!   2250 µs space) instead of the full code. The repeat frame carries no
//!   data; it is resolved against the previously decoded NEC code by the
//!   pipeline, which owns that state. A stateless decode of a repeat
//!   frame reports `NotSupported`.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::decode_word;
use crate::timing::{match_mark, match_space};

pub(crate) const HEADER_MARK: u32 = 9000;
pub(crate) const HEADER_SPACE: u32 = 4500;
pub(crate) const REPEAT_SPACE: u32 = 2250;
const BIT_MARK: u32 = 560;
const ONE_SPACE: u32 = 1690;
const ZERO_SPACE: u32 = 560;
const BITS: u16 = 32;
// header + 32 bits + stop
const MIN_SYMBOLS: usize = 34;

/// Apple remotes reuse the NEC envelope with this vendor id in the low 16
/// bits; NEC declines them so the Apple decoder can claim the frame.
const APPLE_VENDOR_ID: u16 = 0x77E1;

/// True when the capture is an NEC repeat frame (shortened header, no
/// data bits). The pipeline uses this to resolve held-button repeats.
pub fn is_repeat_frame(symbols: &[TimingSymbol]) -> bool {
    symbols.len() <= 4
        && !symbols.is_empty()
        && match_mark(&symbols[0], HEADER_MARK)
        && match_space(&symbols[0], REPEAT_SPACE)
}

pub struct NecDecoder;

impl NecDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for NecDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Nec
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if is_repeat_frame(symbols) {
            return Err(DecodeError::NotSupported);
        }
        if symbols.len() < MIN_SYMBOLS {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
        }
        if !match_mark(&symbols[0], HEADER_MARK) || !match_space(&symbols[0], HEADER_SPACE) {
            return Err(DecodeError::TimingMismatch);
        }

        let data = decode_word(symbols, 1, BITS, BIT_MARK, ONE_SPACE, ZERO_SPACE, false)?;

        let address = (data & 0xFF) as u8;
        let address_inv = ((data >> 8) & 0xFF) as u8;
        let command = ((data >> 16) & 0xFF) as u8;
        let command_inv = ((data >> 24) & 0xFF) as u8;

        let address_ok = address ^ address_inv == 0xFF;
        let command_ok = command ^ command_inv == 0xFF;

        let mut code = DecodedCode::empty(ProtocolId::Nec);
        code.data = data;
        code.bits = BITS;
        code.command = command as u16;
        code.repeat_period_ms = 110;

        if address_ok && command_ok {
            code.address = address as u16;
        } else if (data & 0xFFFF) as u16 == APPLE_VENDOR_ID {
            return Err(DecodeError::TimingMismatch);
        } else if command_ok {
            // Extended addressing: full 16-bit address, no complement.
            code.address = (data & 0xFFFF) as u16;
            code.flags.set(CodeFlags::EXTENDED);
        } else {
            code.address = address as u16;
            code.flags.set(CodeFlags::PARITY_FAILED);
            tracing::warn!(
                addr = format_args!("{address:02X}/{address_inv:02X}"),
                cmd = format_args!("{command:02X}/{command_inv:02X}"),
                "NEC complement check failed"
            );
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
