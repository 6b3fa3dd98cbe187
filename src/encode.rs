//! Protocol encoders: the inverse of the decoder family.
//!
//! [`encode`] regenerates a timing-symbol sequence from a decoded (or
//! stored) code, driven by the protocol constants table. Word protocols up
//! to 64 bits are fully table-driven; the bi-phase pair delegates to the
//! RC5/RC6 modules; `Raw` codes replay their stored symbol buffer
//! verbatim. Byte-oriented AC frames are built with [`encode_bytes`],
//! which the AC state codec layers its per-brand tables on top of.
//!
//! Codes tagged `PulseDistance`/`PulseWidth` by the universal decoder
//! carry no timing constants of their own; they are replayed with NEC
//! timings, the most widely tolerated envelope in the field.
//!
//! The returned buffer is sized to the bit count being produced and is
//! owned by the caller.

use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::constants::{constants, Encoding, ProtocolConstants};
use crate::error::EncodeError;
use crate::protocols::{rc5_encode_word, rc6_encode_word};

/// Idle space appended after the final mark of a frame.
pub(crate) const FRAME_GAP_US: u32 = 0x7FFF;

/// NEC repeat frame: shortened header plus the stop mark. Transmitted
/// every ~110 ms while a button is held.
pub fn encode_nec_repeat() -> Vec<TimingSymbol> {
    vec![
        TimingSymbol::new(9000, 2250),
        TimingSymbol::new(560, FRAME_GAP_US),
    ]
}

fn encode_word_with(c: &ProtocolConstants, data: u64, bits: u16) -> Vec<TimingSymbol> {
    let mut symbols = Vec::with_capacity(bits as usize + 2);
    if c.header_mark_us > 0 {
        symbols.push(TimingSymbol::new(c.header_mark_us, c.header_space_us));
    }
    for i in 0..bits {
        let position = if c.msb_first { bits - 1 - i } else { i };
        let one = (data >> position) & 1 == 1;
        match c.encoding {
            Encoding::PulseDistance => {
                let space = if one { c.one_space_us } else { c.zero_space_us };
                symbols.push(TimingSymbol::new(c.bit_mark_us, space));
            }
            Encoding::PulseWidth => {
                let mark = if one { c.one_space_us } else { c.bit_mark_us };
                let space = if !c.stop_bit && i + 1 == bits {
                    FRAME_GAP_US
                } else {
                    c.zero_space_us
                };
                symbols.push(TimingSymbol::new(mark, space));
            }
            Encoding::BiPhase => unreachable!("bi-phase handled by protocol modules"),
        }
    }
    if c.stop_bit {
        symbols.push(TimingSymbol::new(c.bit_mark_us, FRAME_GAP_US));
    }
    symbols
}

/// Encode a code into a transmittable symbol sequence.
pub fn encode(code: &DecodedCode) -> Result<Vec<TimingSymbol>, EncodeError> {
    match code.protocol {
        ProtocolId::Raw => code
            .raw
            .clone()
            .ok_or(EncodeError::NotEncodable(ProtocolId::Raw)),
        ProtocolId::Rc5 => Ok(rc5_encode_word(code.data as u16)),
        ProtocolId::Rc6 => Ok(rc6_encode_word(code.data)),
        ProtocolId::Unknown => Err(EncodeError::NotEncodable(ProtocolId::Unknown)),
        ProtocolId::PulseDistance | ProtocolId::PulseWidth => {
            // No timings of their own: replay through the NEC envelope.
            let nec = constants(ProtocolId::Nec)
                .ok_or(EncodeError::NotImplemented(ProtocolId::Nec))?;
            Ok(encode_word_with(nec, code.data, code.bits))
        }
        protocol => {
            let c = constants(protocol).ok_or(EncodeError::NotImplemented(protocol))?;
            if code.bits == 0 || code.bits > 64 {
                return Err(EncodeError::NotEncodable(protocol));
            }
            Ok(encode_word_with(c, code.data, code.bits))
        }
    }
}

/// Encode a byte frame (LSB first within each byte) for a byte-oriented
/// protocol: header, `8 * bytes` bit symbols, stop mark.
pub fn encode_bytes(protocol: ProtocolId, bytes: &[u8]) -> Result<Vec<TimingSymbol>, EncodeError> {
    let c = constants(protocol).ok_or(EncodeError::NotImplemented(protocol))?;
    let mut symbols = Vec::with_capacity(bytes.len() * 8 + 2);
    if c.header_mark_us > 0 {
        symbols.push(TimingSymbol::new(c.header_mark_us, c.header_space_us));
    }
    for &b in bytes {
        for i in 0..8 {
            let space = if (b >> i) & 1 == 1 { c.one_space_us } else { c.zero_space_us };
            symbols.push(TimingSymbol::new(c.bit_mark_us, space));
        }
    }
    symbols.push(TimingSymbol::new(c.bit_mark_us, FRAME_GAP_US));
    Ok(symbols)
}
