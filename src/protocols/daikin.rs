//! Daikin AC decoder: the multi-frame protocol.
//!
//! A transmission is two back-to-back frames — 8 bytes, then 19 bytes —
//! separated by a ~29 ms inter-frame gap riding on the first frame's stop
//! symbol. The gap is detected by space duration, never assumed present.
//! Each frame carries its own byte-sum checksum; both are validated and
//! reported independently.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;
use crate::protocols::common::{byte_sum, decode_bytes};
use crate::timing::{match_mark, match_space, matches_tolerance};

const HEADER_MARK: u32 = 3650;
const HEADER_SPACE: u32 = 1623;
const BIT_MARK: u32 = 428;
const ONE_SPACE: u32 = 1280;
const ZERO_SPACE: u32 = 428;
pub(crate) const GAP_US: u32 = 29_000;
pub(crate) const FRAME1_BYTES: usize = 8;
pub(crate) const FRAME2_BYTES: usize = 19;
// Two headers + both frames' bits; the gap stop symbol is optional.
const MIN_SYMBOLS: usize = 2 + (FRAME1_BYTES + FRAME2_BYTES) * 8;

/// Extract both frames' bytes; shared with the AC state codec.
pub(crate) fn frame_bytes(symbols: &[TimingSymbol]) -> Result<(Vec<u8>, Vec<u8>), DecodeError> {
    if symbols.len() < MIN_SYMBOLS {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
    }

    let mut idx = 0usize;
    if !match_mark(&symbols[idx], HEADER_MARK) || !match_space(&symbols[idx], HEADER_SPACE) {
        return Err(DecodeError::TimingMismatch);
    }
    idx += 1;
    let frame1 = decode_bytes(symbols, idx, FRAME1_BYTES, BIT_MARK, ONE_SPACE, ZERO_SPACE)?;
    idx += FRAME1_BYTES * 8;

    // Inter-frame gap: frame 1's stop symbol with a ~29 ms space.
    if idx < symbols.len() && matches_tolerance(symbols[idx].space_us, GAP_US, 10) {
        idx += 1;
    }

    if idx >= symbols.len()
        || !match_mark(&symbols[idx], HEADER_MARK)
        || !match_space(&symbols[idx], HEADER_SPACE)
    {
        return Err(DecodeError::TimingMismatch);
    }
    idx += 1;
    let frame2 = decode_bytes(symbols, idx, FRAME2_BYTES, BIT_MARK, ONE_SPACE, ZERO_SPACE)?;

    Ok((frame1, frame2))
}

pub struct DaikinDecoder;

impl DaikinDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for DaikinDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::Daikin
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        let (frame1, frame2) = frame_bytes(symbols)?;

        let cs1_ok = byte_sum(&frame1[..FRAME1_BYTES - 1]) == frame1[FRAME1_BYTES - 1];
        let cs2_ok = byte_sum(&frame2[..FRAME2_BYTES - 1]) == frame2[FRAME2_BYTES - 1];
        if !cs1_ok {
            tracing::warn!("Daikin frame 1 checksum mismatch");
        }
        if !cs2_ok {
            tracing::warn!("Daikin frame 2 checksum mismatch");
        }

        let mut code = DecodedCode::empty(ProtocolId::Daikin);
        code.bits = ((FRAME1_BYTES + FRAME2_BYTES) * 8) as u16;
        code.address = 0x11; // Daikin manufacturer marker
        code.command = frame2[5] as u16;
        for (i, &b) in frame2.iter().take(8).enumerate() {
            code.data |= (b as u64) << (i * 8);
        }
        if !cs1_ok || !cs2_ok {
            code.flags.set(CodeFlags::PARITY_FAILED);
        }

        tracing_decoded(&code);
        Ok(code)
    }
}
