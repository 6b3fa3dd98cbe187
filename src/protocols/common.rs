//! Shared helpers for protocol decoders and the AC codec.
//!
//! Two bit-reader flavours exist because the protocols themselves come in
//! two flavours: the strict reader rejects any space that is neither the
//! "one" nor the "zero" duration (NEC family, AC byte protocols), while
//! the lenient reader treats anything that is not a "one" as a "zero"
//! (Whynter, Lego, MagiQuest, BoseWave — protocols that only distinguish
//! the "one" duration on the wire).
//!
//! The checksum functions are deliberately separate entries even where the
//! arithmetic is one line: none of these algorithms are interchangeable,
//! and picking the wrong one for a protocol breaks validation without
//! crashing anything.

use crate::code::TimingSymbol;
use crate::error::DecodeError;
use crate::timing::{match_mark, match_space, matches_tolerance};

// ─── Bit readers ─────────────────────────────────────────────────────────────

/// Decode `bits` pulse-distance bits starting at `symbols[start]`,
/// validating both the constant mark and the one/zero spaces.
pub(crate) fn decode_word(
    symbols: &[TimingSymbol],
    start: usize,
    bits: u16,
    bit_mark_us: u32,
    one_space_us: u32,
    zero_space_us: u32,
    msb_first: bool,
) -> Result<u64, DecodeError> {
    let mut data: u64 = 0;
    for i in 0..bits as usize {
        let sym = symbols
            .get(start + i)
            .ok_or(DecodeError::TooFewSymbols { got: symbols.len(), need: start + bits as usize })?;
        if !match_mark(sym, bit_mark_us) {
            tracing::debug!(bit = i, mark_us = sym.mark_us, "mark mismatch");
            return Err(DecodeError::TimingMismatch);
        }
        let bit = if match_space(sym, one_space_us) {
            true
        } else if match_space(sym, zero_space_us) {
            false
        } else {
            tracing::debug!(bit = i, space_us = sym.space_us, "space mismatch");
            return Err(DecodeError::TimingMismatch);
        };
        if msb_first {
            data = (data << 1) | bit as u64;
        } else if bit {
            data |= 1u64 << i;
        }
    }
    Ok(data)
}

/// Decode `bits` bits where only the "one" space is distinguished; any
/// other space (including a trailing gap) reads as zero. The mark is
/// validated when `bit_mark_us` is non-zero.
pub(crate) fn decode_word_lenient(
    symbols: &[TimingSymbol],
    start: usize,
    bits: u16,
    bit_mark_us: u32,
    one_space_us: u32,
    msb_first: bool,
) -> Result<u64, DecodeError> {
    let mut data: u64 = 0;
    for i in 0..bits as usize {
        let sym = symbols
            .get(start + i)
            .ok_or(DecodeError::TooFewSymbols { got: symbols.len(), need: start + bits as usize })?;
        if bit_mark_us != 0 && !match_mark(sym, bit_mark_us) {
            return Err(DecodeError::TimingMismatch);
        }
        let bit = match_space(sym, one_space_us);
        if msb_first {
            data = (data << 1) | bit as u64;
        } else if bit {
            data |= 1u64 << i;
        }
    }
    Ok(data)
}

/// Decode `num_bytes` pulse-distance bytes (LSB first within each byte)
/// starting at `symbols[start]`. Used by the byte-oriented AC protocols.
pub(crate) fn decode_bytes(
    symbols: &[TimingSymbol],
    start: usize,
    num_bytes: usize,
    bit_mark_us: u32,
    one_space_us: u32,
    zero_space_us: u32,
) -> Result<Vec<u8>, DecodeError> {
    let need = start + num_bytes * 8;
    if symbols.len() < need {
        return Err(DecodeError::TooFewSymbols { got: symbols.len(), need });
    }
    let mut data = vec![0u8; num_bytes];
    for (byte_idx, byte) in data.iter_mut().enumerate() {
        for bit_idx in 0..8 {
            let sym = &symbols[start + byte_idx * 8 + bit_idx];
            if !match_mark(sym, bit_mark_us) {
                return Err(DecodeError::TimingMismatch);
            }
            if match_space(sym, one_space_us) {
                *byte |= 1 << bit_idx;
            } else if !match_space(sym, zero_space_us) {
                return Err(DecodeError::TimingMismatch);
            }
        }
    }
    Ok(data)
}

// ─── Checksum algorithms ─────────────────────────────────────────────────────

/// Sum of all nibbles, modulo 16 (Carrier, LG, LG2).
pub(crate) fn nibble_sum(data: &[u8]) -> u8 {
    let mut sum: u16 = 0;
    for &b in data {
        sum += (b & 0x0F) as u16;
        sum += (b >> 4) as u16;
    }
    (sum & 0x0F) as u8
}

/// Sum of all bytes, modulo 256 (Hitachi, Mitsubishi, Daikin).
pub(crate) fn byte_sum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// XOR of all bytes (Haier, Samsung48, Panasonic).
pub(crate) fn xor_bytes(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Two's complement of the byte sum (Fujitsu).
pub(crate) fn twos_complement_sum(data: &[u8]) -> u8 {
    byte_sum(data).wrapping_neg()
}

// ─── Bi-phase (Manchester) support ───────────────────────────────────────────

/// Flatten a symbol slice into a run of half-bit units.
///
/// Starting at `symbols[start]`, each mark and space duration is quantized
/// to `1..=max_units` multiples of `unit_us` (within `tolerance_pct`) and
/// expanded into that many entries (`true` = mark). The final space is
/// allowed to be an unquantizable trailing gap; any other duration outside
/// tolerance fails with `TimingMismatch`.
pub(crate) fn quantize_half_units(
    symbols: &[TimingSymbol],
    start: usize,
    unit_us: u32,
    tolerance_pct: u32,
    max_units: u32,
) -> Result<Vec<bool>, DecodeError> {
    fn quantize(duration_us: u32, unit_us: u32, tolerance_pct: u32, max_units: u32) -> Option<u32> {
        (1..=max_units).find(|&n| matches_tolerance(duration_us, n * unit_us, tolerance_pct))
    }

    let mut levels = Vec::with_capacity((symbols.len() - start) * 2);
    for (i, sym) in symbols[start..].iter().enumerate() {
        let last = start + i + 1 == symbols.len();
        let marks = quantize(sym.mark_us, unit_us, tolerance_pct, max_units)
            .ok_or(DecodeError::TimingMismatch)?;
        for _ in 0..marks {
            levels.push(true);
        }
        match quantize(sym.space_us, unit_us, tolerance_pct, max_units) {
            Some(spaces) => {
                for _ in 0..spaces {
                    levels.push(false);
                }
            }
            // Trailing idle gap terminates the stream.
            None if last => break,
            None => return Err(DecodeError::TimingMismatch),
        }
    }
    Ok(levels)
}

/// Merge a half-unit level sequence back into timing symbols. `unit_us` is
/// the half-bit duration; `trail_space_us` closes the final symbol. The
/// sequence must start with a mark.
pub(crate) fn merge_half_units(
    levels: &[bool],
    unit_us: u32,
    trail_space_us: u32,
) -> Vec<TimingSymbol> {
    let mut symbols = Vec::new();
    let mut mark_units: u32 = 0;
    let mut space_units: u32 = 0;
    for &level in levels {
        if level {
            if space_units > 0 {
                symbols.push(TimingSymbol::new(mark_units * unit_us, space_units * unit_us));
                mark_units = 0;
                space_units = 0;
            }
            mark_units += 1;
        } else {
            space_units += 1;
        }
    }
    if mark_units > 0 {
        let space = if space_units > 0 {
            space_units * unit_us + trail_space_us
        } else {
            trail_space_us
        };
        symbols.push(TimingSymbol::new(mark_units * unit_us, space));
    }
    symbols
}
