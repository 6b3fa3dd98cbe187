//! Universal pulse-distance/width decoder.
//!
//! Last resort in the dispatch chain: decodes protocols no named decoder
//! knows, with zero protocol-specific foreknowledge. Mark and space
//! durations are histogrammed (50 µs bins, up to 10 ms), each histogram is
//! aggregated into at most two clusters, and the cluster shape classifies
//! the signal:
//!
//! - two mark durations, one space duration → pulse width
//! - two space durations, one mark duration → pulse distance
//! - both vary → decoded as pulse distance ("pulse-distance-width" in the
//!   protocol literature; decodable that way without loss)
//!
//! A third cluster in either histogram means the signal is something else
//! entirely (bi-phase, usually) and the decoder refuses rather than
//! guessing. Results are tagged [`ProtocolId::PulseDistance`] or
//! [`ProtocolId::PulseWidth`]; address and command stay empty because no
//! field layout is known.

use super::{ProtocolDecoder, tracing_decoded};
use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;

const BIN_SIZE_US: u32 = 50;
// 10 ms of 50 µs bins
const NUM_BINS: usize = 200;
// header + at least 7 data bits + stop
const MIN_SYMBOLS: usize = 18;
const MAX_BITS: u16 = 64;

/// Aggregate a histogram into at most two clusters.
///
/// Scans bins in order, accumulating a weighted sum across consecutive
/// non-empty bins (a single empty gap bin is tolerated); each break emits
/// the rounded weighted-average bin as a cluster's canonical duration.
/// Returns `(short_bin, Option<long_bin>)`, or `None` when a third
/// cluster appears.
fn aggregate(histogram: &[u16], max_bin: usize) -> Option<(usize, Option<usize>)> {
    let mut short_bin: Option<usize> = None;
    let mut long_bin: Option<usize> = None;
    let mut sum: u32 = 0;
    let mut weighted_sum: u32 = 0;
    let mut gap = 0;

    for bin in 0..=max_bin {
        let count = histogram[bin] as u32;
        if count != 0 {
            sum += count;
            weighted_sum += count * bin as u32;
            gap = 0;
        } else {
            gap += 1;
        }

        if sum != 0 && (bin == max_bin || gap > 1) {
            let cluster = ((weighted_sum + sum / 2) / sum) as usize;
            if short_bin.is_none() {
                short_bin = Some(cluster);
            } else if long_bin.is_none() {
                long_bin = Some(cluster);
            } else {
                tracing::debug!("third duration cluster found, not pulse distance/width");
                return None;
            }
            sum = 0;
            weighted_sum = 0;
        }
    }

    short_bin.map(|s| (s, long_bin))
}

pub struct DistanceWidthDecoder;

impl DistanceWidthDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolDecoder for DistanceWidthDecoder {
    fn protocol(&self) -> ProtocolId {
        ProtocolId::PulseDistance
    }

    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        if symbols.len() < MIN_SYMBOLS {
            return Err(DecodeError::TooFewSymbols { got: symbols.len(), need: MIN_SYMBOLS });
        }

        // Histogram the data symbols, excluding the header and the final
        // symbol (stop bit for distance, trailing gap otherwise).
        let mut mark_hist = [0u16; NUM_BINS];
        let mut space_hist = [0u16; NUM_BINS];
        let mut mark_max = 0usize;
        let mut space_max = 0usize;

        for sym in &symbols[1..symbols.len() - 1] {
            let mark_bin = (sym.mark_us / BIN_SIZE_US) as usize;
            let space_bin = (sym.space_us / BIN_SIZE_US) as usize;
            if mark_bin >= NUM_BINS || space_bin >= NUM_BINS {
                tracing::debug!(mark_us = sym.mark_us, space_us = sym.space_us, "duration beyond 10ms");
                return Err(DecodeError::TimingMismatch);
            }
            mark_hist[mark_bin] += 1;
            space_hist[space_bin] += 1;
            mark_max = mark_max.max(mark_bin);
            space_max = space_max.max(space_bin);
        }

        let (mark_short, mark_long) =
            aggregate(&mark_hist, mark_max).ok_or(DecodeError::TimingMismatch)?;
        let (space_short, space_long) =
            aggregate(&space_hist, space_max).ok_or(DecodeError::TimingMismatch)?;

        // Classification. Nothing varying means nothing to decode.
        let is_pulse_width = match (mark_long, space_long) {
            (None, None) => {
                tracing::debug!("single duration for both marks and spaces");
                return Err(DecodeError::TimingMismatch);
            }
            (Some(_), None) => true,
            // Spaces vary (alone or together with marks): pulse distance.
            (None, Some(_)) | (Some(_), Some(_)) => false,
        };

        // Pulse distance carries a mandatory stop bit; pulse width does not.
        let num_bits = symbols.len() - 1 - usize::from(!is_pulse_width);
        if num_bits == 0 || num_bits > MAX_BITS as usize {
            tracing::debug!(num_bits, "bit count out of range");
            return Err(DecodeError::TimingMismatch);
        }

        // Threshold at the midpoint of the two cluster centres.
        let threshold_us = if is_pulse_width {
            let long = mark_long.unwrap_or(mark_short);
            ((mark_short + long) as u32 * BIN_SIZE_US) / 2
        } else {
            let long = space_long.unwrap_or(space_short);
            ((space_short + long) as u32 * BIN_SIZE_US) / 2
        };

        let mut data: u64 = 0;
        for i in 0..num_bits {
            let sym = &symbols[1 + i];
            let duration = if is_pulse_width { sym.mark_us } else { sym.space_us };
            if duration >= threshold_us {
                data |= 1u64 << i; // LSB first by default
            }
        }

        let protocol = if is_pulse_width { ProtocolId::PulseWidth } else { ProtocolId::PulseDistance };
        let mut code = DecodedCode::empty(protocol);
        code.data = data;
        code.bits = num_bits as u16;

        tracing::info!(
            protocol = %protocol,
            bits = num_bits,
            data = format_args!("{data:#X}"),
            "universal decoder matched unknown protocol"
        );
        tracing_decoded(&code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::ProtocolDecoder as _;

    fn distance_frame(data: u64, bits: usize) -> Vec<TimingSymbol> {
        // NEC-like timings the decoder has never been told about.
        let mut symbols = vec![TimingSymbol::new(9000, 4500)];
        for i in 0..bits {
            let one = (data >> i) & 1 == 1;
            symbols.push(TimingSymbol::new(560, if one { 1690 } else { 560 }));
        }
        symbols.push(TimingSymbol::new(560, 9000));
        symbols
    }

    #[test]
    fn classifies_and_decodes_pulse_distance() {
        let data = 0xF30C_7F80u64;
        let code = DistanceWidthDecoder::new()
            .try_decode(&distance_frame(data, 32))
            .unwrap();
        assert_eq!(code.protocol, ProtocolId::PulseDistance);
        assert_eq!(code.bits, 32);
        assert_eq!(code.data, data);
        assert_eq!(code.address, 0);
        assert_eq!(code.command, 0);
    }

    #[test]
    fn agrees_with_nec_decoder_bit_for_bit() {
        let data = 0xF30C_FF00u32; // addr 0x00, cmd 0x0C with complements
        let symbols = crate::protocols::nec::tests::frame(data);
        let named = crate::protocols::nec::NecDecoder::new().try_decode(&symbols).unwrap();
        let universal = DistanceWidthDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(universal.data, named.data);
        assert_eq!(universal.bits, named.bits);
    }

    #[test]
    fn classifies_pulse_width() {
        // Sony-like: marks vary, spaces constant, no stop bit.
        let data = 0b1010_1100_1110u64;
        let mut symbols = vec![TimingSymbol::new(2400, 600)];
        for i in 0..12 {
            let one = (data >> i) & 1 == 1;
            let space = if i == 11 { 25_000 } else { 600 };
            symbols.push(TimingSymbol::new(if one { 1200 } else { 600 }, space));
        }
        // pad to the minimum symbol count with more data bits
        for _ in 12..17 {
            symbols.insert(symbols.len() - 1, TimingSymbol::new(600, 600));
        }
        let code = DistanceWidthDecoder::new().try_decode(&symbols).unwrap();
        assert_eq!(code.protocol, ProtocolId::PulseWidth);
        assert_eq!(code.bits as usize, symbols.len() - 1);
    }

    #[test]
    fn refuses_three_duration_clusters() {
        // Three distinct space durations — bi-phase-ish, not decodable here.
        let mut symbols = vec![TimingSymbol::new(900, 900)];
        for i in 0..20 {
            let space = match i % 3 {
                0 => 500,
                1 => 1500,
                _ => 3000,
            };
            symbols.push(TimingSymbol::new(500, space));
        }
        symbols.push(TimingSymbol::new(500, 9000));
        assert_eq!(
            DistanceWidthDecoder::new().try_decode(&symbols),
            Err(DecodeError::TimingMismatch)
        );
    }

    #[test]
    fn refuses_zero_variation() {
        let mut symbols = vec![TimingSymbol::new(2000, 2000)];
        for _ in 0..20 {
            symbols.push(TimingSymbol::new(500, 500));
        }
        symbols.push(TimingSymbol::new(500, 9000));
        assert_eq!(
            DistanceWidthDecoder::new().try_decode(&symbols),
            Err(DecodeError::TimingMismatch)
        );
    }
}
