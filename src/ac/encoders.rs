//! Per-brand AC frame builders.
//!
//! Each encoder owns a fixed byte-layout table — which byte and bit range
//! holds power, mode, temperature (offset from 16 °C unless noted), fan,
//! swing and the extended features — and finishes the frame with that
//! protocol's checksum from the shared set. The layouts are deliberately
//! table-like code: fixed preamble constants, one field per line, checksum
//! last, so that changing a single state field touches exactly the bytes
//! the table assigns to it plus the checksum.

use super::{AcMode, AcState, EncodedFrame, FanSpeed, Swing};
use crate::code::ProtocolId;
use crate::constants::constants;
use crate::encode::encode_bytes;
use crate::error::EncodeError;
use crate::protocols::common::{byte_sum, nibble_sum, twos_complement_sum, xor_bytes};
use crate::protocols::DAIKIN_GAP_US;

pub(crate) fn mode_value(mode: AcMode) -> u8 {
    match mode {
        AcMode::Off | AcMode::Auto => 0,
        AcMode::Cool => 1,
        AcMode::Heat => 2,
        AcMode::Dry => 3,
        AcMode::Fan => 4,
    }
}

pub(crate) fn fan_value(fan: FanSpeed) -> u8 {
    match fan {
        FanSpeed::Auto => 0,
        FanSpeed::Low => 1,
        FanSpeed::Medium => 2,
        FanSpeed::High => 3,
        FanSpeed::Quiet => 4,
        FanSpeed::Turbo => 5,
    }
}

pub(crate) fn swing_value(swing: Swing) -> u8 {
    match swing {
        Swing::Off => 0,
        Swing::Vertical => 1,
        Swing::Horizontal => 2,
        Swing::Both => 3,
        Swing::Auto => 4,
    }
}

/// Extended-feature bitmask shared by the layouts that carry a full
/// feature byte.
pub(crate) fn features_byte(state: &AcState) -> u8 {
    (state.turbo as u8)
        | (state.quiet as u8) << 1
        | (state.econo as u8) << 2
        | (state.sleep as u8) << 3
        | (state.display as u8) << 4
        | (state.beep as u8) << 5
        | (state.filter as u8) << 6
        | (state.light as u8) << 7
}

fn frame_from_bytes(
    protocol: ProtocolId,
    bytes: Vec<u8>,
    symbols: Vec<crate::code::TimingSymbol>,
) -> Result<EncodedFrame, EncodeError> {
    let c = constants(protocol).ok_or(EncodeError::NotImplemented(protocol))?;
    Ok(EncodedFrame {
        protocol,
        bits: (bytes.len() * 8) as u16,
        bytes,
        symbols,
        carrier_hz: c.carrier_hz(),
        duty_cycle_pct: 33,
    })
}

/// Dispatch to the brand encoder recorded in the state.
pub(crate) fn encode(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    match state.protocol {
        ProtocolId::Mitsubishi => encode_mitsubishi(state),
        ProtocolId::Daikin => encode_daikin(state),
        ProtocolId::Carrier => encode_carrier(state),
        ProtocolId::Hitachi => encode_hitachi(state),
        ProtocolId::Fujitsu => encode_fujitsu(state),
        ProtocolId::Haier => encode_haier(state),
        ProtocolId::Midea => encode_midea(state),
        ProtocolId::Samsung48 => encode_samsung48(state),
        ProtocolId::Panasonic | ProtocolId::Kaseikyo => encode_panasonic(state),
        ProtocolId::Lg2 => encode_lg2(state),
        other => Err(EncodeError::NotImplemented(other)),
    }
}

// ─── Mitsubishi: 19 bytes, byte-sum checksum ─────────────────────────────────

pub(crate) const MITSUBISHI_PREAMBLE: [u8; 5] = [0x23, 0xCB, 0x26, 0x01, 0x00];

pub(crate) fn mitsubishi_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 19];
    b[..5].copy_from_slice(&MITSUBISHI_PREAMBLE);
    b[5] = if state.is_on() { 0x20 } else { 0x00 };
    b[6] = mode_value(state.mode);
    b[7] = state.temperature_c - super::TEMP_MIN_C;
    b[8] = fan_value(state.fan) | swing_value(state.swing) << 4;
    b[9] = features_byte(state);
    b[10] = state.sleep_timer_min;
    b[11] = state.clean as u8;
    b[18] = byte_sum(&b[..18]);
    b
}

fn encode_mitsubishi(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = mitsubishi_bytes(state);
    let symbols = encode_bytes(ProtocolId::Mitsubishi, &bytes)?;
    frame_from_bytes(ProtocolId::Mitsubishi, bytes, symbols)
}

// ─── Daikin: 8 + 19 bytes, two frames, byte-sum per frame ────────────────────

pub(crate) const DAIKIN_PREAMBLE: [u8; 4] = [0x11, 0xDA, 0x27, 0x00];

pub(crate) fn daikin_frames(state: &AcState) -> (Vec<u8>, Vec<u8>) {
    let mut f1 = vec![0u8; 8];
    f1[..4].copy_from_slice(&DAIKIN_PREAMBLE);
    f1[4] = 0xC5;
    f1[7] = byte_sum(&f1[..7]);

    let mut f2 = vec![0u8; 19];
    f2[..4].copy_from_slice(&DAIKIN_PREAMBLE);
    f2[5] = (state.is_on() as u8) | mode_value(state.mode) << 4;
    f2[6] = state.temperature_c * 2; // half-degree field
    f2[8] = fan_value(state.fan) << 4 | swing_value(state.swing);
    f2[12] = (state.turbo as u8) | (state.quiet as u8) << 1 | (state.econo as u8) << 2;
    f2[13] = (state.sleep as u8)
        | (state.clean as u8) << 1
        | (state.beep as u8) << 2
        | (state.display as u8) << 3
        | (state.light as u8) << 4
        | (state.filter as u8) << 5;
    f2[14] = state.sleep_timer_min;
    f2[18] = byte_sum(&f2[..18]);
    (f1, f2)
}

fn encode_daikin(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let (f1, f2) = daikin_frames(state);

    // Frame 1, inter-frame gap on its stop symbol, then frame 2.
    let mut symbols = encode_bytes(ProtocolId::Daikin, &f1)?;
    if let Some(stop) = symbols.last_mut() {
        stop.space_us = DAIKIN_GAP_US;
    }
    symbols.extend(encode_bytes(ProtocolId::Daikin, &f2)?);

    let mut bytes = f1;
    bytes.extend_from_slice(&f2);
    frame_from_bytes(ProtocolId::Daikin, bytes, symbols)
}

// ─── Carrier (Voltas/Blue Star/Lloyd): 16 bytes, nibble-sum checksum ─────────

pub(crate) const CARRIER_PREAMBLE: [u8; 2] = [0xA1, 0x82];

pub(crate) fn carrier_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 16];
    b[..2].copy_from_slice(&CARRIER_PREAMBLE);
    b[2] = (state.is_on() as u8) | mode_value(state.mode) << 1;
    b[3] = (state.temperature_c - super::TEMP_MIN_C) | fan_value(state.fan) << 4;
    b[4] = swing_value(state.swing);
    b[5] = features_byte(state);
    b[6] = state.sleep_timer_min;
    b[7] = state.clean as u8;
    b[15] = nibble_sum(&b[..15]);
    b
}

fn encode_carrier(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = carrier_bytes(state);
    let symbols = encode_bytes(ProtocolId::Carrier, &bytes)?;
    frame_from_bytes(ProtocolId::Carrier, bytes, symbols)
}

// ─── Hitachi: 33 bytes (common variant), byte-sum checksum ───────────────────

pub(crate) fn hitachi_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 33];
    b[0] = 0x01;
    b[1] = 0x10;
    b[10] = mode_value(state.mode) | (state.is_on() as u8) << 7;
    b[11] = state.temperature_c; // absolute °C
    b[12] = fan_value(state.fan);
    b[13] = swing_value(state.swing);
    b[14] = features_byte(state);
    b[15] = state.sleep_timer_min;
    b[32] = byte_sum(&b[..32]);
    b
}

fn encode_hitachi(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = hitachi_bytes(state);
    let symbols = encode_bytes(ProtocolId::Hitachi, &bytes)?;
    frame_from_bytes(ProtocolId::Hitachi, bytes, symbols)
}

// ─── Fujitsu: 16-byte full-state frame, two's-complement checksum ────────────

pub(crate) const FUJITSU_PREAMBLE: [u8; 8] = [0x14, 0x63, 0x00, 0x10, 0x10, 0xFE, 0x09, 0x30];

pub(crate) fn fujitsu_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 16];
    b[..8].copy_from_slice(&FUJITSU_PREAMBLE);
    b[8] = (state.temperature_c - super::TEMP_MIN_C) << 4 | state.is_on() as u8;
    b[9] = mode_value(state.mode);
    b[10] = fan_value(state.fan) | swing_value(state.swing) << 4;
    b[11] = features_byte(state);
    b[12] = state.sleep_timer_min;
    b[15] = twos_complement_sum(&b[..15]);
    b
}

fn encode_fujitsu(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = fujitsu_bytes(state);
    let symbols = encode_bytes(ProtocolId::Fujitsu, &bytes)?;
    frame_from_bytes(ProtocolId::Fujitsu, bytes, symbols)
}

// ─── Haier: 13 bytes, XOR checksum ───────────────────────────────────────────

pub(crate) const HAIER_PREFIX: u8 = 0xA5;

pub(crate) fn haier_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 13];
    b[0] = HAIER_PREFIX;
    b[1] = mode_value(state.mode) | (state.is_on() as u8) << 6;
    b[2] = state.temperature_c - super::TEMP_MIN_C;
    b[3] = fan_value(state.fan) | swing_value(state.swing) << 4;
    b[4] = features_byte(state);
    b[5] = state.sleep_timer_min;
    b[9] = b[1]; // command mirror byte
    b[12] = xor_bytes(&b[..12]);
    b
}

fn encode_haier(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = haier_bytes(state);
    let symbols = encode_bytes(ProtocolId::Haier, &bytes)?;
    frame_from_bytes(ProtocolId::Haier, bytes, symbols)
}

// ─── Midea: 3 data bytes + complements ───────────────────────────────────────

pub(crate) const MIDEA_PREFIX: u8 = 0xB2;

pub(crate) fn midea_bytes(state: &AcState) -> Vec<u8> {
    let b0 = MIDEA_PREFIX;
    let b1 = (state.is_on() as u8) << 7 | fan_value(state.fan) << 4 | swing_value(state.swing);
    let b2 = (state.temperature_c - super::TEMP_MIN_C) << 4 | mode_value(state.mode);
    vec![b0, b1, b2, !b0, !b1, !b2]
}

fn encode_midea(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = midea_bytes(state);
    let symbols = encode_bytes(ProtocolId::Midea, &bytes)?;
    frame_from_bytes(ProtocolId::Midea, bytes, symbols)
}

// ─── Samsung48: 6 bytes, XOR checksum ────────────────────────────────────────

pub(crate) fn samsung48_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 6];
    b[0] = 0x02;
    b[1] = (state.is_on() as u8) << 4 | mode_value(state.mode);
    b[2] = (state.temperature_c - super::TEMP_MIN_C) | fan_value(state.fan) << 4;
    b[3] = swing_value(state.swing)
        | (state.turbo as u8) << 3
        | (state.quiet as u8) << 4
        | (state.econo as u8) << 5
        | (state.sleep as u8) << 6
        | (state.light as u8) << 7;
    b[4] = state.sleep_timer_min;
    b[5] = xor_bytes(&b[..5]);
    b
}

fn encode_samsung48(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = samsung48_bytes(state);
    let symbols = encode_bytes(ProtocolId::Samsung48, &bytes)?;
    frame_from_bytes(ProtocolId::Samsung48, bytes, symbols)
}

// ─── Panasonic/Kaseikyo: 6 bytes, XOR parity over the payload ────────────────

pub(crate) fn panasonic_bytes(state: &AcState) -> Vec<u8> {
    let mut b = vec![0u8; 6];
    // Kaseikyo vendor id 0x2002, LSB first on the wire.
    b[0] = 0x02;
    b[1] = 0x20;
    b[2] = (state.is_on() as u8) | mode_value(state.mode) << 1;
    b[3] = (state.temperature_c - super::TEMP_MIN_C) | fan_value(state.fan) << 4;
    b[4] = swing_value(state.swing)
        | (state.turbo as u8) << 3
        | (state.quiet as u8) << 4
        | (state.econo as u8) << 5
        | (state.sleep as u8) << 6
        | (state.light as u8) << 7;
    b[5] = xor_bytes(&b[2..5]);
    b
}

fn encode_panasonic(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let bytes = panasonic_bytes(state);
    let symbols = encode_bytes(ProtocolId::Panasonic, &bytes)?;
    frame_from_bytes(ProtocolId::Panasonic, bytes, symbols)
}

// ─── LG2: 28-bit word, nibble-sum checksum in the top nibble ─────────────────

pub(crate) fn lg2_word(state: &AcState) -> u32 {
    let body: u32 = 0x88 // AC frame marker in the address byte
        | (state.is_on() as u32) << 8
        | (mode_value(state.mode) as u32) << 9
        | ((state.temperature_c - super::TEMP_MIN_C) as u32) << 12
        | (fan_value(state.fan) as u32) << 16
        | (swing_value(state.swing) as u32) << 19
        | (state.turbo as u32) << 22
        | (state.light as u32) << 23;
    let bytes = [(body & 0xFF) as u8, ((body >> 8) & 0xFF) as u8, ((body >> 16) & 0xFF) as u8];
    body | (nibble_sum(&bytes) as u32) << 24
}

fn encode_lg2(state: &AcState) -> Result<EncodedFrame, EncodeError> {
    let word = lg2_word(state);
    let mut code = crate::code::DecodedCode::empty(ProtocolId::Lg2);
    code.data = word as u64;
    code.bits = 28;
    let symbols = crate::encode::encode(&code)?;
    let bytes = word.to_le_bytes()[..4].to_vec();
    let c = constants(ProtocolId::Lg2).ok_or(EncodeError::NotImplemented(ProtocolId::Lg2))?;
    Ok(EncodedFrame {
        protocol: ProtocolId::Lg2,
        bytes,
        bits: 28,
        symbols,
        carrier_hz: c.carrier_hz(),
        duty_cycle_pct: 33,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{
        CarrierDecoder, DaikinDecoder, FujitsuDecoder, HaierDecoder, HitachiDecoder,
        KaseikyoDecoder, Lg2Decoder, MideaDecoder, MitsubishiDecoder, ProtocolDecoder,
        Samsung48Decoder,
    };

    fn on_state(protocol: ProtocolId) -> AcState {
        AcState {
            power: true,
            temperature_c: 24,
            protocol,
            ..AcState::default()
        }
    }

    /// Byte positions that differ between two frames.
    fn diff(a: &[u8], b: &[u8]) -> Vec<usize> {
        a.iter().zip(b).enumerate().filter(|(_, (x, y))| x != y).map(|(i, _)| i).collect()
    }

    #[test]
    fn every_brand_frame_passes_its_own_decoder_checksum() {
        let cases: Vec<(ProtocolId, Box<dyn ProtocolDecoder>)> = vec![
            (ProtocolId::Mitsubishi, Box::new(MitsubishiDecoder::new())),
            (ProtocolId::Daikin, Box::new(DaikinDecoder::new())),
            (ProtocolId::Carrier, Box::new(CarrierDecoder::new())),
            (ProtocolId::Hitachi, Box::new(HitachiDecoder::new())),
            (ProtocolId::Fujitsu, Box::new(FujitsuDecoder::new())),
            (ProtocolId::Haier, Box::new(HaierDecoder::new())),
            (ProtocolId::Midea, Box::new(MideaDecoder::new())),
            (ProtocolId::Samsung48, Box::new(Samsung48Decoder::new())),
            (ProtocolId::Panasonic, Box::new(KaseikyoDecoder::new())),
            (ProtocolId::Lg2, Box::new(Lg2Decoder::new())),
        ];
        for (protocol, decoder) in cases {
            let frame = encode(&on_state(protocol)).unwrap();
            let code = decoder.try_decode(&frame.symbols).unwrap();
            assert_eq!(code.protocol, protocol, "{protocol} identity");
            assert!(code.checksum_ok(), "{protocol} checksum");
        }
    }

    #[test]
    fn temperature_touches_only_its_bytes_and_the_checksum() {
        // (protocol, temp byte index, checksum byte index)
        let cases = [
            (ProtocolId::Mitsubishi, 7usize, 18usize),
            (ProtocolId::Carrier, 3, 15),
            (ProtocolId::Hitachi, 11, 32),
            (ProtocolId::Fujitsu, 8, 15),
            (ProtocolId::Haier, 2, 12),
        ];
        for (protocol, temp_idx, cs_idx) in cases {
            let mut state = on_state(protocol);
            let a = encode(&state).unwrap().bytes;
            state.temperature_c = 27;
            let b = encode(&state).unwrap().bytes;
            assert_eq!(diff(&a, &b), vec![temp_idx, cs_idx], "{protocol}");
        }
    }

    #[test]
    fn midea_temperature_touches_data_byte_and_its_complement() {
        let mut state = on_state(ProtocolId::Midea);
        let a = encode(&state).unwrap().bytes;
        state.temperature_c = 27;
        let b = encode(&state).unwrap().bytes;
        assert_eq!(diff(&a, &b), vec![2, 5]);
    }

    #[test]
    fn daikin_temperature_stays_inside_frame_two() {
        let mut state = on_state(ProtocolId::Daikin);
        let a = encode(&state).unwrap().bytes;
        state.temperature_c = 18;
        let b = encode(&state).unwrap().bytes;
        // Frame 1 occupies bytes 0..8; temp is frame 2 byte 6, checksum byte 18.
        assert_eq!(diff(&a, &b), vec![8 + 6, 8 + 18]);
    }

    #[test]
    fn boolean_features_land_in_the_feature_byte() {
        let mut state = on_state(ProtocolId::Carrier);
        let a = encode(&state).unwrap().bytes;
        state.quiet = true;
        let b = encode(&state).unwrap().bytes;
        assert_eq!(diff(&a, &b), vec![5, 15]);
        assert_eq!(a[5] ^ b[5], 0x02);
    }

    #[test]
    fn checksum_byte_tracks_the_declared_algorithm() {
        let state = on_state(ProtocolId::Fujitsu);
        let bytes = encode(&state).unwrap().bytes;
        assert_eq!(bytes[15], twos_complement_sum(&bytes[..15]));

        let bytes = encode(&on_state(ProtocolId::Hitachi)).unwrap().bytes;
        assert_eq!(bytes[32], byte_sum(&bytes[..32]));

        let bytes = encode(&on_state(ProtocolId::Haier)).unwrap().bytes;
        assert_eq!(bytes[12], xor_bytes(&bytes[..12]));

        let bytes = encode(&on_state(ProtocolId::Carrier)).unwrap().bytes;
        assert_eq!(bytes[15], nibble_sum(&bytes[..15]));
    }

    #[test]
    fn off_mode_clears_the_power_bit() {
        let mut state = on_state(ProtocolId::Mitsubishi);
        state.mode = AcMode::Off;
        let bytes = encode(&state).unwrap().bytes;
        assert_eq!(bytes[5], 0x00);
    }

    #[test]
    fn non_ac_protocol_is_not_implemented() {
        let state = on_state(ProtocolId::Sony);
        assert_eq!(encode(&state), Err(EncodeError::NotImplemented(ProtocolId::Sony)));
    }
}
