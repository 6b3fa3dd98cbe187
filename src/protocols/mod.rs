//! Protocol decoders for consumer, AC, and exotic IR protocols.
//!
//! Each decoder is an object implementing [`ProtocolDecoder`] over a
//! captured symbol slice. Decoders are stateless: repeat-frame resolution
//! and multi-frame verification live in the pipeline, which owns that
//! state. The [`DecoderRegistry`] holds decoders in a fixed priority order
//! — most prevalent consumer protocols first, then extended consumer
//! protocols, AC protocols, exotic/legacy protocols, and the universal
//! pulse decoder last. Callers may also build a registry with their own
//! decoder order.
//!
//! Ordering inside the AC tier is load-bearing: Mitsubishi, Hitachi and
//! Fujitsu share header envelopes within tolerance, and the variable-
//! length decoders would otherwise truncate the longer frames.

pub(crate) mod common;

mod apple;
mod bosewave;
mod carrier;
mod daikin;
mod denon;
mod distance_width;
mod fast;
mod fujitsu;
mod haier;
mod hitachi;
mod jvc;
mod kaseikyo;
mod lego;
mod lg;
mod magiquest;
mod midea;
mod mitsubishi;
pub(crate) mod nec;
mod rc5;
mod rc6;
mod samsung;
mod sony;
mod whynter;

pub use apple::AppleDecoder;
pub use bosewave::BoseWaveDecoder;
pub use carrier::CarrierDecoder;
pub use daikin::DaikinDecoder;
pub use denon::DenonDecoder;
pub use distance_width::DistanceWidthDecoder;
pub use fast::FastDecoder;
pub use fujitsu::FujitsuDecoder;
pub use haier::HaierDecoder;
pub use hitachi::HitachiDecoder;
pub use jvc::JvcDecoder;
pub use kaseikyo::KaseikyoDecoder;
pub use lego::LegoDecoder;
pub use lg::{Lg2Decoder, LgDecoder};
pub use magiquest::MagiQuestDecoder;
pub use midea::MideaDecoder;
pub use mitsubishi::MitsubishiDecoder;
pub use nec::{is_repeat_frame as is_nec_repeat_frame, NecDecoder};
pub use rc5::Rc5Decoder;
pub use rc6::Rc6Decoder;
pub use samsung::{Samsung48Decoder, SamsungDecoder};
pub use sony::SonyDecoder;
pub use whynter::WhynterDecoder;

pub(crate) use daikin::{frame_bytes as daikin_frame_bytes, GAP_US as DAIKIN_GAP_US};
pub(crate) use carrier::frame_bytes as carrier_frame_bytes;
pub(crate) use fujitsu::frame_bytes as fujitsu_frame_bytes;
pub(crate) use haier::frame_bytes as haier_frame_bytes;
pub(crate) use midea::frame_bytes as midea_frame_bytes;
pub(crate) use mitsubishi::frame_bytes as mitsubishi_frame_bytes;
pub(crate) use rc5::encode_word as rc5_encode_word;
#[cfg(test)]
pub(crate) use rc5::pack as rc5_pack;
pub(crate) use rc6::encode_word as rc6_encode_word;

use crate::code::{DecodedCode, ProtocolId, TimingSymbol};
use crate::error::DecodeError;

/// Contract implemented by every protocol decoder.
pub trait ProtocolDecoder: Send + Sync {
    /// The protocol this decoder reports on success. Decoders that can
    /// refine the identity (Kaseikyo → Panasonic) report their primary id.
    fn protocol(&self) -> ProtocolId;

    /// Attempt to decode a complete captured frame.
    fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError>;
}

pub(crate) fn tracing_decoded(code: &DecodedCode) {
    tracing::info!(
        protocol = %code.protocol,
        bits = code.bits,
        address = format_args!("{:#06X}", code.address),
        command = format_args!("{:#06X}", code.command),
        flags = code.flags.0,
        "decoded"
    );
}

/// Ordered collection of protocol decoders.
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn ProtocolDecoder>>,
}

impl DecoderRegistry {
    /// The default tiered ordering.
    pub fn new() -> Self {
        let decoders: Vec<Box<dyn ProtocolDecoder>> = vec![
            // Tier 1: most prevalent consumer protocols
            Box::new(NecDecoder::new()),
            Box::new(SamsungDecoder::new()),
            Box::new(SonyDecoder::new()),
            Box::new(JvcDecoder::new()),
            Box::new(LgDecoder::new()),
            // Tier 2: extended consumer protocols
            Box::new(Rc5Decoder::new()),
            Box::new(Rc6Decoder::new()),
            Box::new(DenonDecoder::new()),
            Box::new(KaseikyoDecoder::new()),
            Box::new(Samsung48Decoder::new()),
            Box::new(AppleDecoder::new()),
            // Tier 3: AC protocols, longest minimum frame first — the
            // 3.3-3.7ms headers all overlap at 25% tolerance, so a short
            // decoder tried early would truncate a longer brand's frame.
            Box::new(HitachiDecoder::new()),
            Box::new(DaikinDecoder::new()),
            Box::new(MitsubishiDecoder::new()),
            Box::new(FujitsuDecoder::new()),
            Box::new(CarrierDecoder::new()),
            Box::new(HaierDecoder::new()),
            Box::new(MideaDecoder::new()),
            Box::new(Lg2Decoder::new()),
            // Tier 4: exotic / legacy
            Box::new(WhynterDecoder::new()),
            Box::new(LegoDecoder::new()),
            Box::new(MagiQuestDecoder::new()),
            Box::new(BoseWaveDecoder::new()),
            Box::new(FastDecoder::new()),
            // Tier 5: universal fallback
            Box::new(DistanceWidthDecoder::new()),
        ];
        Self { decoders }
    }

    /// A registry with a caller-supplied decoder order.
    pub fn with_decoders(decoders: Vec<Box<dyn ProtocolDecoder>>) -> Self {
        Self { decoders }
    }

    /// Try decoders in order; first success wins. A `NotSupported` result
    /// (a valid repeat frame without context) short-circuits the chain so
    /// it cannot fall through to a bogus later match.
    pub fn try_decode(&self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        for decoder in &self.decoders {
            match decoder.try_decode(symbols) {
                Ok(code) => return Ok(code),
                Err(DecodeError::NotSupported) => return Err(DecodeError::NotSupported),
                Err(_) => continue,
            }
        }
        Err(DecodeError::TimingMismatch)
    }

    /// Look up the first decoder registered for a protocol.
    pub fn get(&self, protocol: ProtocolId) -> Option<&dyn ProtocolDecoder> {
        self.decoders
            .iter()
            .find(|d| d.protocol() == protocol)
            .map(|d| d.as_ref())
    }

    /// Protocols in dispatch order.
    pub fn protocols(&self) -> Vec<ProtocolId> {
        self.decoders.iter().map(|d| d.protocol()).collect()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nec_dispatches_first() {
        let registry = DecoderRegistry::new();
        assert_eq!(registry.protocols()[0], ProtocolId::Nec);
        let symbols = nec::tests::frame(0xF30C_FF00);
        let code = registry.try_decode(&symbols).unwrap();
        assert_eq!(code.protocol, ProtocolId::Nec);
        assert_eq!(code.command, 0x0C);
    }

    #[test]
    fn repeat_frame_short_circuits_the_chain() {
        let registry = DecoderRegistry::new();
        let symbols = [
            crate::code::TimingSymbol::new(9000, 2250),
            crate::code::TimingSymbol::new(560, 30_000),
        ];
        assert_eq!(registry.try_decode(&symbols), Err(DecodeError::NotSupported));
    }

    #[test]
    fn unknown_signal_reaches_the_universal_decoder() {
        // Timings no named decoder owns: 1 ms header, 400/800 spaces.
        let mut symbols = vec![crate::code::TimingSymbol::new(1000, 1000)];
        for i in 0..24 {
            let space = if i % 2 == 0 { 400 } else { 800 };
            symbols.push(crate::code::TimingSymbol::new(200, space));
        }
        symbols.push(crate::code::TimingSymbol::new(200, 20_000));
        let code = registry_decode(&symbols);
        assert_eq!(code.protocol, ProtocolId::PulseDistance);
        assert_eq!(code.bits, 24);
    }

    fn registry_decode(symbols: &[crate::code::TimingSymbol]) -> DecodedCode {
        DecoderRegistry::new().try_decode(symbols).unwrap()
    }

    #[test]
    fn ac_frames_dispatch_to_their_own_decoders() {
        use crate::ac::{encode_state, AcState};
        for protocol in [
            ProtocolId::Midea,
            ProtocolId::Haier,
            ProtocolId::Mitsubishi,
            ProtocolId::Hitachi,
            ProtocolId::Daikin,
            ProtocolId::Fujitsu,
            ProtocolId::Carrier,
        ] {
            let state = AcState { power: true, protocol, ..AcState::default() };
            let frame = encode_state(&state).unwrap();
            let code = DecoderRegistry::new().try_decode(&frame.symbols).unwrap();
            assert_eq!(code.protocol, protocol);
            assert!(code.checksum_ok(), "{protocol}");
        }
    }

    #[test]
    fn custom_order_is_respected() {
        let registry =
            DecoderRegistry::with_decoders(vec![Box::new(SonyDecoder::new())]);
        assert_eq!(registry.protocols(), vec![ProtocolId::Sony]);
        let nec_frame = nec::tests::frame(0xF30C_FF00);
        assert!(registry.try_decode(&nec_frame).is_err());
    }
}
