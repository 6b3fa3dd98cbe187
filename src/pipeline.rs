//! Decode pipeline: signal conditioning, tiered dispatch, repeat
//! resolution, and multi-frame verification.
//!
//! A [`DecodePipeline`] owns the only mutable state in the codec — the
//! last successfully decoded NEC code (for resolving held-button repeat
//! frames, 200 ms window) and the learning-mode verification buffer
//! (500 ms window). Both are per-instance, so independent pipelines never
//! cross-talk; callers sharing one pipeline across threads wrap it in a
//! `Mutex`. No call here blocks or performs I/O.
//!
//! Receive flow per capture:
//! noise filter → gap trim → decoder chain → repeat resolution →
//! metadata population, with unrecognized-but-plausible captures retained
//! as `Raw` codes so arbitrary remotes stay controllable.

use std::time::Instant;

use crate::code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol, ValidationStatus};
use crate::config::CodecConfig;
use crate::constants::constants;
use crate::error::DecodeError;
use crate::protocols::{is_nec_repeat_frame, DecoderRegistry};
use crate::timing::matches_tolerance;

/// Progress of learning-mode verification.
#[derive(Debug, Clone, PartialEq)]
pub enum LearnProgress {
    /// Frames buffered so far; more are needed.
    Pending { frames: u8 },
    /// Enough consecutive frames matched; the code is trustworthy.
    Verified(DecodedCode),
}

struct LearnBuffer {
    code: DecodedCode,
    first_at: Instant,
    frames: u8,
}

pub struct DecodePipeline {
    config: CodecConfig,
    registry: DecoderRegistry,
    last_nec: Option<(DecodedCode, Instant)>,
    learn: Option<LearnBuffer>,
}

impl DecodePipeline {
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self::with_registry(config, DecoderRegistry::new())
    }

    /// A pipeline over a caller-supplied decoder order.
    pub fn with_registry(config: CodecConfig, registry: DecoderRegistry) -> Self {
        Self { config, registry, last_nec: None, learn: None }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode one capture, timestamped now.
    pub fn decode(&mut self, symbols: &[TimingSymbol]) -> Result<DecodedCode, DecodeError> {
        self.decode_at(symbols, Instant::now())
    }

    /// Decode one capture with an explicit timestamp. Capture layers that
    /// timestamp frames themselves (or tests) use this directly; the
    /// repeat window is measured between these timestamps.
    pub fn decode_at(
        &mut self,
        symbols: &[TimingSymbol],
        now: Instant,
    ) -> Result<DecodedCode, DecodeError> {
        let conditioned = self.condition(symbols);
        if conditioned.is_empty() {
            return Err(DecodeError::TooFewSymbols { got: 0, need: 1 });
        }

        if is_nec_repeat_frame(&conditioned) {
            return self.resolve_nec_repeat(now);
        }

        match self.registry.try_decode(&conditioned) {
            Ok(mut code) => {
                Self::populate_metadata(&mut code);
                if code.protocol == ProtocolId::Nec {
                    self.last_nec = Some((code.clone(), now));
                }
                Ok(code)
            }
            // A valid repeat frame with no usable predecessor must not
            // fall through to Raw capture.
            Err(DecodeError::NotSupported) => Err(DecodeError::NotSupported),
            Err(e) => self.retain_raw(conditioned, e),
        }
    }

    /// Feed one capture to learning-mode verification.
    pub fn learn(&mut self, symbols: &[TimingSymbol]) -> Result<LearnProgress, DecodeError> {
        self.learn_at(symbols, Instant::now())
    }

    /// Learning-mode entry with an explicit timestamp.
    pub fn learn_at(
        &mut self,
        symbols: &[TimingSymbol],
        now: Instant,
    ) -> Result<LearnProgress, DecodeError> {
        let code = self.decode_at(symbols, now)?;

        let buffer = match self.learn.take() {
            // Stale buffer: the window has passed, start over.
            Some(buf)
                if now.duration_since(buf.first_at).as_millis()
                    > self.config.verify_window_ms as u128 =>
            {
                tracing::debug!("verification window expired, restarting with new frame");
                None
            }
            other => other,
        };

        match buffer {
            None => {
                self.learn = Some(LearnBuffer { code, first_at: now, frames: 1 });
                Ok(LearnProgress::Pending { frames: 1 })
            }
            Some(mut buf) => {
                if self.codes_match(&buf.code, &code) {
                    buf.frames += 1;
                    if buf.frames >= self.config.min_verify_frames {
                        let mut verified = buf.code;
                        verified.validation = ValidationStatus::from_frames(buf.frames);
                        tracing::info!(
                            protocol = %verified.protocol,
                            frames = buf.frames,
                            "learned code verified"
                        );
                        Ok(LearnProgress::Verified(verified))
                    } else {
                        let frames = buf.frames;
                        self.learn = Some(buf);
                        Ok(LearnProgress::Pending { frames })
                    }
                } else {
                    // Mismatch restarts the buffer with the new frame
                    // rather than failing the episode.
                    tracing::debug!("frame mismatch, verification buffer restarted");
                    self.learn = Some(LearnBuffer { code, first_at: now, frames: 1 });
                    Ok(LearnProgress::Pending { frames: 1 })
                }
            }
        }
    }

    /// Drop any half-finished verification state.
    pub fn reset_learning(&mut self) {
        self.learn = None;
    }

    // ─── Conditioning ───────────────────────────────────────────────────

    fn condition(&self, symbols: &[TimingSymbol]) -> Vec<TimingSymbol> {
        let filtered = self.noise_filter(symbols);
        self.gap_trim(&filtered)
    }

    /// Remove sub-floor glitches. A symbol with one noisy half still
    /// carries a real transition, so its durations are folded into the
    /// neighbouring symbol instead of being dropped: a glitch space
    /// extends the following mark, a glitch mark extends the preceding
    /// space.
    fn noise_filter(&self, symbols: &[TimingSymbol]) -> Vec<TimingSymbol> {
        let floor = self.config.noise_floor_us;
        let mut out: Vec<TimingSymbol> = Vec::with_capacity(symbols.len());
        let mut carry: u32 = 0;

        for sym in symbols {
            let mark = sym.mark_us.saturating_add(carry);
            carry = 0;
            let space = sym.space_us;

            if mark < floor && space < floor {
                if let Some(last) = out.last_mut() {
                    last.space_us += mark + space;
                }
                continue;
            }
            if space < floor {
                carry = mark + space;
                continue;
            }
            if mark < floor {
                if let Some(last) = out.last_mut() {
                    last.space_us += mark + space;
                }
                continue;
            }
            out.push(TimingSymbol::new(mark, space));
        }
        if carry >= floor {
            out.push(TimingSymbol::new(carry, 0));
        }
        out
    }

    /// Keep the span between the first and last symbol whose halves are
    /// both below the idle-gap ceiling; leading and trailing idle goes.
    fn gap_trim(&self, symbols: &[TimingSymbol]) -> Vec<TimingSymbol> {
        let gap = self.config.max_idle_gap_us;
        let in_frame = |s: &TimingSymbol| s.mark_us < gap && s.space_us < gap;
        let first = symbols.iter().position(in_frame);
        let last = symbols.iter().rposition(in_frame);
        match (first, last) {
            (Some(f), Some(l)) if f <= l => symbols[f..=l].to_vec(),
            _ => Vec::new(),
        }
    }

    // ─── Repeat resolution ──────────────────────────────────────────────

    fn resolve_nec_repeat(&mut self, now: Instant) -> Result<DecodedCode, DecodeError> {
        match self.last_nec.take() {
            Some((code, at))
                if now.duration_since(at).as_millis() <= self.config.repeat_window_ms as u128 =>
            {
                let mut repeat = code.clone();
                repeat.flags.set(CodeFlags::REPEAT);
                // A held button keeps the window alive.
                self.last_nec = Some((code, now));
                tracing::debug!("NEC repeat resolved to previous code");
                Ok(repeat)
            }
            _ => {
                tracing::debug!("NEC repeat frame with no code to repeat");
                Err(DecodeError::NotSupported)
            }
        }
    }

    // ─── Raw retention ──────────────────────────────────────────────────

    fn retain_raw(
        &self,
        conditioned: Vec<TimingSymbol>,
        err: DecodeError,
    ) -> Result<DecodedCode, DecodeError> {
        let n = conditioned.len();
        if n < self.config.raw_min_symbols || n > self.config.raw_max_symbols {
            return Err(err);
        }
        tracing::info!(symbols = n, "unrecognized signal retained as raw code");
        let mut code = DecodedCode::empty(ProtocolId::Raw);
        code.raw = Some(conditioned);
        Ok(code)
    }

    // ─── Frame comparison ───────────────────────────────────────────────

    /// Learning-mode frame equality: toggle state is ignored for the
    /// bi-phase protocols (it flips per key press by design) and Raw
    /// codes compare their symbol durations within a percentage band.
    fn codes_match(&self, a: &DecodedCode, b: &DecodedCode) -> bool {
        if a.protocol != b.protocol || a.bits != b.bits {
            return false;
        }
        if a.protocol == ProtocolId::Raw {
            return match (&a.raw, &b.raw) {
                (Some(x), Some(y)) => {
                    x.len() == y.len()
                        && x.iter().zip(y).all(|(s, t)| {
                            matches_tolerance(t.mark_us, s.mark_us, self.config.raw_match_tolerance_pct)
                                && matches_tolerance(
                                    t.space_us,
                                    s.space_us,
                                    self.config.raw_match_tolerance_pct,
                                )
                        })
                }
                _ => false,
            };
        }
        let toggle_mask = match a.protocol {
            ProtocolId::Rc5 => 1u64 << 11,
            ProtocolId::Rc6 => 1u64 << 16,
            _ => 0,
        };
        (a.data & !toggle_mask) == (b.data & !toggle_mask)
    }

    fn populate_metadata(code: &mut DecodedCode) {
        if let Some(c) = constants(code.protocol) {
            code.carrier_hz = c.carrier_hz();
            code.duty_cycle_pct = 33;
            if code.repeat_period_ms == 0 {
                code.repeat_period_ms = c.repeat_period_ms;
            }
        }
    }
}

impl Default for DecodePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, encode_nec_repeat};
    use std::time::Duration;

    /// Route decoder tracing into test output (visible with RUST_LOG set).
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn nec_code(address: u8, command: u8) -> DecodedCode {
        let mut code = DecodedCode::empty(ProtocolId::Nec);
        code.data = (address as u64)
            | ((!address as u64) << 8)
            | ((command as u64) << 16)
            | ((!command as u64) << 24);
        code.bits = 32;
        code
    }

    fn nec_frame(address: u8, command: u8) -> Vec<TimingSymbol> {
        encode(&nec_code(address, command)).unwrap()
    }

    /// A signal that matches no decoder (three space clusters) but is
    /// plausible enough to keep.
    fn unknown_signal() -> Vec<TimingSymbol> {
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
        symbols
    }

    #[test]
    fn decodes_a_clean_capture() {
        init_tracing();
        let mut pipeline = DecodePipeline::new();
        let code = pipeline.decode(&nec_frame(0x00, 0x0C)).unwrap();
        assert_eq!(code.protocol, ProtocolId::Nec);
        assert_eq!(code.address, 0x00);
        assert_eq!(code.command, 0x0C);
        assert_eq!(code.carrier_hz, 38_000);
        assert_eq!(code.repeat_period_ms, 110);
    }

    #[test]
    fn noise_filter_merges_glitches() {
        let mut symbols = nec_frame(0x04, 0x08);
        // Glitch space mid-mark: split one bit mark into 300+40+220.
        let victim = symbols[5];
        symbols[5] = TimingSymbol::new(300, 40);
        symbols.insert(6, TimingSymbol::new(victim.mark_us - 300 - 40, victim.space_us));
        // Glitch mark inside a space further along.
        let victim = symbols[12];
        symbols[12] = TimingSymbol::new(victim.mark_us, 30);
        symbols.insert(13, TimingSymbol::new(50, victim.space_us - 80));

        let mut pipeline = DecodePipeline::new();
        let code = pipeline.decode(&symbols).unwrap();
        assert_eq!(code.protocol, ProtocolId::Nec);
        assert_eq!(code.address, 0x04);
        assert_eq!(code.command, 0x08);
    }

    #[test]
    fn gap_trim_discards_surrounding_idle() {
        let mut symbols = vec![TimingSymbol::new(400, 200_000)];
        symbols.extend(nec_frame(0x04, 0x08));
        symbols.push(TimingSymbol::new(120_000, 90_000));

        let mut pipeline = DecodePipeline::new();
        let code = pipeline.decode(&symbols).unwrap();
        assert_eq!(code.protocol, ProtocolId::Nec);
        assert_eq!(code.command, 0x08);
    }

    #[test]
    fn nec_repeat_resolves_within_window() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        pipeline.decode_at(&nec_frame(0x00, 0x0C), t0).unwrap();

        let repeat = pipeline
            .decode_at(&encode_nec_repeat(), t0 + Duration::from_millis(150))
            .unwrap();
        assert!(repeat.flags.contains(CodeFlags::REPEAT));
        assert_eq!(repeat.address, 0x00);
        assert_eq!(repeat.command, 0x0C);
    }

    #[test]
    fn nec_repeat_outside_window_is_an_error() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        pipeline.decode_at(&nec_frame(0x00, 0x0C), t0).unwrap();
        assert_eq!(
            pipeline.decode_at(&encode_nec_repeat(), t0 + Duration::from_millis(250)),
            Err(DecodeError::NotSupported)
        );
    }

    #[test]
    fn held_button_keeps_the_repeat_window_alive() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        pipeline.decode_at(&nec_frame(0x00, 0x0C), t0).unwrap();
        for i in 1..=5u64 {
            let at = t0 + Duration::from_millis(110 * i);
            let code = pipeline.decode_at(&encode_nec_repeat(), at).unwrap();
            assert!(code.flags.contains(CodeFlags::REPEAT));
        }
    }

    #[test]
    fn repeat_without_predecessor_short_circuits() {
        let mut pipeline = DecodePipeline::new();
        assert_eq!(
            pipeline.decode(&encode_nec_repeat()),
            Err(DecodeError::NotSupported)
        );
    }

    #[test]
    fn three_identical_frames_verify() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        let frame = nec_frame(0x10, 0x21);

        assert_eq!(
            pipeline.learn_at(&frame, t0).unwrap(),
            LearnProgress::Pending { frames: 1 }
        );
        assert_eq!(
            pipeline.learn_at(&frame, t0 + Duration::from_millis(110)).unwrap(),
            LearnProgress::Pending { frames: 2 }
        );
        match pipeline.learn_at(&frame, t0 + Duration::from_millis(220)).unwrap() {
            LearnProgress::Verified(code) => {
                assert_eq!(code.validation, ValidationStatus::ThreeFrames);
                assert_eq!(code.command, 0x21);
            }
            other => panic!("expected verification, got {other:?}"),
        }
    }

    #[test]
    fn mismatch_restarts_the_buffer() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        let a = nec_frame(0x10, 0x21);
        let b = nec_frame(0x10, 0x22);

        // Two matching frames then a mismatch: never accepted in 3 captures.
        pipeline.learn_at(&a, t0).unwrap();
        pipeline.learn_at(&a, t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(
            pipeline.learn_at(&b, t0 + Duration::from_millis(200)).unwrap(),
            LearnProgress::Pending { frames: 1 }
        );
    }

    #[test]
    fn two_frame_verification_is_configurable() {
        let config = CodecConfig { min_verify_frames: 2, ..CodecConfig::default() };
        let mut pipeline = DecodePipeline::with_config(config);
        let t0 = Instant::now();
        let frame = nec_frame(0x01, 0x02);

        pipeline.learn_at(&frame, t0).unwrap();
        match pipeline.learn_at(&frame, t0 + Duration::from_millis(100)).unwrap() {
            LearnProgress::Verified(code) => {
                assert_eq!(code.validation, ValidationStatus::TwoFrames)
            }
            other => panic!("expected verification, got {other:?}"),
        }
    }

    #[test]
    fn stale_window_restarts_verification() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        let frame = nec_frame(0x01, 0x02);

        pipeline.learn_at(&frame, t0).unwrap();
        pipeline.learn_at(&frame, t0 + Duration::from_millis(300)).unwrap();
        // Past the 500 ms window measured from the first frame.
        assert_eq!(
            pipeline.learn_at(&frame, t0 + Duration::from_millis(600)).unwrap(),
            LearnProgress::Pending { frames: 1 }
        );
    }

    #[test]
    fn toggle_flip_does_not_break_rc5_verification() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        let press_a = crate::protocols::rc5_encode_word(crate::protocols::rc5_pack(false, 0x05, 0x35));
        let press_b = crate::protocols::rc5_encode_word(crate::protocols::rc5_pack(true, 0x05, 0x35));

        pipeline.learn_at(&press_a, t0).unwrap();
        pipeline.learn_at(&press_b, t0 + Duration::from_millis(150)).unwrap();
        match pipeline.learn_at(&press_a, t0 + Duration::from_millis(300)).unwrap() {
            LearnProgress::Verified(code) => assert_eq!(code.protocol, ProtocolId::Rc5),
            other => panic!("expected verification, got {other:?}"),
        }
    }

    #[test]
    fn unknown_signal_is_retained_as_raw() {
        let mut pipeline = DecodePipeline::new();
        let code = pipeline.decode(&unknown_signal()).unwrap();
        assert_eq!(code.protocol, ProtocolId::Raw);
        let raw = code.raw.as_ref().unwrap();
        assert_eq!(raw.len(), 22);
    }

    #[test]
    fn tiny_garbage_is_not_retained() {
        let mut pipeline = DecodePipeline::new();
        let symbols = vec![TimingSymbol::new(900, 900); 4];
        assert!(pipeline.decode(&symbols).is_err());
    }

    #[test]
    fn raw_frames_verify_with_duration_tolerance() {
        let mut pipeline = DecodePipeline::new();
        let t0 = Instant::now();
        let a = unknown_signal();
        // Second capture of the same remote, 5% slower.
        let b: Vec<TimingSymbol> = a
            .iter()
            .map(|s| TimingSymbol::new(s.mark_us * 105 / 100, s.space_us * 105 / 100))
            .collect();

        pipeline.learn_at(&a, t0).unwrap();
        pipeline.learn_at(&b, t0 + Duration::from_millis(150)).unwrap();
        match pipeline.learn_at(&a, t0 + Duration::from_millis(300)).unwrap() {
            LearnProgress::Verified(code) => assert_eq!(code.protocol, ProtocolId::Raw),
            other => panic!("expected verification, got {other:?}"),
        }
    }
}
