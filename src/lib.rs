//! ircodec — infrared remote-control protocol codec.
//!
//! Turns sequences of raw mark/space pulse durations into structured
//! commands (protocol, address, command, flags) and back. The crate is
//! the protocol engine only: hardware capture/transmit, persistent
//! storage and parameter mapping are external collaborators specified at
//! their interfaces ([`TimingSymbol`] sequences in and out, JSON
//! [`record::LearnedCodeRecord`]s at the storage boundary, [`ac::AcState`]
//! at the parameter boundary).
//!
//! Receive path: [`pipeline::DecodePipeline`] conditions a capture (noise
//! filter, gap trim), dispatches it through the tiered
//! [`protocols::DecoderRegistry`], resolves NEC repeat frames against its
//! own bounded-window state, and — in learning mode — verifies codes over
//! multiple frames before they are trusted. Unknown-but-plausible signals
//! survive as `Raw` codes.
//!
//! Transmit path: [`encode::encode`] regenerates symbol sequences from
//! codes; [`ac::encode_state`] builds complete per-brand AC frames from a
//! canonical state record, checksums included.
//!
//! ```
//! use ircodec::pipeline::DecodePipeline;
//! use ircodec::code::{DecodedCode, ProtocolId};
//! use ircodec::encode;
//!
//! // A stored NEC code: address 0x00, command 0x0C.
//! let mut code = DecodedCode::empty(ProtocolId::Nec);
//! code.data = 0xF30C_FF00;
//! code.bits = 32;
//!
//! let symbols = encode::encode(&code).unwrap();
//! let mut pipeline = DecodePipeline::new();
//! let decoded = pipeline.decode(&symbols).unwrap();
//! assert_eq!(decoded.command, 0x0C);
//! ```

pub mod ac;
pub mod code;
pub mod config;
pub mod constants;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod protocols;
pub mod record;
pub mod timing;

pub use ac::{AcMode, AcRemote, AcState, EncodedFrame, FanSpeed, Swing};
pub use code::{CodeFlags, DecodedCode, ProtocolId, TimingSymbol, ValidationStatus};
pub use config::CodecConfig;
pub use error::{DecodeError, EncodeError};
pub use pipeline::{DecodePipeline, LearnProgress};
pub use record::LearnedCodeRecord;
