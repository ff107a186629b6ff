//! Decoder for frames captured from the VAN bus found in PSA vehicles.
//!
//! Frames go into a [`VanDecoder`], which classifies each one with a
//! [`DecodeOutcome`] and, for those that decode, hands back a
//! [`SignalRecord`]. Records are rendered through the [`emit`] module.

pub mod config;
pub mod decoder;
pub mod decoders;
pub mod dedup;
pub mod emit;
pub mod error;
pub mod frame;
pub mod iden;
pub mod messages;
pub mod reassembly;
pub mod record;
pub mod registry;
pub mod units;
pub mod validate;

pub use config::DecoderConfig;
pub use decoder::{DecodeOutcome, DecodeStats, Decoded, VanDecoder};
pub use error::{DecodeError, FrameError};
pub use frame::VanFrame;
pub use record::{Fixed, SignalRecord, Value};
