use thiserror::Error;

use crate::frame::MAX_PAYLOAD_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("identifier 0x{0:X} does not fit in 12 bits")]
    IdenOutOfRange(u16),
    #[error("payload of {0} bytes exceeds the {MAX_PAYLOAD_LEN} byte maximum")]
    PayloadTooLong(usize),
}

/// Failure of a single field decoder. The decoder front-end folds these into
/// a [`DecodeOutcome`](crate::decoder::DecodeOutcome); they never escape
/// [`VanDecoder::decode`](crate::decoder::VanDecoder::decode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A sub-format selected by a discriminator byte has a length other than
    /// the one it requires, even though the outer length check passed.
    #[error("unexpected payload length {len} for 0x{iden:03X}")]
    UnexpectedLength { iden: u16, len: usize },
    /// Identifier and length are known, the byte pattern is not.
    #[error("0x{iden:03X} is recognized but not decoded")]
    ToBeDecoded { iden: u16 },
}
