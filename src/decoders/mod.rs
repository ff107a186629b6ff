//! Per-identifier field decoders. Each one is a pure function of the payload
//! and assumes the outer length check already passed.

pub mod audio;
pub mod body;
pub mod climate;
pub mod mfd;
pub mod satnav;

use crate::error::DecodeError;
use crate::record::SignalRecord;

/// One layout of an identifier that branches on a discriminator byte.
pub(crate) struct SubFormat {
    pub tag: u8,
    pub lengths: &'static [usize],
    pub decode: fn(&[u8]) -> Result<SignalRecord, DecodeError>,
}

/// Pick the sub-format for `tag` and check its own length requirement.
pub(crate) fn dispatch(
    iden: u16,
    tag: u8,
    data: &[u8],
    table: &[SubFormat],
) -> Result<SignalRecord, DecodeError> {
    let sub = table
        .iter()
        .find(|s| s.tag == tag)
        .ok_or(DecodeError::ToBeDecoded { iden })?;
    if !sub.lengths.contains(&data.len()) {
        return Err(DecodeError::UnexpectedLength {
            iden,
            len: data.len(),
        });
    }
    (sub.decode)(data)
}
