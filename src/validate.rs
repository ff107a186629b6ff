use crate::decoder::DecodeOutcome;
use crate::frame::VanFrame;
use crate::registry::IdenDescriptor;

/// Shape check run before any field decode: checksum flag first, then
/// membership of the payload length in the accepted set.
pub fn validate(frame: &VanFrame, descriptor: &IdenDescriptor) -> Result<(), DecodeOutcome> {
    if !frame.checksum_ok() {
        return Err(DecodeOutcome::ChecksumError);
    }
    if !descriptor.lengths.accepts(frame.len()) {
        return Err(DecodeOutcome::UnexpectedLength);
    }
    Ok(())
}
