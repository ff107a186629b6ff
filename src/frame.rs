use core::fmt;

use crate::error::FrameError;

pub const MAX_IDEN: u16 = 0x0FFF;
pub const MAX_PAYLOAD_LEN: usize = 28;

/// One bus transmission as handed over by the receiver: identifier, payload
/// and the verdict of the receiver's checksum check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VanFrame {
    iden: u16,
    len: u8,
    data: [u8; MAX_PAYLOAD_LEN],
    checksum_ok: bool,
}

impl VanFrame {
    pub fn new(iden: u16, payload: &[u8], checksum_ok: bool) -> Result<Self, FrameError> {
        if iden > MAX_IDEN {
            return Err(FrameError::IdenOutOfRange(iden));
        }
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            iden,
            len: payload.len() as u8,
            data,
            checksum_ok,
        })
    }

    pub fn iden(&self) -> u16 {
        self.iden
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn checksum_ok(&self) -> bool {
        self.checksum_ok
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

/// Space separated upper-case hex, as used in diagnostic dumps.
pub struct HexSlice<'a>(pub &'a [u8]);

impl fmt::Display for HexSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for VanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03X} ({}) [{}]{}",
            self.iden,
            self.len,
            HexSlice(self.bytes()),
            if self.checksum_ok { "" } else { " CRC_ERROR" }
        )
    }
}
