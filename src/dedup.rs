use std::collections::HashMap;

use crate::frame::MAX_PAYLOAD_LEN;
use crate::registry::DedupPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Payload {
    len: u8,
    data: [u8; MAX_PAYLOAD_LEN],
}

impl Payload {
    fn new(bytes: &[u8]) -> Self {
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        Self {
            len: bytes.len() as u8,
            data,
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    fn matches(&self, other: &[u8], ignore: Option<(usize, u8)>) -> bool {
        let mine = self.bytes();
        if mine.len() != other.len() {
            return false;
        }
        match ignore {
            None => mine == other,
            Some((at, mask)) => mine
                .iter()
                .zip(other)
                .enumerate()
                .all(|(i, (a, b))| if i == at { a & !mask == b & !mask } else { a == b }),
        }
    }
}

/// Last one or two payloads seen for one identifier.
#[derive(Debug, Clone, Default)]
struct History {
    slots: [Option<Payload>; 2],
}

/// Per-identifier payload history used to drop re-broadcasts of unchanged
/// state.
#[derive(Debug, Default)]
pub struct DuplicateCache {
    entries: HashMap<u16, History>,
}

impl DuplicateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `payload` repeats recent state of `iden` under
    /// `policy`, and records it when it does not.
    pub fn is_duplicate(&mut self, iden: u16, payload: &[u8], policy: DedupPolicy) -> bool {
        let ignore = match policy {
            DedupPolicy::Never => return false,
            DedupPolicy::Masked { byte, ignore } => Some((byte, ignore)),
            DedupPolicy::Single | DedupPolicy::Toggle => None,
        };
        let history = self.entries.entry(iden).or_default();
        let depth = if policy == DedupPolicy::Toggle { 2 } else { 1 };

        let seen = history.slots[..depth]
            .iter()
            .flatten()
            .any(|p| p.matches(payload, ignore));
        if seen {
            return true;
        }

        if depth == 2 {
            history.slots[1] = history.slots[0];
        }
        history.slots[0] = Some(Payload::new(payload));
        false
    }

    /// Forget the payloads seen on every identifier.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot() {
        let mut c = DuplicateCache::new();
        assert!(!c.is_duplicate(0x824, &[1, 2], DedupPolicy::Single));
        assert!(c.is_duplicate(0x824, &[1, 2], DedupPolicy::Single));
        assert!(!c.is_duplicate(0x824, &[1, 3], DedupPolicy::Single));
        assert!(!c.is_duplicate(0x824, &[1, 2], DedupPolicy::Single));
    }

    #[test]
    fn identifiers_are_independent() {
        let mut c = DuplicateCache::new();
        assert!(!c.is_duplicate(0x824, &[1], DedupPolicy::Single));
        assert!(!c.is_duplicate(0x8A4, &[1], DedupPolicy::Single));
    }

    #[test]
    fn toggle_tolerates_alternation() {
        let mut c = DuplicateCache::new();
        let (a, b, x) = ([0x10u8], [0x11u8], [0x12u8]);
        assert!(!c.is_duplicate(1, &a, DedupPolicy::Toggle));
        assert!(!c.is_duplicate(1, &b, DedupPolicy::Toggle));
        assert!(c.is_duplicate(1, &a, DedupPolicy::Toggle));
        assert!(c.is_duplicate(1, &b, DedupPolicy::Toggle));
        // x pushes a out of the history
        assert!(!c.is_duplicate(1, &x, DedupPolicy::Toggle));
        assert!(c.is_duplicate(1, &b, DedupPolicy::Toggle));
        assert!(!c.is_duplicate(1, &a, DedupPolicy::Toggle));
    }

    #[test]
    fn masked_counter_is_ignored() {
        let mut c = DuplicateCache::new();
        let policy = DedupPolicy::Masked { byte: 0, ignore: 0x0F };
        assert!(!c.is_duplicate(0x564, &[0x01, 0xAA], policy));
        assert!(c.is_duplicate(0x564, &[0x02, 0xAA], policy));
        assert!(!c.is_duplicate(0x564, &[0x12, 0xAA], policy));
        assert!(!c.is_duplicate(0x564, &[0x13, 0xAB], policy));
    }

    #[test]
    fn length_change_is_not_duplicate() {
        let mut c = DuplicateCache::new();
        assert!(!c.is_duplicate(1, &[1, 2], DedupPolicy::Single));
        assert!(!c.is_duplicate(1, &[1, 2, 0], DedupPolicy::Single));
    }

    #[test]
    fn never_policy() {
        let mut c = DuplicateCache::new();
        assert!(!c.is_duplicate(1, &[1], DedupPolicy::Never));
        assert!(!c.is_duplicate(1, &[1], DedupPolicy::Never));
    }

    #[test]
    fn clear_forgets_every_identifier() {
        let mut c = DuplicateCache::new();
        assert!(!c.is_duplicate(0x824, &[1, 2], DedupPolicy::Single));
        assert!(!c.is_duplicate(0x8A4, &[3], DedupPolicy::Toggle));
        c.clear();
        assert!(!c.is_duplicate(0x824, &[1, 2], DedupPolicy::Single));
        assert!(!c.is_duplicate(0x8A4, &[3], DedupPolicy::Toggle));
    }
}
