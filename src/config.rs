#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime knobs of a [`VanDecoder`](crate::decoder::VanDecoder). The
/// identifier table itself is compiled in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DecoderConfig {
    /// Drop frames whose payload repeats recent state of the same identifier.
    pub suppress_duplicates: bool,
    /// Upper bound on the text collected for one multi-frame report.
    pub max_report_len: usize,
    /// Highest sequence counter that opens a new multi-frame report.
    pub first_fragment_max: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            suppress_duplicates: true,
            max_report_len: 2048,
            first_fragment_max: 0x07,
        }
    }
}

impl DecoderConfig {
    pub fn with_duplicates(mut self) -> Self {
        self.suppress_duplicates = false;
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: DecoderConfig = serde_json::from_str(r#"{"max_report_len": 512}"#).unwrap();
        assert_eq!(c.max_report_len, 512);
        assert!(c.suppress_duplicates);
        assert_eq!(c.first_fragment_max, 0x07);
    }
}
