//! Diagnostic Trouble Code decoding

use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic trouble code such as `P0133`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dtc {
    code: String,
}

impl Dtc {
    /// Wrap an already formatted code
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Decode a two-byte Mode 03 pair, `None` for the `00 00` padding pair
    pub fn from_bytes(a: u8, b: u8) -> Option<Self> {
        if a == 0 && b == 0 {
            return None;
        }

        let system = match a >> 6 {
            0 => 'P',
            1 => 'C',
            2 => 'B',
            _ => 'U',
        };
        Some(Self {
            code: format!("{}{}{:X}{:02X}", system, (a >> 4) & 0x03, a & 0x0F, b),
        })
    }

    /// Decode the data bytes of a Mode 03 response (after the `43` header)
    ///
    /// CAN adapters prefix the pairs with a count byte, which shows up as an
    /// odd payload length.
    pub fn decode_payload(bytes: &[u8]) -> Vec<Dtc> {
        let pairs = if bytes.len() % 2 == 1 {
            &bytes[1..]
        } else {
            bytes
        };

        pairs
            .chunks_exact(2)
            .filter_map(|pair| Self::from_bytes(pair[0], pair[1]))
            .collect()
    }

    /// The code text
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Dtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
