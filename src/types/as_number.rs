use std::str::FromStr;

use super::errors::ValueError;
use super::hash::{wang_hash32, KeyHash};

//------------ AsNumber ------------------------------------------------------

/// An autonomous system as it appears in a route: a plain 32-bit number, or
/// a textual label for hops that are not a single AS (AS-sets,
/// confederation segments).
///
/// A numeric and a textual AS never compare equal, even when they print
/// the same.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum AsNumber {
    Numeric(u32),
    String(String),
    /// No AS, or an AS that has been released.
    #[default]
    Unknown,
}

impl AsNumber {
    pub fn is_numeric(&self) -> bool {
        matches!(self, AsNumber::Numeric(_))
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AsNumber::Numeric(asn) => Some(*asn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AsNumber::String(s) => Some(s),
            _ => None,
        }
    }

    /// Drops the label of a textual AS and marks it `Unknown`. Releasing
    /// an `Unknown` (or numeric) AS does nothing, so this can be called any
    /// number of times.
    pub fn release(&mut self) {
        if let AsNumber::String(_) = self {
            *self = AsNumber::Unknown;
        }
    }
}

impl KeyHash for AsNumber {
    // A textual AS hashes on its first four bytes only, and anything
    // shorter than that hashes as 0. Short labels collide.
    fn key_hash(&self) -> u64 {
        let h = match self {
            AsNumber::Numeric(asn) => *asn,
            AsNumber::String(s) => match s.as_bytes().first_chunk::<4>() {
                Some(head) => u32::from_le_bytes(*head),
                None => 0,
            },
            AsNumber::Unknown => 0,
        };
        wang_hash32(h) as u64
    }
}

impl std::hash::Hash for AsNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for AsNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsNumber::Numeric(asn) => write!(f, "{}", asn),
            AsNumber::String(s) => f.write_str(s),
            AsNumber::Unknown => Ok(()),
        }
    }
}

impl From<u32> for AsNumber {
    fn from(value: u32) -> Self {
        AsNumber::Numeric(value)
    }
}

impl From<inetnum::asn::Asn> for AsNumber {
    fn from(value: inetnum::asn::Asn) -> Self {
        AsNumber::Numeric(value.into_u32())
    }
}

/// Anything that parses as a `u32` becomes a numeric AS, any other
/// non-empty string a textual one.
impl FromStr for AsNumber {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValueError::InvalidAsNumber(s.to_string()));
        }
        Ok(match u32::from_str(s) {
            Ok(asn) => AsNumber::Numeric(asn),
            Err(_) => AsNumber::String(s.to_string()),
        })
    }
}
