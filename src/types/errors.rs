use std::fmt;

//------------ ValueError ----------------------------------------------------

/// Errors returned while constructing or parsing the canonical BGP value
/// types (addresses, prefixes, AS numbers and AS paths).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The mask length is out of range for the address family of the
    /// prefix, i.e. larger than 32 for IPv4, or larger than 128 for IPv6.
    PrefixLengthInvalid(u8),
    /// The string could not be parsed as an IP prefix.
    InvalidPrefix(String),
    /// The string could not be parsed as an AS number.
    InvalidAsNumber(String),
}

impl std::error::Error for ValueError {}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueError::PrefixLengthInvalid(len) => write!(
                f,
                "Error: The prefix length {} is invalid for its address \
                family.",
                len
            ),
            ValueError::InvalidPrefix(s) => {
                write!(f, "Error: Cannot parse '{}' as a prefix.", s)
            }
            ValueError::InvalidAsNumber(s) => {
                write!(f, "Error: Cannot parse '{}' as an AS number.", s)
            }
        }
    }
}
