use std::net::IpAddr;
use std::str::FromStr;

use super::af::{AddrStorage, AddressVersion, Ipv4Address, Ipv6Address};
use super::errors::ValueError;
use super::hash::{wang_hash32, wang_hash64, KeyHash};

//------------ Ipv4Prefix ----------------------------------------------------

/// An IPv4 address with a mask length in `0..=32`.
///
/// Host bits are not cleared: a prefix read from a dump is kept exactly as
/// it was announced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ipv4Prefix {
    address: Ipv4Address,
    mask_len: u8,
}

impl Ipv4Prefix {
    pub fn new(address: Ipv4Address, mask_len: u8) -> Result<Self, ValueError> {
        if mask_len > AddressVersion::Ipv4.bits() {
            return Err(ValueError::PrefixLengthInvalid(mask_len));
        }
        Ok(Self { address, mask_len })
    }

    pub fn address(&self) -> Ipv4Address {
        self.address
    }

    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }
}

impl KeyHash for Ipv4Prefix {
    // The mask length is or-ed into the low bits, so that 10.0.0.0/8 and
    // 10.0.0.0/16 do not collide.
    fn key_hash(&self) -> u64 {
        wang_hash32(self.address.to_u32() | self.mask_len as u32) as u64
    }
}

impl std::hash::Hash for Ipv4Prefix {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.mask_len)
    }
}

//------------ Ipv6Prefix ----------------------------------------------------

/// An IPv6 address with a mask length in `0..=128`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ipv6Prefix {
    address: Ipv6Address,
    mask_len: u8,
}

impl Ipv6Prefix {
    pub fn new(address: Ipv6Address, mask_len: u8) -> Result<Self, ValueError> {
        if mask_len > AddressVersion::Ipv6.bits() {
            return Err(ValueError::PrefixLengthInvalid(mask_len));
        }
        Ok(Self { address, mask_len })
    }

    pub fn address(&self) -> Ipv6Address {
        self.address
    }

    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }
}

impl KeyHash for Ipv6Prefix {
    // Only the most significant 64 bits of the address take part, see
    // `Ipv6Address::high_u64`. Equality still compares all 128.
    fn key_hash(&self) -> u64 {
        wang_hash64(self.address.high_u64() | self.mask_len as u64)
    }
}

impl std::hash::Hash for Ipv6Prefix {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for Ipv6Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.mask_len)
    }
}

//------------ PfxStorage ----------------------------------------------------

/// A prefix of either address family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PfxStorage {
    V4(Ipv4Prefix),
    V6(Ipv6Prefix),
}

impl PfxStorage {
    /// Creates a prefix, checking the mask length against the version of
    /// `address`.
    pub fn new(address: AddrStorage, mask_len: u8) -> Result<Self, ValueError> {
        match address {
            AddrStorage::V4(addr) => {
                Ipv4Prefix::new(addr, mask_len).map(PfxStorage::V4)
            }
            AddrStorage::V6(addr) => {
                Ipv6Prefix::new(addr, mask_len).map(PfxStorage::V6)
            }
        }
    }

    pub fn version(&self) -> AddressVersion {
        match self {
            PfxStorage::V4(_) => AddressVersion::Ipv4,
            PfxStorage::V6(_) => AddressVersion::Ipv6,
        }
    }

    pub fn address(&self) -> AddrStorage {
        match self {
            PfxStorage::V4(pfx) => AddrStorage::V4(pfx.address),
            PfxStorage::V6(pfx) => AddrStorage::V6(pfx.address),
        }
    }

    pub fn mask_len(&self) -> u8 {
        match self {
            PfxStorage::V4(pfx) => pfx.mask_len,
            PfxStorage::V6(pfx) => pfx.mask_len,
        }
    }

    pub fn as_ipv4(&self) -> Option<&Ipv4Prefix> {
        match self {
            PfxStorage::V4(pfx) => Some(pfx),
            PfxStorage::V6(_) => None,
        }
    }

    pub fn as_ipv6(&self) -> Option<&Ipv6Prefix> {
        match self {
            PfxStorage::V6(pfx) => Some(pfx),
            PfxStorage::V4(_) => None,
        }
    }

    /// Narrows to an IPv4 prefix.
    ///
    /// # Panics
    ///
    /// Panics if this is an IPv6 prefix.
    #[allow(clippy::panic)]
    pub fn expect_ipv4(self) -> Ipv4Prefix {
        match self {
            PfxStorage::V4(pfx) => pfx,
            PfxStorage::V6(pfx) => panic!("prefix {} narrowed to IPv4", pfx),
        }
    }

    /// Narrows to an IPv6 prefix.
    ///
    /// # Panics
    ///
    /// Panics if this is an IPv4 prefix.
    #[allow(clippy::panic)]
    pub fn expect_ipv6(self) -> Ipv6Prefix {
        match self {
            PfxStorage::V6(pfx) => pfx,
            PfxStorage::V4(pfx) => panic!("prefix {} narrowed to IPv6", pfx),
        }
    }
}

impl From<Ipv4Prefix> for PfxStorage {
    fn from(value: Ipv4Prefix) -> Self {
        PfxStorage::V4(value)
    }
}

impl From<Ipv6Prefix> for PfxStorage {
    fn from(value: Ipv6Prefix) -> Self {
        PfxStorage::V6(value)
    }
}

impl KeyHash for PfxStorage {
    fn key_hash(&self) -> u64 {
        match self {
            PfxStorage::V4(pfx) => pfx.key_hash(),
            PfxStorage::V6(pfx) => pfx.key_hash(),
        }
    }
}

impl std::hash::Hash for PfxStorage {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for PfxStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PfxStorage::V4(pfx) => write!(f, "{}", pfx),
            PfxStorage::V6(pfx) => write!(f, "{}", pfx),
        }
    }
}

/// Parses `address/len`. Host bits may be set.
impl FromStr for PfxStorage {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidPrefix(s.to_string());
        let (addr, len) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr = IpAddr::from_str(addr).map_err(|_| invalid())?;
        let len = u8::from_str(len).map_err(|_| invalid())?;
        PfxStorage::new(addr.into(), len)
    }
}

// inetnum's Prefix is always a valid prefix, so this cannot fail.
impl From<inetnum::addr::Prefix> for PfxStorage {
    fn from(value: inetnum::addr::Prefix) -> Self {
        match AddrStorage::from(value.addr()) {
            AddrStorage::V4(address) => PfxStorage::V4(Ipv4Prefix {
                address,
                mask_len: value.len(),
            }),
            AddrStorage::V6(address) => PfxStorage::V6(Ipv6Prefix {
                address,
                mask_len: value.len(),
            }),
        }
    }
}

/// Fails if host bits are set, since inetnum does not allow those.
impl TryFrom<PfxStorage> for inetnum::addr::Prefix {
    type Error = ValueError;

    fn try_from(value: PfxStorage) -> Result<Self, Self::Error> {
        inetnum::addr::Prefix::new(value.address().into(), value.mask_len())
            .map_err(|_| ValueError::InvalidPrefix(value.to_string()))
    }
}
