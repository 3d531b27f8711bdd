use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::trace;
use zerocopy::{FromBytes, NetworkEndian, U128, U32};

use super::hash::{wang_hash32, wang_hash64, KeyHash};

/// Exactly fitting IPv4 bytes (4 octets), in network order.
pub type IPv4 = U32<NetworkEndian>;

/// Exactly fitting IPv6 bytes (16 octets), in network order.
pub type IPv6 = U128<NetworkEndian>;

//------------ AddressVersion ------------------------------------------------

/// The version tag of an IP address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressVersion {
    Ipv4,
    Ipv6,
}

impl AddressVersion {
    /// The number of bits in an address of this version, which is also the
    /// maximum mask length of a prefix of this version.
    pub const fn bits(self) -> u8 {
        match self {
            AddressVersion::Ipv4 => 32,
            AddressVersion::Ipv6 => 128,
        }
    }
}

impl std::fmt::Display for AddressVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressVersion::Ipv4 => f.write_str("IPv4"),
            AddressVersion::Ipv6 => f.write_str("IPv6"),
        }
    }
}

//-------------- Ipv4Address -------------------------------------------------

/// An IPv4 address, stored as its four network-order octets.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    zerocopy::FromBytes,
    zerocopy::IntoBytes,
    zerocopy::KnownLayout,
    zerocopy::Immutable,
    zerocopy::Unaligned,
)]
#[repr(transparent)]
pub struct Ipv4Address(IPv4);

impl Ipv4Address {
    pub const fn version(&self) -> AddressVersion {
        AddressVersion::Ipv4
    }

    pub fn from_octets(octets: [u8; 4]) -> Self {
        Self(IPv4::from(octets))
    }

    /// Reads an address from the first four bytes of a raw network-order
    /// buffer, e.g. a field in an MRT record. Returns `None` if the buffer
    /// is too short.
    pub fn from_network_bytes(bytes: &[u8]) -> Option<Self> {
        let (addr, _) = Self::read_from_prefix(bytes).ok()?;
        Some(addr)
    }

    /// The address as an integer, most significant octet first.
    pub fn to_u32(self) -> u32 {
        self.0.get()
    }

    pub fn octets(self) -> [u8; 4] {
        self.to_u32().to_be_bytes()
    }
}

impl From<u32> for Ipv4Address {
    fn from(value: u32) -> Self {
        Self(IPv4::new(value))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(value: Ipv4Addr) -> Self {
        Self::from_octets(value.octets())
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(value: Ipv4Address) -> Self {
        Ipv4Addr::from(value.octets())
    }
}

impl KeyHash for Ipv4Address {
    fn key_hash(&self) -> u64 {
        wang_hash32(self.to_u32()) as u64
    }
}

impl std::hash::Hash for Ipv4Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Ipv4Addr::from(*self))
    }
}

//-------------- Ipv6Address -------------------------------------------------

/// An IPv6 address, stored as its sixteen network-order octets.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    zerocopy::FromBytes,
    zerocopy::IntoBytes,
    zerocopy::KnownLayout,
    zerocopy::Immutable,
    zerocopy::Unaligned,
)]
#[repr(transparent)]
pub struct Ipv6Address(IPv6);

impl Ipv6Address {
    pub const fn version(&self) -> AddressVersion {
        AddressVersion::Ipv6
    }

    pub fn from_octets(octets: [u8; 16]) -> Self {
        Self(IPv6::from(octets))
    }

    /// Reads an address from the first sixteen bytes of a raw network-order
    /// buffer. Returns `None` if the buffer is too short.
    pub fn from_network_bytes(bytes: &[u8]) -> Option<Self> {
        let (addr, _) = Self::read_from_prefix(bytes).ok()?;
        Some(addr)
    }

    pub fn to_u128(self) -> u128 {
        self.0.get()
    }

    pub fn octets(self) -> [u8; 16] {
        self.to_u128().to_be_bytes()
    }

    /// The first eight octets of the address as an integer. For routing
    /// prefixes this is where nearly all the entropy lives, so hashing uses
    /// only these.
    pub fn high_u64(self) -> u64 {
        (self.to_u128() >> 64) as u64
    }
}

impl From<u128> for Ipv6Address {
    fn from(value: u128) -> Self {
        Self(IPv6::new(value))
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(value: Ipv6Addr) -> Self {
        Self::from_octets(value.octets())
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(value: Ipv6Address) -> Self {
        Ipv6Addr::from(value.octets())
    }
}

impl KeyHash for Ipv6Address {
    fn key_hash(&self) -> u64 {
        wang_hash64(self.high_u64())
    }
}

impl std::hash::Hash for Ipv6Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Ipv6Addr::from(*self))
    }
}

//------------ AddrStorage ---------------------------------------------------

/// An IP address of either version.
///
/// Code that handles both address families passes these around, and
/// narrows them to [`Ipv4Address`] or [`Ipv6Address`] where it knows the
/// version. Narrowing to the wrong version is a bug in the caller: the
/// `as_*` methods return `None` for it, the `expect_*` methods panic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddrStorage {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl AddrStorage {
    pub fn version(&self) -> AddressVersion {
        match self {
            AddrStorage::V4(_) => AddressVersion::Ipv4,
            AddrStorage::V6(_) => AddressVersion::Ipv6,
        }
    }

    pub fn as_ipv4(&self) -> Option<&Ipv4Address> {
        match self {
            AddrStorage::V4(addr) => Some(addr),
            AddrStorage::V6(_) => None,
        }
    }

    pub fn as_ipv6(&self) -> Option<&Ipv6Address> {
        match self {
            AddrStorage::V6(addr) => Some(addr),
            AddrStorage::V4(_) => None,
        }
    }

    /// Narrows to an IPv4 address.
    ///
    /// # Panics
    ///
    /// Panics if this is an IPv6 address.
    #[allow(clippy::panic)]
    pub fn expect_ipv4(self) -> Ipv4Address {
        match self {
            AddrStorage::V4(addr) => addr,
            AddrStorage::V6(addr) => {
                panic!("address {} narrowed to IPv4", addr)
            }
        }
    }

    /// Narrows to an IPv6 address.
    ///
    /// # Panics
    ///
    /// Panics if this is an IPv4 address.
    #[allow(clippy::panic)]
    pub fn expect_ipv6(self) -> Ipv6Address {
        match self {
            AddrStorage::V6(addr) => addr,
            AddrStorage::V4(addr) => {
                panic!("address {} narrowed to IPv6", addr)
            }
        }
    }
}

impl From<Ipv4Address> for AddrStorage {
    fn from(value: Ipv4Address) -> Self {
        AddrStorage::V4(value)
    }
}

impl From<Ipv6Address> for AddrStorage {
    fn from(value: Ipv6Address) -> Self {
        AddrStorage::V6(value)
    }
}

impl From<IpAddr> for AddrStorage {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(addr) => AddrStorage::V4(addr.into()),
            IpAddr::V6(addr) => AddrStorage::V6(addr.into()),
        }
    }
}

impl From<AddrStorage> for IpAddr {
    fn from(value: AddrStorage) -> Self {
        match value {
            AddrStorage::V4(addr) => IpAddr::V4(addr.into()),
            AddrStorage::V6(addr) => IpAddr::V6(addr.into()),
        }
    }
}

impl TryFrom<AddrStorage> for Ipv4Address {
    type Error = AddressVersion;

    fn try_from(value: AddrStorage) -> Result<Self, Self::Error> {
        trace!("narrow {} to IPv4", value);
        value.as_ipv4().copied().ok_or(value.version())
    }
}

impl TryFrom<AddrStorage> for Ipv6Address {
    type Error = AddressVersion;

    fn try_from(value: AddrStorage) -> Result<Self, Self::Error> {
        trace!("narrow {} to IPv6", value);
        value.as_ipv6().copied().ok_or(value.version())
    }
}

impl KeyHash for AddrStorage {
    fn key_hash(&self) -> u64 {
        match self {
            AddrStorage::V4(addr) => addr.key_hash(),
            AddrStorage::V6(addr) => addr.key_hash(),
        }
    }
}

impl std::hash::Hash for AddrStorage {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.key_hash())
    }
}

impl std::fmt::Display for AddrStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddrStorage::V4(addr) => write!(f, "{}", addr),
            AddrStorage::V6(addr) => write!(f, "{}", addr),
        }
    }
}
