pub(crate) mod af;
pub(crate) mod as_number;
pub(crate) mod as_path;
pub(crate) mod prefix;

pub mod errors;
pub mod hash;

pub use af::{AddrStorage, AddressVersion, Ipv4Address, Ipv6Address};
pub use as_number::AsNumber;
pub use as_path::AsPath;
pub use prefix::{Ipv4Prefix, Ipv6Prefix, PfxStorage};
