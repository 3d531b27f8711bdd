#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! The acquisition front-end of a BGP stream processor.
//!
//! This crate finds out which routing data (RIB dumps and update streams
//! in MRT format) is available, and defines the BGP values that the rest
//! of the pipeline uses as hash table keys.
//!
//! The two main parts are firstly the [`DataSourceManager`], that polls one
//! of several interchangeable backends ("data interfaces": a CSV manifest,
//! a single file, the broker service, or a database plugged in by the
//! caller) and turns whatever is new into [`Resource`]s in an
//! [`InputQueue`]. Secondly, the value types in [`values`]: IPv4 and IPv6
//! addresses and prefixes, AS numbers and AS paths, each with an equality
//! and a (pre-mixed) hash that agree with each other.
//!
//! [`DataSourceManager`]: datasource::DataSourceManager
//! [`Resource`]: resource::Resource
//! [`InputQueue`]: input::InputQueue

mod types;

/// Selecting, configuring and polling data interfaces
pub mod datasource;

/// Filters that narrow down which resources are queued
pub mod filter;

/// The queue of discovered resources
pub mod input;

/// Descriptions of routing data units
pub mod resource;

/// Error types returned by the value types and the data interfaces
pub mod errors {
    pub use crate::datasource::{ConfigError, DataInterfaceError};
    pub use crate::types::errors::ValueError;
}

/// Integer mixers, and hash tables keyed on the value types
pub use types::hash;

/// Addresses, prefixes, AS numbers and AS paths
pub mod values {
    pub use crate::types::{
        AddrStorage, AddressVersion, AsNumber, AsPath, Ipv4Address,
        Ipv4Prefix, Ipv6Address, Ipv6Prefix, PfxStorage,
    };
}

pub use types::af::{IPv4, IPv6};
pub use types::hash::KeyHash;
