use std::fmt;

use super::config::DataInterfaceId;

//------------ ConfigError ---------------------------------------------------

/// Errors returned while configuring a data interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An integer option received a value that is not a number. The option
    /// has been set to 0 regardless, the error only informs the caller.
    InvalidInteger { option: &'static str, value: String },
    /// No data interface with this name exists.
    UnknownDataInterface(String),
    /// The data interface has no option with this name.
    UnknownOption {
        data_interface: DataInterfaceId,
        name: String,
    },
    /// The configuration could not be deserialized.
    Parse(String),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidInteger { option, value } => write!(
                f,
                "Error: Option '{}' expects an integer, got '{}' (stored \
                as 0).",
                option, value
            ),
            ConfigError::UnknownDataInterface(name) => {
                write!(f, "Error: Unknown data interface '{}'.", name)
            }
            ConfigError::UnknownOption {
                data_interface,
                name,
            } => write!(
                f,
                "Error: Data interface '{}' has no option '{}'.",
                data_interface, name
            ),
            ConfigError::Parse(msg) => {
                write!(f, "Error: Cannot parse configuration: {}", msg)
            }
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

//------------ DataInterfaceError --------------------------------------------

/// Errors returned by a data interface (backend), either while it is being
/// created, or while it is looking for new resources.
#[derive(Debug)]
pub enum DataInterfaceError {
    /// The backend is not compiled into this build, and no factory that
    /// knows how to create it was supplied.
    Unavailable(DataInterfaceId),
    /// A mandatory option for the backend was not set.
    MissingOption {
        data_interface: DataInterfaceId,
        option: &'static str,
    },
    /// The manager has no active backend: it was never initialized, it
    /// failed to initialize, or it was closed.
    NotActive,
    /// Reading from the source of the backend failed.
    Io(std::io::Error),
    /// The source returned data the backend cannot make sense of.
    Malformed(String),
    /// The broker returned an error, or could not be reached.
    Broker(String),
}

impl std::error::Error for DataInterfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataInterfaceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for DataInterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataInterfaceError::Unavailable(id) => write!(
                f,
                "Error: Data interface '{}' is not available in this build.",
                id
            ),
            DataInterfaceError::MissingOption {
                data_interface,
                option,
            } => write!(
                f,
                "Error: Data interface '{}' requires option '{}'.",
                data_interface, option
            ),
            DataInterfaceError::NotActive => {
                write!(f, "Error: No data interface is active.")
            }
            DataInterfaceError::Io(err) => {
                write!(f, "Error: I/O error in data interface: {}", err)
            }
            DataInterfaceError::Malformed(msg) => {
                write!(f, "Error: Malformed data from source: {}", msg)
            }
            DataInterfaceError::Broker(msg) => {
                write!(f, "Error: Broker query failed: {}", msg)
            }
        }
    }
}

impl From<std::io::Error> for DataInterfaceError {
    fn from(value: std::io::Error) -> Self {
        DataInterfaceError::Io(value)
    }
}

impl From<csv::Error> for DataInterfaceError {
    fn from(value: csv::Error) -> Self {
        if !value.is_io_error() {
            return DataInterfaceError::Malformed(value.to_string());
        }
        match value.into_kind() {
            csv::ErrorKind::Io(err) => DataInterfaceError::Io(err),
            kind => DataInterfaceError::Malformed(format!("{:?}", kind)),
        }
    }
}
