use log::{debug, warn};

use crate::errors::DataInterfaceError;
use crate::filter::FilterManager;
use crate::input::InputQueue;

use super::config::{DataInterfaceConfig, DataInterfaceId};
use super::csvfile::CsvFileDataInterface;
use super::singlefile::SingleFileDataInterface;

//------------ DataInterface (trait) -----------------------------------------

/// A backend that discovers resources.
///
/// Dropping the backend releases whatever it holds (connections, open
/// files).
pub trait DataInterface: Send {
    /// Looks for resources that were not handed out before, and pushes the
    /// ones that pass the filters into `queue`.
    ///
    /// Returns the number of resources queued. `Ok(0)` means nothing new
    /// was found, which is not an error: the source may simply not have
    /// new data yet.
    fn update_input_queue(
        &mut self,
        queue: &mut InputQueue,
    ) -> Result<usize, DataInterfaceError>;
}

//------------ DataInterfaceFactory (trait) ----------------------------------

/// Builds the backend for a data interface from its configuration.
///
/// The manager passes the configuration by reference; a backend copies
/// whatever it needs to keep.
pub trait DataInterfaceFactory: Send {
    fn create(
        &self,
        id: DataInterfaceId,
        filter: &FilterManager,
        config: &DataInterfaceConfig,
    ) -> Result<Box<dyn DataInterface>, DataInterfaceError>;
}

//------------ BuiltinFactory ------------------------------------------------

/// Creates the backends that are built into this crate: `singlefile`,
/// `csvfile` and, with the `broker` feature, `broker`.
///
/// The database backends (`mysql`, `sqlite`) need a client library this
/// crate does not depend on. Use a custom [`DataInterfaceFactory`] that
/// falls back to this one to plug them in.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuiltinFactory;

impl DataInterfaceFactory for BuiltinFactory {
    fn create(
        &self,
        id: DataInterfaceId,
        filter: &FilterManager,
        config: &DataInterfaceConfig,
    ) -> Result<Box<dyn DataInterface>, DataInterfaceError> {
        debug!("create data interface {}", id);
        match id {
            DataInterfaceId::SingleFile => Ok(Box::new(
                SingleFileDataInterface::new(filter, &config.singlefile)?,
            )),
            DataInterfaceId::CsvFile => Ok(Box::new(
                CsvFileDataInterface::new(filter, &config.csvfile)?,
            )),
            #[cfg(feature = "broker")]
            DataInterfaceId::Broker => Ok(Box::new(
                super::broker::BrokerDataInterface::new(filter, &config.broker)?,
            )),
            _ => {
                warn!("data interface {} is not built in", id);
                Err(DataInterfaceError::Unavailable(id))
            }
        }
    }
}
