//! Discovering routing data resources.
//!
//! A [`DataSourceManager`] owns the configuration of all data interfaces
//! and, once initialized, exactly one live backend for the selected data
//! interface. Polling the manager asks that backend to push the resources
//! it discovered into an [`InputQueue`].
//!
//! ```
//! use bgpstream_core::datasource::{
//!     DataInterfaceId, DataInterfaceOption, DataSourceManager, DataSourceStatus,
//! };
//! use bgpstream_core::filter::FilterManager;
//!
//! let mut mgr = DataSourceManager::new();
//! mgr.set_data_interface(DataInterfaceId::CsvFile);
//! let option = DataInterfaceOption::find(DataInterfaceId::CsvFile, "csv-file")?;
//! mgr.set_data_interface_option(option, "/data/manifest.csv")?;
//! mgr.init(&FilterManager::new());
//! assert_eq!(mgr.status(), DataSourceStatus::On);
//! mgr.close();
//! assert_eq!(mgr.status(), DataSourceStatus::Off);
//! # Ok::<(), bgpstream_core::errors::ConfigError>(())
//! ```

mod config;
mod csvfile;
mod error;
mod interface;
mod singlefile;

#[cfg(feature = "broker")]
mod broker;

pub use config::{
    BrokerConfig, CsvFileConfig, DataInterfaceConfig, DataInterfaceId,
    DataInterfaceInfo, DataInterfaceOption, MysqlConfig, SingleFileConfig,
    SqliteConfig, DEFAULT_BROKER_URL,
};
pub use csvfile::CsvFileDataInterface;
pub use error::{ConfigError, DataInterfaceError};
pub use interface::{BuiltinFactory, DataInterface, DataInterfaceFactory};
pub use singlefile::SingleFileDataInterface;

#[cfg(feature = "broker")]
pub use broker::BrokerDataInterface;

use std::time::Duration;

use log::{debug, error, info, trace, warn};

use crate::filter::FilterManager;
use crate::input::InputQueue;

/// The first wait after a blocking poll came back empty.
pub const BLOCKING_MIN_WAIT: Duration = Duration::from_secs(30);

/// The longest wait between two blocking polls.
pub const BLOCKING_MAX_WAIT: Duration = Duration::from_secs(150);

//------------ DataSourceStatus ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataSourceStatus {
    /// Not initialized, or closed.
    Off,
    /// A backend is live.
    On,
    /// Creating the backend failed. Only `close` gets out of this state.
    Error,
}

impl std::fmt::Display for DataSourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceStatus::Off => f.write_str("off"),
            DataSourceStatus::On => f.write_str("on"),
            DataSourceStatus::Error => f.write_str("error"),
        }
    }
}

//------------ DataSourceManager ---------------------------------------------

/// Selects, configures and polls one data interface.
///
/// The manager is not synchronized: poll it from one thread at a time. A
/// blocking poll sleeps on the calling thread and cannot be interrupted.
pub struct DataSourceManager {
    data_interface: DataInterfaceId,
    config: DataInterfaceConfig,
    factory: Box<dyn DataInterfaceFactory>,
    active: Option<Box<dyn DataInterface>>,
    status: DataSourceStatus,
    blocking: bool,
    backoff: Duration,
    sleeper: Box<dyn FnMut(Duration) + Send>,
}

impl DataSourceManager {
    /// Creates a manager for the `mysql` data interface, with the
    /// compiled-in option defaults, in non-blocking mode.
    pub fn new() -> Self {
        trace!("create data source manager");
        Self {
            data_interface: DataInterfaceId::default(),
            config: DataInterfaceConfig::default(),
            factory: Box::new(BuiltinFactory),
            active: None,
            status: DataSourceStatus::Off,
            blocking: false,
            backoff: BLOCKING_MIN_WAIT,
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// Replaces the factory that creates backends in `init`.
    pub fn with_factory(
        mut self,
        factory: impl DataInterfaceFactory + 'static,
    ) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Replaces the function a blocking poll waits with. Defaults to
    /// `std::thread::sleep`.
    pub fn with_sleeper(
        mut self,
        sleeper: impl FnMut(Duration) + Send + 'static,
    ) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Replaces all options at once, e.g. with a configuration read from a
    /// file.
    pub fn with_config(mut self, config: DataInterfaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the data interface `init` will create. Has no effect on a
    /// backend that is already live until the manager is closed and
    /// initialized again.
    pub fn set_data_interface(&mut self, data_interface: DataInterfaceId) {
        debug!("set data interface {}", data_interface);
        if self.active.is_some() {
            warn!(
                "data interface {} selected while {} is live",
                data_interface, self.data_interface
            );
        }
        self.data_interface = data_interface;
    }

    /// Sets an option for the selected data interface.
    ///
    /// An option that belongs to another data interface than the selected
    /// one is ignored. See [`DataInterfaceConfig::set_option`] for how
    /// values are stored.
    pub fn set_data_interface_option(
        &mut self,
        option: &DataInterfaceOption,
        value: &str,
    ) -> Result<(), ConfigError> {
        if option.data_interface() != self.data_interface {
            debug!(
                "ignore option {}:{} for selected data interface {}",
                option.data_interface(),
                option.name(),
                self.data_interface
            );
            return Ok(());
        }
        trace!("set option {}:{}", option.data_interface(), option.name());
        self.config.set_option(option, value)
    }

    /// Makes polls wait and retry until something new shows up. There is
    /// no way back to non-blocking mode.
    pub fn set_blocking(&mut self) {
        debug!("set blocking");
        self.blocking = true;
    }

    /// Creates the backend for the selected data interface. The status
    /// becomes `On` if that worked, `Error` otherwise.
    pub fn init(&mut self, filter: &FilterManager) {
        debug!("init data interface {}", self.data_interface);
        if self.active.take().is_some() {
            warn!("init on a live data source manager, closing it first");
        }
        match self.factory.create(self.data_interface, filter, &self.config)
        {
            Ok(ds) => {
                info!("data interface {} is on", self.data_interface);
                self.active = Some(ds);
                self.status = DataSourceStatus::On;
            }
            Err(err) => {
                error!(
                    "cannot create data interface {}: {}",
                    self.data_interface, err
                );
                self.status = DataSourceStatus::Error;
            }
        }
    }

    /// Asks the backend for new resources and returns how many were
    /// queued.
    ///
    /// In blocking mode a poll that found nothing waits for the current
    /// backoff and tries again, until something was found or the backend
    /// fails. Each wait doubles the backoff, up to [`BLOCKING_MAX_WAIT`].
    /// The backoff is never lowered again.
    pub fn update_input_queue(
        &mut self,
        queue: &mut InputQueue,
    ) -> Result<usize, DataInterfaceError> {
        let Some(ds) = self.active.as_mut() else {
            warn!("poll with data source manager {}", self.status);
            return Err(DataInterfaceError::NotActive);
        };

        loop {
            let found = ds.update_input_queue(queue).inspect_err(|err| {
                error!("data interface {}: {}", self.data_interface, err)
            })?;
            debug!("got {} (blocking: {})", found, self.blocking);

            if found > 0 || !self.blocking {
                return Ok(found);
            }

            trace!("nothing new, wait {:?}", self.backoff);
            (self.sleeper)(self.backoff);
            self.backoff = (self.backoff * 2).min(BLOCKING_MAX_WAIT);
        }
    }

    /// Drops the live backend, if any.
    pub fn close(&mut self) {
        debug!("close data interface {}", self.data_interface);
        self.active = None;
        self.status = DataSourceStatus::Off;
    }

    pub fn status(&self) -> DataSourceStatus {
        self.status
    }

    pub fn data_interface(&self) -> DataInterfaceId {
        self.data_interface
    }

    pub fn config(&self) -> &DataInterfaceConfig {
        &self.config
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// The wait before the next retry of a blocking poll.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for DataSourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataSourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceManager")
            .field("data_interface", &self.data_interface)
            .field("config", &self.config)
            .field("status", &self.status)
            .field("blocking", &self.blocking)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl Drop for DataSourceManager {
    fn drop(&mut self) {
        if self.active.is_some() {
            debug!("drop live data interface {}", self.data_interface);
        }
    }
}
