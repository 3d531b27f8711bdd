//! Data interfaces, their option schemas, and the configuration values a
//! [`DataSourceManager`](super::DataSourceManager) keeps for each of them.
//!
//! A configuration starts out with the compiled-in defaults and is then
//! changed option by option, or loaded as a whole from JSON:
//!
//! ```
//! use bgpstream_core::datasource::{DataInterfaceConfig, DataInterfaceId};
//!
//! let config = DataInterfaceConfig::from_json(
//!     r#"{ "csvfile": { "csv-file": "/data/manifest.csv" } }"#,
//! ).unwrap();
//! assert_eq!(config.csvfile.csv_file.as_deref(), Some("/data/manifest.csv"));
//! assert_eq!(config.mysql.db_name.as_deref(), Some("bgparchive"));
//! ```

use std::str::FromStr;

use log::warn;
use serde_derive::Deserialize;

use crate::errors::ConfigError;

//------------ DataInterfaceId -----------------------------------------------

/// The kinds of backends resources can be discovered from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataInterfaceId {
    /// A relational database with a table of dump files.
    #[default]
    Mysql,
    /// A single RIB file and/or a single updates file on disk.
    SingleFile,
    /// A CSV manifest listing dump files.
    CsvFile,
    /// An embedded (SQLite) database with a table of dump files.
    Sqlite,
    /// The HTTP broker service.
    Broker,
}

/// Name and description of a data interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataInterfaceInfo {
    pub id: DataInterfaceId,
    pub name: &'static str,
    pub description: &'static str,
}

impl DataInterfaceId {
    pub const ALL: [DataInterfaceId; 5] = [
        DataInterfaceId::Mysql,
        DataInterfaceId::SingleFile,
        DataInterfaceId::CsvFile,
        DataInterfaceId::Sqlite,
        DataInterfaceId::Broker,
    ];

    pub fn info(self) -> DataInterfaceInfo {
        let (name, description) = match self {
            DataInterfaceId::Mysql => {
                ("mysql", "Retrieve metadata information from a MySQL database")
            }
            DataInterfaceId::SingleFile => {
                ("singlefile", "Read a single MRT RIB dump and/or update file")
            }
            DataInterfaceId::CsvFile => {
                ("csvfile", "Retrieve metadata information from a CSV file")
            }
            DataInterfaceId::Sqlite => (
                "sqlite",
                "Retrieve metadata information from an SQLite database",
            ),
            DataInterfaceId::Broker => (
                "broker",
                "Retrieve metadata information from the BGPStream Broker \
                service",
            ),
        };
        DataInterfaceInfo {
            id: self,
            name,
            description,
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The option schema of this data interface, ordered by option index.
    pub fn options(self) -> &'static [DataInterfaceOption] {
        match self {
            DataInterfaceId::Mysql => &MYSQL_OPTIONS,
            DataInterfaceId::SingleFile => &SINGLEFILE_OPTIONS,
            DataInterfaceId::CsvFile => &CSVFILE_OPTIONS,
            DataInterfaceId::Sqlite => &SQLITE_OPTIONS,
            DataInterfaceId::Broker => &BROKER_OPTIONS,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl std::fmt::Display for DataInterfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataInterfaceId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| ConfigError::UnknownDataInterface(s.to_string()))
    }
}

//------------ DataInterfaceOption -------------------------------------------

/// One entry in the option schema of a data interface.
///
/// Options are only obtained from the schema tables, so the pair
/// `(data_interface, id)` always names an option that exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataInterfaceOption {
    data_interface: DataInterfaceId,
    id: u8,
    name: &'static str,
    description: &'static str,
}

impl DataInterfaceOption {
    const fn new(
        data_interface: DataInterfaceId,
        id: u8,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            data_interface,
            id,
            name,
            description,
        }
    }

    pub fn data_interface(&self) -> DataInterfaceId {
        self.data_interface
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Looks up an option by name in the schema of `data_interface`.
    pub fn find(
        data_interface: DataInterfaceId,
        name: &str,
    ) -> Result<&'static DataInterfaceOption, ConfigError> {
        data_interface
            .options()
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| ConfigError::UnknownOption {
                data_interface,
                name: name.to_string(),
            })
    }
}

static MYSQL_OPTIONS: [DataInterfaceOption; 7] = [
    DataInterfaceOption::new(DataInterfaceId::Mysql, 0, "db-name", "name of the mysql database to use"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 1, "db-user", "mysql username to use"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 2, "db-password", "mysql password to use"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 3, "db-host", "hostname/IP of the mysql server"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 4, "db-port", "port of the mysql server"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 5, "db-socket", "unix socket of the mysql server"),
    DataInterfaceOption::new(DataInterfaceId::Mysql, 6, "dump-path", "prefix path of the dump files"),
];

static SINGLEFILE_OPTIONS: [DataInterfaceOption; 2] = [
    DataInterfaceOption::new(DataInterfaceId::SingleFile, 0, "rib-file", "rib mrt file to read"),
    DataInterfaceOption::new(DataInterfaceId::SingleFile, 1, "upd-file", "update mrt file to read"),
];

static CSVFILE_OPTIONS: [DataInterfaceOption; 1] = [
    DataInterfaceOption::new(DataInterfaceId::CsvFile, 0, "csv-file", "csv file listing the mrt data to read"),
];

static SQLITE_OPTIONS: [DataInterfaceOption; 1] = [
    DataInterfaceOption::new(DataInterfaceId::Sqlite, 0, "db-file", "sqlite database"),
];

static BROKER_OPTIONS: [DataInterfaceOption; 1] = [
    DataInterfaceOption::new(DataInterfaceId::Broker, 0, "url", "broker URL"),
];

//------------ Per data interface configuration ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MysqlConfig {
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_host: Option<String>,
    pub db_port: u32,
    pub db_socket: Option<String>,
    pub dump_path: Option<String>,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            db_name: Some("bgparchive".to_string()),
            db_user: Some("bgpstream".to_string()),
            db_password: None,
            db_host: Some("localhost".to_string()),
            db_port: 0,
            db_socket: None,
            dump_path: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SingleFileConfig {
    pub rib_file: Option<String>,
    pub upd_file: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CsvFileConfig {
    pub csv_file: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SqliteConfig {
    pub db_file: Option<String>,
}

pub const DEFAULT_BROKER_URL: &str = "https://bgpstream.caida.org/broker";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrokerConfig {
    pub url: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_BROKER_URL.to_string()),
        }
    }
}

//------------ DataInterfaceConfig -------------------------------------------

/// The options of all data interfaces. Only the options of the selected
/// data interface are used when it is created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataInterfaceConfig {
    pub mysql: MysqlConfig,
    pub singlefile: SingleFileConfig,
    pub csvfile: CsvFileConfig,
    pub sqlite: SqliteConfig,
    pub broker: BrokerConfig,
}

impl DataInterfaceConfig {
    /// Reads a configuration from JSON. Missing sections and fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stores `value` for `option`, replacing any previous value.
    ///
    /// Integer options are parsed leniently: a value that is not a number
    /// is stored as 0 (a leading number followed by garbage keeps the
    /// number), and an error is returned to let the caller know.
    pub fn set_option(
        &mut self,
        option: &DataInterfaceOption,
        value: &str,
    ) -> Result<(), ConfigError> {
        let value_s = Some(value.to_string());
        match (option.data_interface, option.id) {
            (DataInterfaceId::Mysql, 0) => self.mysql.db_name = value_s,
            (DataInterfaceId::Mysql, 1) => self.mysql.db_user = value_s,
            (DataInterfaceId::Mysql, 2) => self.mysql.db_password = value_s,
            (DataInterfaceId::Mysql, 3) => self.mysql.db_host = value_s,
            (DataInterfaceId::Mysql, 4) => {
                let (port, clean) = parse_int_lenient(value);
                self.mysql.db_port = port;
                if !clean {
                    warn!("option {} set to {} from '{}'", option.name, port, value);
                    return Err(ConfigError::InvalidInteger {
                        option: option.name,
                        value: value.to_string(),
                    });
                }
            }
            (DataInterfaceId::Mysql, 5) => self.mysql.db_socket = value_s,
            (DataInterfaceId::Mysql, 6) => self.mysql.dump_path = value_s,
            (DataInterfaceId::SingleFile, 0) => {
                self.singlefile.rib_file = value_s
            }
            (DataInterfaceId::SingleFile, 1) => {
                self.singlefile.upd_file = value_s
            }
            (DataInterfaceId::CsvFile, 0) => self.csvfile.csv_file = value_s,
            (DataInterfaceId::Sqlite, 0) => self.sqlite.db_file = value_s,
            (DataInterfaceId::Broker, 0) => self.broker.url = value_s,
            (data_interface, _) => {
                return Err(ConfigError::UnknownOption {
                    data_interface,
                    name: option.name.to_string(),
                })
            }
        }
        Ok(())
    }
}

// Parses like C's `atoi`: leading whitespace, an optional '+', then as many
// digits as there are. Returns the value and whether the whole string was
// a number. Negative numbers and overflow become 0.
fn parse_int_lenient(value: &str) -> (u32, bool) {
    let trimmed = value.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let (number, rest) = digits.split_at(end);
    match u32::from_str(number) {
        Ok(n) => (n, rest.trim_end().is_empty()),
        Err(_) => (0, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DataInterfaceConfig::default();
        assert_eq!(config.mysql.db_name.as_deref(), Some("bgparchive"));
        assert_eq!(config.mysql.db_password, None);
        assert_eq!(config.mysql.db_port, 0);
        assert_eq!(config.singlefile.rib_file, None);
        assert_eq!(config.csvfile.csv_file, None);
        assert_eq!(config.sqlite.db_file, None);
        assert_eq!(config.broker.url.as_deref(), Some(DEFAULT_BROKER_URL));
    }

    #[test]
    fn option_tables_are_indexed_by_id() {
        for id in DataInterfaceId::ALL {
            for (i, option) in id.options().iter().enumerate() {
                assert_eq!(option.id() as usize, i);
                assert_eq!(option.data_interface(), id);
            }
        }
        assert_eq!(DataInterfaceId::Mysql.options().len(), 7);
        assert_eq!(DataInterfaceId::SingleFile.options().len(), 2);
    }

    #[test]
    fn names_round_trip() {
        for id in DataInterfaceId::ALL {
            assert_eq!(id.name().parse::<DataInterfaceId>(), Ok(id));
        }
        assert!("kafka".parse::<DataInterfaceId>().is_err());
    }

    #[test]
    fn set_string_option_replaces() -> Result<(), ConfigError> {
        let mut config = DataInterfaceConfig::default();
        let opt = DataInterfaceOption::find(DataInterfaceId::Broker, "url")?;
        config.set_option(opt, "http://a")?;
        config.set_option(opt, "http://b")?;
        assert_eq!(config.broker.url.as_deref(), Some("http://b"));
        Ok(())
    }

    #[test]
    fn sqlite_option_does_not_touch_broker() -> Result<(), ConfigError> {
        let mut config = DataInterfaceConfig::default();
        let opt = DataInterfaceOption::find(DataInterfaceId::Sqlite, "db-file")?;
        config.set_option(opt, "/tmp/db.sqlite")?;
        assert_eq!(config.sqlite.db_file.as_deref(), Some("/tmp/db.sqlite"));
        assert_eq!(config.broker, BrokerConfig::default());
        Ok(())
    }

    #[test]
    fn lenient_integers() {
        assert_eq!(parse_int_lenient("3306"), (3306, true));
        assert_eq!(parse_int_lenient(" +42 "), (42, true));
        assert_eq!(parse_int_lenient("12abc"), (12, false));
        assert_eq!(parse_int_lenient("abc"), (0, false));
        assert_eq!(parse_int_lenient("-1"), (0, false));
        assert_eq!(parse_int_lenient(""), (0, false));
    }

    #[test]
    fn non_numeric_port_stores_zero() -> Result<(), ConfigError> {
        let mut config = DataInterfaceConfig::default();
        config.mysql.db_port = 3306;
        let opt = DataInterfaceOption::find(DataInterfaceId::Mysql, "db-port")?;
        assert_eq!(opt.id(), 4);
        let res = config.set_option(opt, "not-a-port");
        assert!(matches!(res, Err(ConfigError::InvalidInteger { .. })));
        assert_eq!(config.mysql.db_port, 0);
        Ok(())
    }

    #[test]
    fn from_json_keeps_defaults() -> Result<(), ConfigError> {
        let config = DataInterfaceConfig::from_json(
            r#"{ "mysql": { "db-port": 3306 }, "singlefile": { "upd-file": "u.mrt" } }"#,
        )?;
        assert_eq!(config.mysql.db_port, 3306);
        assert_eq!(config.mysql.db_user.as_deref(), Some("bgpstream"));
        assert_eq!(config.singlefile.upd_file.as_deref(), Some("u.mrt"));
        assert!(DataInterfaceConfig::from_json("{ nope").is_err());
        Ok(())
    }
}
