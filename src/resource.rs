//! Descriptions of routing data units (RIB dumps and update streams) that
//! a data interface discovered, and that are waiting to be processed.

use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

/// How the bytes of a resource are fetched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// A local file, or anything the platform can open as one.
    File,
    /// An HTTP(S) URL.
    Http,
}

impl TransportType {
    /// Guesses the transport from the scheme of a URI.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            TransportType::Http
        } else {
            TransportType::File
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::File => f.write_str("file"),
            TransportType::Http => f.write_str("http"),
        }
    }
}

/// How the bytes of a resource are decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    Mrt,
    Bmp,
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Mrt => f.write_str("mrt"),
            FormatType::Bmp => f.write_str("bmp"),
        }
    }
}

/// Whether a resource is a full table dump, or a stream of updates.
///
/// RIBs sort before updates, so that for the same time a table dump is
/// processed before the updates that follow it.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum RecordDumpType {
    #[serde(rename = "ribs")]
    Rib,
    #[serde(rename = "updates")]
    Update,
}

impl std::fmt::Display for RecordDumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordDumpType::Rib => f.write_str("ribs"),
            RecordDumpType::Update => f.write_str("updates"),
        }
    }
}

impl FromStr for RecordDumpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ribs" | "rib" => Ok(RecordDumpType::Rib),
            "updates" | "update" => Ok(RecordDumpType::Update),
            other => Err(format!("unknown record dump type '{}'", other)),
        }
    }
}

//------------ Resource ------------------------------------------------------

/// A single unit of routing data: where it lives, what time window it
/// covers, and how to read it.
///
/// Everything but the `current_time` cursor is fixed at creation. The
/// consumer moves the cursor forward as it works its way through the
/// window `initial_time..initial_time + duration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    transport_type: TransportType,
    format_type: FormatType,
    uri: String,
    initial_time: u32,
    current_time: u32,
    duration: u32,
    project: String,
    collector: String,
    record_type: RecordDumpType,
}

impl Resource {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport_type: TransportType,
        format_type: FormatType,
        uri: impl Into<String>,
        initial_time: u32,
        duration: u32,
        project: impl Into<String>,
        collector: impl Into<String>,
        record_type: RecordDumpType,
    ) -> Self {
        Self {
            transport_type,
            format_type,
            uri: uri.into(),
            initial_time,
            current_time: initial_time,
            duration,
            project: project.into(),
            collector: collector.into(),
            record_type,
        }
    }

    pub fn transport_type(&self) -> TransportType {
        self.transport_type
    }

    pub fn format_type(&self) -> FormatType {
        self.format_type
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn initial_time(&self) -> u32 {
        self.initial_time
    }

    pub fn current_time(&self) -> u32 {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: u32) {
        self.current_time = time;
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// The end of the time window, saturating at `u32::MAX`.
    pub fn end_time(&self) -> u32 {
        self.initial_time.saturating_add(self.duration)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn collector(&self) -> &str {
        &self.collector
    }

    pub fn record_type(&self) -> RecordDumpType {
        self.record_type
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}+{}",
            self.project,
            self.collector,
            self.record_type,
            self.transport_type,
            self.uri,
            self.initial_time,
            self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rrc00_update() -> Resource {
        Resource::new(
            TransportType::Http,
            FormatType::Mrt,
            "http://x",
            100,
            300,
            "ris",
            "rrc00",
            RecordDumpType::Update,
        )
    }

    #[test]
    fn getters_return_what_was_given() {
        let res = rrc00_update();
        assert_eq!(res.transport_type(), TransportType::Http);
        assert_eq!(res.format_type(), FormatType::Mrt);
        assert_eq!(res.uri(), "http://x");
        assert_eq!(res.initial_time(), 100);
        assert_eq!(res.duration(), 300);
        assert_eq!(res.end_time(), 400);
        assert_eq!(res.project(), "ris");
        assert_eq!(res.collector(), "rrc00");
        assert_eq!(res.record_type(), RecordDumpType::Update);
    }

    #[test]
    fn current_time_moves_independently() {
        let mut res = rrc00_update();
        assert_eq!(res.current_time(), 100);
        res.set_current_time(250);
        assert_eq!(res.current_time(), 250);
        assert_eq!(res.initial_time(), 100);
    }

    #[test]
    fn owns_its_strings() {
        let uri = String::from("/data/rib.bz2");
        let res = Resource::new(
            TransportType::File,
            FormatType::Mrt,
            uri.as_str(),
            0,
            0,
            "routeviews",
            "route-views2",
            RecordDumpType::Rib,
        );
        drop(uri);
        assert_eq!(res.uri(), "/data/rib.bz2");
    }

    #[test]
    fn record_dump_type_names() {
        assert_eq!(RecordDumpType::Rib.to_string(), "ribs");
        assert_eq!("updates".parse::<RecordDumpType>(), Ok(RecordDumpType::Update));
        assert!("bogus".parse::<RecordDumpType>().is_err());
        assert!(RecordDumpType::Rib < RecordDumpType::Update);
    }

    #[test]
    fn transport_from_uri() {
        assert_eq!(
            TransportType::from_uri("https://data.ris.ripe.net/x"),
            TransportType::Http
        );
        assert_eq!(TransportType::from_uri("/tmp/x"), TransportType::File);
    }
}
