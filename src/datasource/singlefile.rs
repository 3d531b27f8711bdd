use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use log::{debug, trace};

use crate::errors::DataInterfaceError;
use crate::filter::FilterManager;
use crate::input::InputQueue;
use crate::resource::{
    FormatType, RecordDumpType, Resource, TransportType,
};

use super::config::{DataInterfaceId, SingleFileConfig};
use super::interface::DataInterface;

/// Number of bytes at the start of a file that are compared between polls.
/// A file that was rewritten (a new dump at the same path) starts with a
/// different MRT header.
const HEADER_LEN: u64 = 1024;

const SINGLEFILE_LABEL: &str = "singlefile";

struct WatchedFile {
    path: PathBuf,
    record_type: RecordDumpType,
    last_header: Option<Vec<u8>>,
}

impl WatchedFile {
    fn new(path: &str, record_type: RecordDumpType) -> Self {
        Self {
            path: PathBuf::from(path),
            record_type,
            last_header: None,
        }
    }

    // Returns a resource if the file changed since the previous call. A
    // file that does not exist (yet) has not changed.
    fn poll(&mut self) -> Result<Option<Resource>, DataInterfaceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                trace!("{} does not exist", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let modified = file
            .metadata()?
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs() as u32);

        let mut header = Vec::with_capacity(HEADER_LEN as usize);
        file.take(HEADER_LEN).read_to_end(&mut header)?;

        if header.is_empty() || self.last_header.as_ref() == Some(&header) {
            return Ok(None);
        }
        self.last_header = Some(header);

        Ok(Some(Resource::new(
            TransportType::File,
            FormatType::Mrt,
            self.path.to_string_lossy(),
            modified,
            0,
            SINGLEFILE_LABEL,
            SINGLEFILE_LABEL,
            self.record_type,
        )))
    }
}

/// Watches one RIB file and/or one updates file. Whenever the start of a
/// file changes, the file is queued (again).
pub struct SingleFileDataInterface {
    filter: FilterManager,
    files: Vec<WatchedFile>,
}

impl SingleFileDataInterface {
    pub fn new(
        filter: &FilterManager,
        config: &SingleFileConfig,
    ) -> Result<Self, DataInterfaceError> {
        let mut files = vec![];
        if let Some(path) = &config.rib_file {
            files.push(WatchedFile::new(path, RecordDumpType::Rib));
        }
        if let Some(path) = &config.upd_file {
            files.push(WatchedFile::new(path, RecordDumpType::Update));
        }
        if files.is_empty() {
            return Err(DataInterfaceError::MissingOption {
                data_interface: DataInterfaceId::SingleFile,
                option: "rib-file",
            });
        }
        Ok(Self {
            filter: filter.clone(),
            files,
        })
    }
}

impl DataInterface for SingleFileDataInterface {
    fn update_input_queue(
        &mut self,
        queue: &mut InputQueue,
    ) -> Result<usize, DataInterfaceError> {
        let mut found = 0;
        for file in self.files.iter_mut() {
            let Some(resource) = file.poll()? else {
                continue;
            };
            if !self.filter.matches(&resource) {
                debug!("{} filtered out", resource);
                continue;
            }
            debug!("queue {}", resource);
            queue.push(resource);
            found += 1;
        }
        if found == 0 {
            trace!("no changed files");
        }
        Ok(found)
    }
}
