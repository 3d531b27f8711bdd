use std::path::PathBuf;

use log::{debug, trace};
use serde_derive::Deserialize;

use crate::errors::DataInterfaceError;
use crate::filter::FilterManager;
use crate::input::InputQueue;
use crate::resource::{FormatType, RecordDumpType, Resource, TransportType};

use super::config::{CsvFileConfig, DataInterfaceId};
use super::interface::DataInterface;

/// One line of the manifest:
///
/// `path,project,type,collector,filetime,time_span,timestamp`
///
/// where `timestamp` is the moment the file was added to the manifest.
#[derive(Debug, Deserialize)]
struct ManifestRow {
    path: String,
    project: String,
    record_type: RecordDumpType,
    collector: String,
    filetime: u32,
    time_span: u32,
    timestamp: u32,
}

impl From<ManifestRow> for Resource {
    fn from(row: ManifestRow) -> Self {
        Resource::new(
            TransportType::from_uri(&row.path),
            FormatType::Mrt,
            row.path,
            row.filetime,
            row.time_span,
            row.project,
            row.collector,
            row.record_type,
        )
    }
}

/// Reads a CSV manifest of dump files. Every poll re-reads the manifest and
/// queues the rows that were added since the previous poll.
pub struct CsvFileDataInterface {
    filter: FilterManager,
    path: PathBuf,
    last_processed: Option<u32>,
}

impl CsvFileDataInterface {
    pub fn new(
        filter: &FilterManager,
        config: &CsvFileConfig,
    ) -> Result<Self, DataInterfaceError> {
        let path = config.csv_file.as_ref().ok_or(
            DataInterfaceError::MissingOption {
                data_interface: DataInterfaceId::CsvFile,
                option: "csv-file",
            },
        )?;
        Ok(Self {
            filter: filter.clone(),
            path: PathBuf::from(path),
            last_processed: None,
        })
    }
}

impl DataInterface for CsvFileDataInterface {
    fn update_input_queue(
        &mut self,
        queue: &mut InputQueue,
    ) -> Result<usize, DataInterfaceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        // Nothing is queued unless the whole manifest parses.
        let mut newest = self.last_processed;
        let mut resources = vec![];

        for row in reader.deserialize::<ManifestRow>() {
            let row = row?;
            if self.last_processed.is_some_and(|last| row.timestamp <= last) {
                continue;
            }
            newest = newest.max(Some(row.timestamp));

            let resource = Resource::from(row);
            if !self.filter.matches(&resource) {
                trace!("{} filtered out", resource);
                continue;
            }
            resources.push(resource);
        }

        let found = resources.len();
        debug!(
            "{}: {} new resources, last processed {:?}",
            self.path.display(),
            found,
            newest
        );
        queue.extend(resources);
        self.last_processed = newest;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = "\
# path,project,type,collector,filetime,time_span,timestamp
/data/rrc00/bview.20150401.0000.gz,ris,ribs,rrc00,1427846400,0,1427846500
/data/rrc00/updates.20150401.0000.gz,ris,updates,rrc00,1427846400,300,1427846500
http://archive.routeviews.org/u.bz2,routeviews,updates,route-views2,1427846400,900,1427846600
";

    fn manifest(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "bgpstream-core-{}-{}.csv",
            std::process::id(),
            name
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn config(path: &std::path::Path) -> CsvFileConfig {
        CsvFileConfig {
            csv_file: Some(path.to_string_lossy().to_string()),
        }
    }

    #[test]
    fn needs_a_manifest() {
        let res = CsvFileDataInterface::new(
            &FilterManager::new(),
            &CsvFileConfig::default(),
        );
        assert!(matches!(
            res,
            Err(DataInterfaceError::MissingOption { .. })
        ));
    }

    #[test]
    fn queues_new_rows_only() {
        let path = manifest("new-rows", MANIFEST);
        let mut ds =
            CsvFileDataInterface::new(&FilterManager::new(), &config(&path))
                .unwrap();
        let mut queue = InputQueue::new();

        assert_eq!(ds.update_input_queue(&mut queue).unwrap(), 3);
        assert_eq!(ds.update_input_queue(&mut queue).unwrap(), 0);

        let appended = format!(
            "{}{}",
            MANIFEST,
            "/data/rrc00/updates.20150401.0005.gz,ris,updates,rrc00,1427846700,300,1427846800\n"
        );
        manifest("new-rows", &appended);
        assert_eq!(ds.update_input_queue(&mut queue).unwrap(), 1);

        let first = queue.pop().unwrap();
        assert_eq!(first.record_type(), RecordDumpType::Rib);
        assert_eq!(first.transport_type(), TransportType::File);
        assert_eq!(first.collector(), "rrc00");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn applies_filter() {
        let path = manifest("filter", MANIFEST);
        let mut filter = FilterManager::new();
        filter.add_project("routeviews");
        let mut ds = CsvFileDataInterface::new(&filter, &config(&path))
            .unwrap();
        let mut queue = InputQueue::new();

        assert_eq!(ds.update_input_queue(&mut queue).unwrap(), 1);
        let res = queue.pop().unwrap();
        assert_eq!(res.transport_type(), TransportType::Http);
        assert_eq!(res.duration(), 900);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_row_is_an_error() {
        let path = manifest("malformed", "/x,ris,sometimes,rrc00,1,2,3\n");
        let mut ds =
            CsvFileDataInterface::new(&FilterManager::new(), &config(&path))
                .unwrap();
        let mut queue = InputQueue::new();
        assert!(matches!(
            ds.update_input_queue(&mut queue),
            Err(DataInterfaceError::Malformed(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn bad_row_queues_nothing() {
        let path = manifest(
            "bad-row",
            "/a,ris,updates,rrc00,100,300,10\n/b,ris,bogus,rrc00,100,300,11\n",
        );
        let mut ds =
            CsvFileDataInterface::new(&FilterManager::new(), &config(&path))
                .unwrap();
        let mut queue = InputQueue::new();
        assert!(ds.update_input_queue(&mut queue).is_err());
        assert!(queue.is_empty());

        manifest(
            "bad-row",
            "/a,ris,updates,rrc00,100,300,10\n/b,ris,updates,rrc00,100,300,11\n",
        );
        assert_eq!(ds.update_input_queue(&mut queue).unwrap(), 2);
        let uris: Vec<String> = queue.iter().map(|r| r.uri().to_string()).collect();
        assert_eq!(uris, vec!["/a", "/b"]);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let mut ds = CsvFileDataInterface::new(
            &FilterManager::new(),
            &config(std::path::Path::new("/nonexistent/manifest.csv")),
        )
        .unwrap();
        let mut queue = InputQueue::new();
        assert!(ds.update_input_queue(&mut queue).is_err());
    }
}
