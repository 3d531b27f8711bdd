use std::time::Duration;

use log::{debug, trace, warn};
use serde_derive::Deserialize;

use crate::errors::DataInterfaceError;
use crate::filter::FilterManager;
use crate::input::InputQueue;
use crate::resource::{FormatType, RecordDumpType, Resource, TransportType};

use super::config::{BrokerConfig, DataInterfaceId};
use super::interface::DataInterface;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

//------------ Broker reply --------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DumpFile {
    url: String,
    project: String,
    collector: String,
    #[serde(rename = "type")]
    record_type: RecordDumpType,
    initial_time: u32,
    duration: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrokerData {
    #[serde(default)]
    dump_files: Vec<DumpFile>,
}

#[derive(Debug, Deserialize)]
struct BrokerReply {
    time: Option<u32>,
    error: Option<String>,
    #[serde(default)]
    data: Option<BrokerData>,
}

// Turns the body of a `/data` reply into resources, plus the broker time
// to send as `dataAddedSince` in the next query.
fn parse_reply(
    body: &str,
) -> Result<(Vec<Resource>, Option<u32>), DataInterfaceError> {
    let reply: BrokerReply = serde_json::from_str(body)
        .map_err(|err| DataInterfaceError::Malformed(err.to_string()))?;
    if let Some(err) = reply.error {
        return Err(DataInterfaceError::Broker(err));
    }
    let resources = reply
        .data
        .unwrap_or_default()
        .dump_files
        .into_iter()
        .map(|f| {
            Resource::new(
                TransportType::from_uri(&f.url),
                FormatType::Mrt,
                f.url,
                f.initial_time,
                f.duration,
                f.project,
                f.collector,
                f.record_type,
            )
        })
        .collect();
    Ok((resources, reply.time))
}

// The filters, translated to broker query parameters. An open ended
// interval is sent with end 0.
fn query_params(
    filter: &FilterManager,
    data_added_since: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![];
    for project in filter.projects() {
        params.push(("projects[]", project.to_string()));
    }
    for collector in filter.collectors() {
        params.push(("collectors[]", collector.to_string()));
    }
    for record_type in filter.record_types() {
        params.push(("types[]", record_type.to_string()));
    }
    for interval in filter.intervals() {
        params.push((
            "intervals[]",
            format!("{},{}", interval.begin, interval.end.unwrap_or(0)),
        ));
    }
    if let Some(since) = data_added_since {
        params.push(("dataAddedSince", since.to_string()));
    }
    params
}

//------------ BrokerDataInterface -------------------------------------------

/// Asks the broker service which dump files match the filters. After the
/// first query, only files the broker learned about since the previous
/// query are returned.
pub struct BrokerDataInterface {
    filter: FilterManager,
    url: String,
    client: reqwest::blocking::Client,
    data_added_since: Option<u32>,
}

impl BrokerDataInterface {
    pub fn new(
        filter: &FilterManager,
        config: &BrokerConfig,
    ) -> Result<Self, DataInterfaceError> {
        let url = config.url.as_ref().ok_or(
            DataInterfaceError::MissingOption {
                data_interface: DataInterfaceId::Broker,
                option: "url",
            },
        )?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| DataInterfaceError::Broker(err.to_string()))?;
        Ok(Self {
            filter: filter.clone(),
            url: url.trim_end_matches('/').to_string(),
            client,
            data_added_since: None,
        })
    }

    fn query(&self) -> Result<String, DataInterfaceError> {
        let params = query_params(&self.filter, self.data_added_since);
        trace!("broker query {}/data {:?}", self.url, params);
        self.client
            .get(format!("{}/data", self.url))
            .query(&params)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|err| DataInterfaceError::Broker(err.to_string()))
    }
}

impl DataInterface for BrokerDataInterface {
    fn update_input_queue(
        &mut self,
        queue: &mut InputQueue,
    ) -> Result<usize, DataInterfaceError> {
        let body = self.query().inspect_err(|err| warn!("{}", err))?;
        let (resources, time) = parse_reply(&body)?;
        if time.is_some() {
            self.data_added_since = time;
        }
        let found = resources.len();
        queue.extend(resources);
        debug!("broker returned {} resources", found);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "time": 1427846900,
        "type": "data",
        "error": null,
        "queryParameters": {},
        "data": {
            "dumpFiles": [
                {
                    "urlType": "simple",
                    "url": "http://archive.routeviews.org/route-views.eqix/bgpdata/2015.04/UPDATES/updates.20150401.0000.bz2",
                    "project": "routeviews",
                    "collector": "route-views.eqix",
                    "type": "updates",
                    "initialTime": 1427846400,
                    "duration": 900
                },
                {
                    "urlType": "simple",
                    "url": "http://data.ris.ripe.net/rrc00/2015.04/bview.20150401.0000.gz",
                    "project": "ris",
                    "collector": "rrc00",
                    "type": "ribs",
                    "initialTime": 1427846400,
                    "duration": 0
                }
            ]
        }
    }"#;

    #[test]
    fn parses_dump_files() {
        let (resources, time) = parse_reply(REPLY).unwrap();
        assert_eq!(time, Some(1427846900));
        assert_eq!(resources.len(), 2);
        let rv = &resources[0];
        assert_eq!(rv.project(), "routeviews");
        assert_eq!(rv.collector(), "route-views.eqix");
        assert_eq!(rv.record_type(), RecordDumpType::Update);
        assert_eq!(rv.transport_type(), TransportType::Http);
        assert_eq!(rv.initial_time(), 1427846400);
        assert_eq!(rv.duration(), 900);
        assert_eq!(resources[1].record_type(), RecordDumpType::Rib);
    }

    #[test]
    fn empty_reply_has_no_resources() {
        let (resources, time) =
            parse_reply(r#"{ "time": 5, "error": null, "data": null }"#)
                .unwrap();
        assert!(resources.is_empty());
        assert_eq!(time, Some(5));
    }

    #[test]
    fn broker_error_is_surfaced() {
        let res = parse_reply(r#"{ "time": 5, "error": "bad interval" }"#);
        assert!(matches!(res, Err(DataInterfaceError::Broker(msg)) if msg == "bad interval"));
        assert!(matches!(
            parse_reply("<html>"),
            Err(DataInterfaceError::Malformed(_))
        ));
    }

    #[test]
    fn filter_becomes_query() {
        let mut filter = FilterManager::new();
        filter
            .add_project("ris")
            .add_collector("rrc00")
            .add_record_type(RecordDumpType::Rib)
            .add_interval(100, Some(200))
            .add_interval(300, None);
        let params = query_params(&filter, Some(42));
        assert_eq!(
            params,
            vec![
                ("projects[]", "ris".to_string()),
                ("collectors[]", "rrc00".to_string()),
                ("types[]", "ribs".to_string()),
                ("intervals[]", "100,200".to_string()),
                ("intervals[]", "300,0".to_string()),
                ("dataAddedSince", "42".to_string()),
            ]
        );
    }

    #[test]
    fn needs_a_url() {
        let res = BrokerDataInterface::new(
            &FilterManager::new(),
            &BrokerConfig { url: None },
        );
        assert!(matches!(
            res,
            Err(DataInterfaceError::MissingOption { .. })
        ));
    }
}
