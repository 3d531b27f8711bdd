//! Narrowing down which resources a data interface should hand out.

use std::collections::BTreeSet;

use log::trace;

use crate::resource::{RecordDumpType, Resource};

/// A time interval in seconds since the epoch. An interval without an end
/// is a live interval: it keeps matching anything that comes after its
/// beginning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub begin: u32,
    pub end: Option<u32>,
}

impl Interval {
    /// Whether the window `[begin, end]` of a resource overlaps this
    /// interval.
    pub fn overlaps(&self, begin: u32, end: u32) -> bool {
        end >= self.begin && self.end.map_or(true, |e| begin <= e)
    }
}

/// The filters a user put on the stream. Data interfaces consult it to
/// avoid queueing resources nobody asked for.
///
/// An empty set of projects (or collectors, or record types, or
/// intervals) means "no restriction".
#[derive(Clone, Debug, Default)]
pub struct FilterManager {
    projects: BTreeSet<String>,
    collectors: BTreeSet<String>,
    record_types: BTreeSet<RecordDumpType>,
    intervals: Vec<Interval>,
}

impl FilterManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&mut self, project: impl Into<String>) -> &mut Self {
        self.projects.insert(project.into());
        self
    }

    pub fn add_collector(&mut self, collector: impl Into<String>) -> &mut Self {
        self.collectors.insert(collector.into());
        self
    }

    pub fn add_record_type(&mut self, record_type: RecordDumpType) -> &mut Self {
        self.record_types.insert(record_type);
        self
    }

    pub fn add_interval(&mut self, begin: u32, end: Option<u32>) -> &mut Self {
        self.intervals.push(Interval { begin, end });
        self
    }

    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(String::as_str)
    }

    pub fn collectors(&self) -> impl Iterator<Item = &str> {
        self.collectors.iter().map(String::as_str)
    }

    pub fn record_types(&self) -> impl Iterator<Item = RecordDumpType> + '_ {
        self.record_types.iter().copied()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Whether at least one interval is open ended.
    pub fn is_live(&self) -> bool {
        self.intervals.iter().any(|i| i.end.is_none())
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        let project = self.projects.is_empty()
            || self.projects.contains(resource.project());
        let collector = self.collectors.is_empty()
            || self.collectors.contains(resource.collector());
        let record_type = self.record_types.is_empty()
            || self.record_types.contains(&resource.record_type());
        let time = self.intervals.is_empty()
            || self.intervals.iter().any(|i| {
                i.overlaps(resource.initial_time(), resource.end_time())
            });

        let res = project && collector && record_type && time;
        trace!("filter {} -> {}", resource, res);
        res
    }
}
