//! The queue of resources waiting to be read.

use std::collections::VecDeque;

use log::trace;

use crate::resource::Resource;

/// Resources discovered by a data interface, ordered by the start of their
/// time window. For equal start times RIB dumps come before updates, and
/// otherwise insertion order is kept.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    queue: VecDeque<Resource>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Resource) {
        let key = (resource.initial_time(), resource.record_type());
        let pos = self
            .queue
            .partition_point(|r| (r.initial_time(), r.record_type()) <= key);
        trace!("queue {} at {}", resource, pos);
        self.queue.insert(pos, resource);
    }

    pub fn pop(&mut self) -> Option<Resource> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<&Resource> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.queue.iter()
    }
}

impl Extend<Resource> for InputQueue {
    fn extend<T: IntoIterator<Item = Resource>>(&mut self, iter: T) {
        for resource in iter {
            self.push(resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{FormatType, RecordDumpType, TransportType};

    fn res(uri: &str, t: u32, record_type: RecordDumpType) -> Resource {
        Resource::new(
            TransportType::File,
            FormatType::Mrt,
            uri,
            t,
            0,
            "p",
            "c",
            record_type,
        )
    }

    #[test]
    fn sorted_by_time_then_ribs_first() {
        let mut queue = InputQueue::new();
        queue.push(res("u200", 200, RecordDumpType::Update));
        queue.push(res("u100", 100, RecordDumpType::Update));
        queue.push(res("r100", 100, RecordDumpType::Rib));
        queue.push(res("u100b", 100, RecordDumpType::Update));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|r| r.uri().to_string())
            .collect();
        assert_eq!(order, vec!["r100", "u100", "u100b", "u200"]);
        assert!(queue.is_empty());
    }
}
