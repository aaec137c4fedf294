//! Device registry
//!
//! Holds the devices found by the latest scan. Only a completed scan puts
//! devices in; a status push can flip a known device up or down but never
//! adds one.

use std::collections::HashMap;

use routerlab_core::{DeviceRecord, DeviceStatus};

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    entries: HashMap<String, DeviceRecord>,
    /// Bumped on every mutation that changes what a reader would see.
    revision: u64,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every device.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.revision += 1;
    }

    /// Replace the whole registry with `records`.
    ///
    /// A later record with the same id overwrites an earlier one.
    pub fn replace(&mut self, records: impl IntoIterator<Item = DeviceRecord>) {
        self.entries = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        self.revision += 1;
    }

    /// Set the status of a known device.
    ///
    /// Returns `false`, changing nothing, if `id` is not in the registry.
    pub fn set_status(&mut self, id: &str, status: DeviceStatus) -> bool {
        match self.entries.get_mut(id) {
            Some(record) => {
                if record.status != status {
                    record.status = status;
                    self.revision += 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&DeviceRecord> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Devices in display order: the host's own machine first, then by id.
    pub fn sorted(&self) -> Vec<&DeviceRecord> {
        let mut records: Vec<&DeviceRecord> = self.entries.values().collect();
        records.sort_by(|a, b| b.is_self().cmp(&a.is_self()).then_with(|| a.id.cmp(&b.id)));
        records
    }

    pub fn up_count(&self) -> usize {
        self.entries.values().filter(|r| r.status.is_up()).count()
    }
}
