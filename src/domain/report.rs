// Aggregated metrics report.
// Thread-safe so the engine can insert records from parallel workers.

use crate::domain::record::TypeRecord;
use dashmap::DashMap;

/// Metrics for a whole codebase, keyed by qualified type name.
pub struct MetricsReport {
    records: DashMap<String, TypeRecord>,
}

impl Default for MetricsReport {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl MetricsReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a report from previously exported records (cache loads).
    pub fn from_records(records: Vec<TypeRecord>) -> Self {
        let report = Self::new();
        for record in records {
            report.insert(record);
        }
        report
    }

    /// Insert a record. The first record for a qualified name wins, so
    /// duplicate declarations within a crate do not clobber results.
    pub fn insert(&self, record: TypeRecord) {
        self.records
            .entry(record.qualified_name())
            .or_insert(record);
    }

    /// Returns a cloned record to avoid holding DashMap locks.
    pub fn get(&self, qualified_name: &str) -> Option<TypeRecord> {
        self.records.get(qualified_name).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Extract all records sorted by qualified name.
    /// Exports go through this so output is deterministic regardless of
    /// parallel scheduling.
    pub fn to_sorted_records(&self) -> Vec<TypeRecord> {
        let mut records: Vec<TypeRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.qualified_name());
        records
    }
}
