use crate::domain::record::TypeRecord;
use anyhow::{Context, Result};
use dashmap::DashMap;
use sled::Db;

/// Trait for record storage backends.
/// Implementations must be thread-safe (Send + Sync).
pub trait RecordStore: Send + Sync {
    fn insert(&self, record: TypeRecord) -> Result<()>;
    fn get(&self, qualified_name: &str) -> Result<Option<TypeRecord>>;
    fn all(&self) -> Result<Vec<TypeRecord>>;
}

// ============================================================================
// MemoryRecordStore - Fast in-memory storage using DashMap
// ============================================================================

pub struct MemoryRecordStore {
    records: DashMap<String, TypeRecord>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert(&self, record: TypeRecord) -> Result<()> {
        self.records.insert(record.qualified_name(), record);
        Ok(())
    }

    fn get(&self, qualified_name: &str) -> Result<Option<TypeRecord>> {
        Ok(self.records.get(qualified_name).map(|r| r.clone()))
    }

    fn all(&self) -> Result<Vec<TypeRecord>> {
        let mut records: Vec<TypeRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.qualified_name());
        Ok(records)
    }
}

// ============================================================================
// DiskRecordStore - Persistent storage using sled
// ============================================================================

pub struct DiskRecordStore {
    _db: Db,
    records_tree: sled::Tree,
}

impl DiskRecordStore {
    pub fn new(path: &str) -> Result<Self> {
        let db = sled::open(path).with_context(|| format!("Failed to open store at {}", path))?;
        let records_tree = db.open_tree("records")?;

        Ok(Self {
            _db: db,
            records_tree,
        })
    }
}

impl RecordStore for DiskRecordStore {
    fn insert(&self, record: TypeRecord) -> Result<()> {
        let key = record.qualified_name();
        let bytes = bincode::serialize(&record)
            .with_context(|| format!("Failed to serialize record {}", key))?;
        self.records_tree.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    fn get(&self, qualified_name: &str) -> Result<Option<TypeRecord>> {
        match self.records_tree.get(qualified_name.as_bytes())? {
            Some(bytes) => {
                let record = bincode::deserialize(&bytes)
                    .with_context(|| format!("Corrupt record for {}", qualified_name))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn all(&self) -> Result<Vec<TypeRecord>> {
        let mut records = Vec::new();
        for entry in self.records_tree.iter() {
            let (_, bytes) = entry?;
            records.push(bincode::deserialize(&bytes).context("Corrupt record in store")?);
        }
        // sled iterates in key order, but sort anyway so the contract is explicit
        records.sort_by_key(|r: &TypeRecord| r.qualified_name());
        Ok(records)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
