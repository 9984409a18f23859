/// Report Cache Module
///
/// Provides incremental analysis by caching the finished report and
/// validating it against source file modifications.
///
/// Cache structure:
/// - `metricraft-report.json` - The serialized metric records
/// - `metricraft-report.json.meta` - JSON metadata for cache validation

use crate::domain::record::TypeRecord;
use crate::domain::report::MetricsReport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Cache metadata stored alongside the report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportCacheMetadata {
    /// Version of the cache format (for future compatibility)
    pub version: u32,
    /// Timestamp of when the cache was created
    pub created_at: u64,
    /// Map of source file path -> modification timestamp (unix seconds)
    pub source_files: HashMap<String, u64>,
}

impl ReportCacheMetadata {
    pub const CURRENT_VERSION: u32 = 1;
}

/// Report cache manager rooted at the analyzed directory.
pub struct ReportCache {
    report_path: PathBuf,
    meta_path: PathBuf,
}

impl ReportCache {
    pub fn new(root: &Path) -> Self {
        let report_path = root.join("metricraft-report.json");
        let meta_path = root.join("metricraft-report.json.meta");

        Self {
            report_path,
            meta_path,
        }
    }

    /// Return the cached report when it is still valid for the given
    /// source set.
    pub fn get_valid_report(&self) -> Option<MetricsReport> {
        if !self.report_path.exists() || !self.meta_path.exists() {
            println!("[cache] No cached report found");
            return None;
        }

        let meta = match self.load_metadata() {
            Ok(meta) => meta,
            Err(e) => {
                println!("[cache] Failed to load metadata: {}", e);
                return None;
            }
        };

        if meta.version != ReportCacheMetadata::CURRENT_VERSION {
            println!("[cache] Cache version mismatch");
            return None;
        }

        if !self.validate_source_files(&meta) {
            println!("[cache] Source files have changed");
            return None;
        }

        match self.load_report() {
            Ok(report) => {
                println!(
                    "[cache] Cached report is valid ({} types), skipping analysis",
                    report.len()
                );
                Some(report)
            }
            Err(e) => {
                println!("[cache] Failed to load cached report: {}", e);
                None
            }
        }
    }

    /// Persist a report and record the source mtimes it was built from.
    pub fn store_report(&self, report: &MetricsReport, source_files: &[String]) -> Result<()> {
        let records = report.to_sorted_records();
        let json =
            serde_json::to_string_pretty(&records).context("Failed to serialize report")?;
        fs::write(&self.report_path, json).context("Failed to write cached report")?;

        let mut file_times = HashMap::new();
        for file_path in source_files {
            if let Ok(mtime) = Self::get_file_mtime(file_path) {
                file_times.insert(file_path.clone(), mtime);
            }
        }

        let meta = ReportCacheMetadata {
            version: ReportCacheMetadata::CURRENT_VERSION,
            created_at: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            source_files: file_times,
        };

        let json = serde_json::to_string_pretty(&meta)
            .context("Failed to serialize cache metadata")?;
        fs::write(&self.meta_path, json).context("Failed to write cache metadata")?;

        println!(
            "[cache] Stored report with {} source files tracked",
            meta.source_files.len()
        );
        Ok(())
    }

    /// Clear the cache.
    pub fn invalidate(&self) -> Result<()> {
        if self.report_path.exists() {
            fs::remove_file(&self.report_path)?;
        }
        if self.meta_path.exists() {
            fs::remove_file(&self.meta_path)?;
        }
        Ok(())
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    // ─────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────

    fn load_metadata(&self) -> Result<ReportCacheMetadata> {
        let contents = fs::read_to_string(&self.meta_path)?;
        let meta: ReportCacheMetadata = serde_json::from_str(&contents)?;
        Ok(meta)
    }

    fn load_report(&self) -> Result<MetricsReport> {
        let contents = fs::read_to_string(&self.report_path)?;
        let records: Vec<TypeRecord> = serde_json::from_str(&contents)?;
        Ok(MetricsReport::from_records(records))
    }

    fn validate_source_files(&self, meta: &ReportCacheMetadata) -> bool {
        for (path, cached_mtime) in &meta.source_files {
            match Self::get_file_mtime(path) {
                Ok(current_mtime) => {
                    if current_mtime != *cached_mtime {
                        return false;
                    }
                }
                Err(_) => {
                    // File no longer exists or can't be read
                    return false;
                }
            }
        }
        true
    }

    fn get_file_mtime(path: &str) -> Result<u64> {
        let metadata = fs::metadata(path)?;
        let mtime = metadata.modified()?;
        let duration = mtime.duration_since(SystemTime::UNIX_EPOCH)?;
        Ok(duration.as_secs())
    }
}
