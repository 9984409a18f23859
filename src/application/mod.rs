use crate::domain::report::MetricsReport;
use crate::domain::store::RecordStore;
use crate::domain::unit::CompilationUnit;
use crate::ports::{OutputExporter, ReportBuilder};
use anyhow::{Context, Result};

pub struct AnalyzeUsecase<'a> {
    pub builder: &'a dyn ReportBuilder,
    pub exporter: &'a dyn OutputExporter,
    pub store: Option<&'a dyn RecordStore>,
}

impl<'a> AnalyzeUsecase<'a> {
    pub fn run(&self, units: &[CompilationUnit], export_path: &str) -> Result<MetricsReport> {
        let report = self.builder.build_report(units);

        if let Some(store) = self.store {
            for record in report.to_sorted_records() {
                store.insert(record)?;
            }
        }

        self.exporter
            .export(&report, export_path)
            .with_context(|| format!("Failed to write report to {}", export_path))?;

        Ok(report)
    }
}
