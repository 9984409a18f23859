use crate::domain::report::MetricsReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDto {
    pub types: Vec<RecordDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDto {
    pub qualified_name: String,
    pub kind: String,
    pub file: String,
    pub line: usize,
    pub loc: u32,
    pub nom: u32,
    pub nof: u32,
    pub wmc: u32,
    pub cbo: u32,
    pub rfc: u32,
    pub lcom: u32,
    pub dit: u32,
    pub noc: u32,
}

impl From<&MetricsReport> for ReportDto {
    fn from(report: &MetricsReport) -> Self {
        let types = report
            .to_sorted_records()
            .into_iter()
            .map(|record| RecordDto {
                qualified_name: record.qualified_name(),
                kind: record.kind.name().to_string(),
                file: record.file_path.clone(),
                line: record.line,
                loc: record.loc,
                nom: record.nom,
                nof: record.nof,
                wmc: record.wmc,
                cbo: record.cbo,
                rfc: record.rfc,
                lcom: record.lcom,
                dit: record.dit,
                noc: record.noc,
            })
            .collect();

        ReportDto { types }
    }
}
