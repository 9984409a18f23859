//! Report Exporters
//!
//! Writes a MetricsReport out as CSV, JSON, or a Graphviz DOT coupling
//! graph.

use crate::domain::record::{TypeKind, TypeRecord};
use crate::domain::report::MetricsReport;
use crate::ports::OutputExporter;
use std::collections::HashSet;
use std::io::Result;

// ============================================================================
// CsvExporter - One row per measured type
// ============================================================================

pub struct CsvExporter;

impl CsvExporter {
    pub fn to_csv(report: &MetricsReport) -> String {
        let mut lines = Vec::new();
        lines.push("crate,type,kind,file,line,loc,nom,nof,wmc,cbo,rfc,lcom,dit,noc".to_string());

        for record in report.to_sorted_records() {
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                escape_csv(&record.crate_name),
                escape_csv(&record.type_name),
                record.kind,
                escape_csv(&record.file_path),
                record.line,
                record.loc,
                record.nom,
                record.nof,
                record.wmc,
                record.cbo,
                record.rfc,
                record.lcom,
                record.dit,
                record.noc,
            ));
        }

        lines.join("\n")
    }
}

impl OutputExporter for CsvExporter {
    fn export(&self, report: &MetricsReport, path: &str) -> Result<()> {
        std::fs::write(path, Self::to_csv(report))
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// JsonExporter - Pretty-printed record list
// ============================================================================

pub struct JsonExporter;

impl OutputExporter for JsonExporter {
    fn export(&self, report: &MetricsReport, path: &str) -> Result<()> {
        let records = report.to_sorted_records();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

// ============================================================================
// DotExporter - Type-coupling graph
// ============================================================================

pub struct DotExporter;

impl DotExporter {
    /// Render the coupling relation between measured types. Couplings to
    /// types outside the report (std, third-party) are left out so the
    /// graph stays readable.
    pub fn to_dot(report: &MetricsReport) -> String {
        let records = report.to_sorted_records();
        let known: HashSet<&str> = records.iter().map(|r| r.type_name.as_str()).collect();

        let mut lines = Vec::new();
        lines.push("digraph TypeCoupling {".to_string());
        lines.push("    rankdir=LR;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push("".to_string());

        for record in &records {
            let (shape, color) = Self::node_style(record.kind);
            lines.push(format!(
                "    \"{}\" [label=\"{}\", shape={}, style=filled, fillcolor=\"{}\"];",
                record.qualified_name(),
                escape_label(&record.type_name),
                shape,
                color,
            ));
        }

        lines.push("".to_string());

        for record in &records {
            for coupling in &record.couplings {
                if !known.contains(coupling.as_str()) {
                    continue;
                }
                // Couplings are stored unqualified; link within the crate.
                lines.push(format!(
                    "    \"{}\" -> \"{}::{}\";",
                    record.qualified_name(),
                    record.crate_name,
                    coupling,
                ));
            }
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn node_style(kind: TypeKind) -> (&'static str, &'static str) {
        match kind {
            TypeKind::Struct => ("box", "#89b4fa"),    // Blue
            TypeKind::Enum => ("hexagon", "#f9e2af"),  // Yellow
            TypeKind::Trait => ("ellipse", "#a6e3a1"), // Green
        }
    }
}

impl OutputExporter for DotExporter {
    fn export(&self, report: &MetricsReport, path: &str) -> Result<()> {
        std::fs::write(path, Self::to_dot(report))
    }
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> MetricsReport {
        let report = MetricsReport::new();

        let mut widget = TypeRecord::new("app", "src/widget.rs", "Widget", TypeKind::Struct, 1);
        widget.nom = 2;
        widget.cbo = 2;
        widget.couplings = vec!["Palette".to_string(), "String".to_string()];
        report.insert(widget);

        let palette = TypeRecord::new("app", "src/palette.rs", "Palette", TypeKind::Enum, 1);
        report.insert(palette);

        report
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = CsvExporter::to_csv(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("crate,type,kind"));
        // Sorted by qualified name: Palette before Widget.
        assert!(lines[1].starts_with("app,Palette,enum"));
        assert!(lines[2].starts_with("app,Widget,struct"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_dot_contains_known_edges_only() {
        let dot = DotExporter::to_dot(&sample_report());
        assert!(dot.contains("digraph TypeCoupling"));
        assert!(dot.contains("\"app::Widget\" -> \"app::Palette\";"));
        // String is not a measured type, so no edge to it.
        assert!(!dot.contains("String"));
    }

    #[test]
    fn test_dot_styles_by_kind() {
        let dot = DotExporter::to_dot(&sample_report());
        assert!(dot.contains("shape=box"));
        assert!(dot.contains("shape=hexagon"));
    }

    #[test]
    fn test_json_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let exporter = JsonExporter;
        exporter
            .export(&sample_report(), path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TypeRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].type_name, "Palette");
    }
}
