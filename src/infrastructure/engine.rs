// Metrics engine.
// Builds the crate-wide type index, then measures every declared type in
// parallel: each metric sees the declaring unit plus every unit with impl
// blocks for the type, and flushes via set_result when all units are in.

use crate::domain::report::MetricsReport;
use crate::domain::type_index::TypeIndex;
use crate::domain::unit::CompilationUnit;
use crate::infrastructure::metrics::type_level_suite;
use crate::ports::ReportBuilder;
use rayon::prelude::*;
use std::sync::Arc;

pub struct MetricsEngine {
    include_tests: bool,
}

impl MetricsEngine {
    pub fn new(include_tests: bool) -> Self {
        Self { include_tests }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReportBuilder for MetricsEngine {
    fn build_report(&self, units: &[CompilationUnit]) -> MetricsReport {
        let index = Arc::new(TypeIndex::build(units));
        let report = MetricsReport::new();

        units.par_iter().enumerate().for_each(|(unit_idx, unit)| {
            for decl in unit.type_decls(self.include_tests) {
                let mut record = crate::domain::record::TypeRecord::new(
                    &unit.crate_name,
                    &unit.file_path,
                    &decl.name,
                    decl.kind,
                    decl.line,
                );

                // Feed the declaring unit plus every unit holding impls
                // for this type, in a deterministic order.
                let mut sites = index.impl_sites_of(&decl.name);
                if !sites.contains(&unit_idx) {
                    sites.push(unit_idx);
                    sites.sort_unstable();
                }

                let mut suite = type_level_suite(&index);
                for metric in suite.iter_mut() {
                    for &site in &sites {
                        metric.execute(&units[site], &mut record);
                    }
                    metric.set_result(&mut record);
                }

                report.insert(record);
            }
        });

        report
    }
}
