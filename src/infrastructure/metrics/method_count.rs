// NOM: number of methods.

use crate::domain::record::TypeRecord;
use crate::domain::unit::CompilationUnit;
use crate::ports::TypeLevelMetric;

/// Counts fns in inherent and trait impls of the type; for traits, the
/// trait's own method items.
pub struct MethodCountMetric {
    count: u32,
}

impl MethodCountMetric {
    pub fn new() -> Self {
        Self { count: 0 }
    }
}

impl TypeLevelMetric for MethodCountMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        self.count += items.methods().len() as u32;
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.nom = self.count;
    }
}
