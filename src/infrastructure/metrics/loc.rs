// LOC: source lines spanned by the type.
// Declaration lines plus the lines of every impl block, summed across the
// units the engine feeds in. Span locations come from proc-macro2.

use crate::domain::record::TypeRecord;
use crate::domain::unit::{CompilationUnit, TypeDeclRef};
use crate::ports::TypeLevelMetric;
use syn::spanned::Spanned;

pub struct LocMetric {
    lines: u32,
}

impl LocMetric {
    pub fn new() -> Self {
        Self { lines: 0 }
    }
}

fn span_lines<T: Spanned>(node: &T) -> u32 {
    let span = node.span();
    let start = span.start().line;
    let end = span.end().line;
    (end.saturating_sub(start) + 1) as u32
}

impl TypeLevelMetric for LocMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        match &items.decl {
            Some(TypeDeclRef::Struct(s)) => self.lines += span_lines(*s),
            Some(TypeDeclRef::Enum(e)) => self.lines += span_lines(*e),
            Some(TypeDeclRef::Trait(t)) => self.lines += span_lines(*t),
            None => {}
        }
        for imp in &items.impls {
            self.lines += span_lines(*imp);
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.loc = self.lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::TypeKind;

    fn measure(source: &str, type_name: &str) -> TypeRecord {
        let unit = CompilationUnit::parse("app", "lib.rs", source).unwrap();
        let mut record = TypeRecord::new("app", "lib.rs", type_name, TypeKind::Struct, 1);
        let mut metric = LocMetric::new();
        metric.execute(&unit, &mut record);
        metric.set_result(&mut record);
        record
    }

    #[test]
    fn test_single_line_decl() {
        let record = measure("struct Plain;", "Plain");
        assert_eq!(record.loc, 1);
    }

    #[test]
    fn test_decl_plus_impl_lines() {
        let source = "struct Widget {\n    size: u32,\n}\nimpl Widget {\n    fn grow(&mut self) {\n        self.size += 1;\n    }\n}\n";
        let record = measure(source, "Widget");
        // 3 declaration lines + 5 impl lines.
        assert_eq!(record.loc, 8);
    }
}
