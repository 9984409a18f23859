// RFC: response for a type.
// Method count plus the distinct names of outgoing calls made from the
// type's method bodies.

use crate::domain::record::TypeRecord;
use crate::domain::unit::CompilationUnit;
use crate::ports::TypeLevelMetric;
use std::collections::HashSet;
use syn::visit::{self, Visit};

pub struct ResponseMetric {
    methods: u32,
    calls: HashSet<String>,
}

impl ResponseMetric {
    pub fn new() -> Self {
        Self {
            methods: 0,
            calls: HashSet::new(),
        }
    }
}

struct CallCollector<'a> {
    calls: &'a mut HashSet<String>,
}

impl<'a, 'ast> Visit<'ast> for CallCollector<'a> {
    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        self.calls.insert(node.method.to_string());
        visit::visit_expr_method_call(self, node);
    }

    fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
        if let syn::Expr::Path(path) = &*node.func {
            if let Some(segment) = path.path.segments.last() {
                self.calls.insert(segment.ident.to_string());
            }
        }
        visit::visit_expr_call(self, node);
    }
}

impl TypeLevelMetric for ResponseMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        for method in items.methods() {
            self.methods += 1;
            if let Some(block) = method.block {
                let mut collector = CallCollector {
                    calls: &mut self.calls,
                };
                collector.visit_block(block);
            }
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.rfc = self.methods + self.calls.len() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::TypeKind;

    fn measure(source: &str, type_name: &str) -> TypeRecord {
        let unit = CompilationUnit::parse("app", "lib.rs", source).unwrap();
        let mut record = TypeRecord::new("app", "lib.rs", type_name, TypeKind::Struct, 1);
        let mut metric = ResponseMetric::new();
        metric.execute(&unit, &mut record);
        metric.set_result(&mut record);
        record
    }

    #[test]
    fn test_methods_plus_distinct_calls() {
        let record = measure(
            r#"
            struct Widget;
            impl Widget {
                fn draw(&self) {
                    prepare();
                    self.flush();
                }
                fn redraw(&self) {
                    self.flush();
                }
            }
            "#,
            "Widget",
        );
        // 2 methods + {prepare, flush}
        assert_eq!(record.rfc, 4);
    }

    #[test]
    fn test_constructor_calls_counted_once() {
        let record = measure(
            r#"
            struct Widget;
            impl Widget {
                fn build(&self) {
                    let a = Buffer::new();
                    let b = Buffer::new();
                }
            }
            "#,
            "Widget",
        );
        // 1 method + {new}
        assert_eq!(record.rfc, 2);
    }

    #[test]
    fn test_no_methods_is_zero() {
        let record = measure("struct Plain;", "Plain");
        assert_eq!(record.rfc, 0);
    }
}
