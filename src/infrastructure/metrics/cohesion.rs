// LCOM: lack of cohesion of methods (LCOM1).
// For every pair of methods taking a receiver, the pair is non-cohesive
// when the two bodies touch no common `self` field. LCOM1 is the number
// of non-cohesive pairs minus the cohesive ones, floored at zero.

use crate::domain::record::TypeRecord;
use crate::domain::unit::CompilationUnit;
use crate::ports::TypeLevelMetric;
use std::collections::HashSet;
use syn::visit::{self, Visit};

pub struct CohesionMetric {
    /// One entry per receiver-taking method: the `self` fields it touches.
    field_sets: Vec<HashSet<String>>,
}

impl CohesionMetric {
    pub fn new() -> Self {
        Self {
            field_sets: Vec::new(),
        }
    }
}

struct FieldAccessCollector<'a> {
    fields: &'a mut HashSet<String>,
}

impl<'a, 'ast> Visit<'ast> for FieldAccessCollector<'a> {
    fn visit_expr_field(&mut self, node: &'ast syn::ExprField) {
        if let syn::Expr::Path(path) = &*node.base {
            if path.path.is_ident("self") {
                if let syn::Member::Named(ident) = &node.member {
                    self.fields.insert(ident.to_string());
                }
            }
        }
        visit::visit_expr_field(self, node);
    }
}

impl TypeLevelMetric for CohesionMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        for method in items.methods() {
            if method.sig.receiver().is_none() {
                continue;
            }
            let Some(block) = method.block else { continue };
            let mut fields = HashSet::new();
            let mut collector = FieldAccessCollector {
                fields: &mut fields,
            };
            collector.visit_block(block);
            self.field_sets.push(fields);
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        let mut non_sharing: u32 = 0;
        let mut sharing: u32 = 0;
        for i in 0..self.field_sets.len() {
            for j in (i + 1)..self.field_sets.len() {
                if self.field_sets[i].is_disjoint(&self.field_sets[j]) {
                    non_sharing += 1;
                } else {
                    sharing += 1;
                }
            }
        }
        result.lcom = non_sharing.saturating_sub(sharing);
    }
}
