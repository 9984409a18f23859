// CBO: coupling between types.
// Collects the distinct foreign type names a type refers to in its fields,
// signatures, impl headers, and method bodies. Purely syntactic: a path
// segment starting with an uppercase letter counts as a type reference.

use crate::domain::record::TypeRecord;
use crate::domain::unit::{CompilationUnit, TypeDeclRef};
use crate::ports::TypeLevelMetric;
use std::collections::HashSet;
use syn::visit::{self, Visit};
use syn::{GenericParam, Generics};

// Variant constructors of the prelude, not couplings in any useful sense.
const SKIPPED_IDENTS: [&str; 5] = ["Self", "Some", "None", "Ok", "Err"];

pub struct CouplingMetric {
    seen: HashSet<String>,
}

impl CouplingMetric {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

struct PathCollector<'a> {
    seen: &'a mut HashSet<String>,
    exclude: &'a HashSet<String>,
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

impl<'a, 'ast> Visit<'ast> for PathCollector<'a> {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        for segment in &node.segments {
            let name = segment.ident.to_string();
            if starts_uppercase(&name)
                && !self.exclude.contains(&name)
                && !SKIPPED_IDENTS.contains(&name.as_str())
            {
                self.seen.insert(name);
            }
        }
        visit::visit_path(self, node);
    }
}

fn generic_param_names(generics: &Generics, out: &mut HashSet<String>) {
    for param in &generics.params {
        if let GenericParam::Type(tp) = param {
            out.insert(tp.ident.to_string());
        }
    }
}

impl TypeLevelMetric for CouplingMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);

        // The type itself and its generic parameters are not couplings.
        let mut exclude = HashSet::new();
        exclude.insert(result.type_name.clone());
        match &items.decl {
            Some(TypeDeclRef::Struct(s)) => generic_param_names(&s.generics, &mut exclude),
            Some(TypeDeclRef::Enum(e)) => generic_param_names(&e.generics, &mut exclude),
            Some(TypeDeclRef::Trait(t)) => generic_param_names(&t.generics, &mut exclude),
            None => {}
        }
        for imp in &items.impls {
            generic_param_names(&imp.generics, &mut exclude);
        }

        let mut collector = PathCollector {
            seen: &mut self.seen,
            exclude: &exclude,
        };
        match &items.decl {
            Some(TypeDeclRef::Struct(s)) => collector.visit_item_struct(s),
            Some(TypeDeclRef::Enum(e)) => collector.visit_item_enum(e),
            Some(TypeDeclRef::Trait(t)) => collector.visit_item_trait(t),
            None => {}
        }
        for imp in &items.impls {
            collector.visit_item_impl(imp);
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        let mut couplings: Vec<String> = self.seen.iter().cloned().collect();
        couplings.sort();
        result.cbo = couplings.len() as u32;
        result.couplings = couplings;
    }
}
