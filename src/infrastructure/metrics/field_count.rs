// NOF: number of fields.

use crate::domain::record::TypeRecord;
use crate::domain::unit::{CompilationUnit, TypeDeclRef};
use crate::ports::TypeLevelMetric;
use syn::Fields;

/// Counts struct fields (named or tuple) and enum variants. Traits carry
/// no state, so they stay at zero.
pub struct FieldCountMetric {
    count: u32,
}

impl FieldCountMetric {
    pub fn new() -> Self {
        Self { count: 0 }
    }
}

fn field_len(fields: &Fields) -> u32 {
    match fields {
        Fields::Named(named) => named.named.len() as u32,
        Fields::Unnamed(unnamed) => unnamed.unnamed.len() as u32,
        Fields::Unit => 0,
    }
}

impl TypeLevelMetric for FieldCountMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        match items.decl {
            Some(TypeDeclRef::Struct(s)) => self.count += field_len(&s.fields),
            Some(TypeDeclRef::Enum(e)) => self.count += e.variants.len() as u32,
            Some(TypeDeclRef::Trait(_)) | None => {}
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.nof = self.count;
    }
}
