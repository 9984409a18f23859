// DIT and NOC: position in the trait hierarchy.
// Unlike the other metrics this one reads the crate-wide TypeIndex, since
// supertrait chains and implementor counts span compilation units.

use crate::domain::record::{TypeKind, TypeRecord};
use crate::domain::type_index::TypeIndex;
use crate::domain::unit::CompilationUnit;
use crate::ports::TypeLevelMetric;
use std::sync::Arc;

pub struct HierarchyMetric {
    index: Arc<TypeIndex>,
    dit: u32,
    noc: u32,
    computed: bool,
}

impl HierarchyMetric {
    pub fn new(index: Arc<TypeIndex>) -> Self {
        Self {
            index,
            dit: 0,
            noc: 0,
            computed: false,
        }
    }
}

impl TypeLevelMetric for HierarchyMetric {
    fn execute(&mut self, _unit: &CompilationUnit, result: &mut TypeRecord) {
        // The index already covers every unit; compute once.
        if self.computed {
            return;
        }
        self.dit = self.index.depth_of(&result.type_name, result.kind);
        self.noc = match result.kind {
            TypeKind::Trait => self.index.children_of(&result.type_name),
            TypeKind::Struct | TypeKind::Enum => 0,
        };
        self.computed = true;
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.dit = self.dit;
        result.noc = self.noc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unit::parse_units;

    fn measure(sources: &[(&str, &str)], type_name: &str, kind: TypeKind) -> TypeRecord {
        let triples: Vec<(String, String, String)> = sources
            .iter()
            .map(|(path, code)| ("app".to_string(), path.to_string(), code.to_string()))
            .collect();
        let units = parse_units(&triples);
        let index = Arc::new(TypeIndex::build(&units));

        let mut record = TypeRecord::new("app", sources[0].0, type_name, kind, 1);
        let mut metric = HierarchyMetric::new(index);
        for unit in &units {
            metric.execute(unit, &mut record);
        }
        metric.set_result(&mut record);
        record
    }

    #[test]
    fn test_trait_depth_and_children() {
        let record = measure(
            &[
                (
                    "traits.rs",
                    r#"
                    trait Base {}
                    trait Render: Base {}
                    "#,
                ),
                (
                    "impls.rs",
                    r#"
                    struct Circle;
                    struct Square;
                    impl Render for Circle {}
                    impl Render for Square {}
                    "#,
                ),
            ],
            "Render",
            TypeKind::Trait,
        );
        assert_eq!(record.dit, 2);
        assert_eq!(record.noc, 2);
    }

    #[test]
    fn test_struct_depth_from_implemented_traits() {
        let record = measure(
            &[(
                "lib.rs",
                r#"
                trait Base {}
                trait Render: Base {}
                struct Circle;
                impl Render for Circle {}
                "#,
            )],
            "Circle",
            TypeKind::Struct,
        );
        assert_eq!(record.dit, 2);
        assert_eq!(record.noc, 0);
    }

    #[test]
    fn test_plain_struct_is_zero() {
        let record = measure(&[("lib.rs", "struct Plain;")], "Plain", TypeKind::Struct);
        assert_eq!(record.dit, 0);
        assert_eq!(record.noc, 0);
    }
}
